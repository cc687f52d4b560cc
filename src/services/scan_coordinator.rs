use crate::domain::{Fingerprint, ScanConfig, ScanResult, ScannedFile, UnreadableFile};
use crate::error::{HashError, ScanError};
use crate::ports::{FileSystemPort, HashingPort, NotifierPort, ProgressPort};
use crate::services::grouping::{group, summarize};
use rayon::ThreadPool;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::thread;

enum HashOutcome {
    Hashed(Fingerprint),
    Unreadable(HashError),
    Skipped,
}

struct Completion {
    index: usize,
    path: PathBuf,
    outcome: HashOutcome,
}

/// Walks a root, hashes every file on a bounded pool and collects the
/// fingerprints. The calling thread is the only writer of the result.
pub struct ScanCoordinator<F, H, P> {
    filesystem: F,
    hasher: H,
    progress: P,
    notifier: Option<Box<dyn NotifierPort>>,
    shutdown: Arc<AtomicBool>,
}

impl<F, H, P> ScanCoordinator<F, H, P>
where
    F: FileSystemPort,
    H: HashingPort + Sync,
    P: ProgressPort,
{
    pub fn new(filesystem: F, hasher: H, progress: P) -> Self {
        Self {
            filesystem,
            hasher,
            progress,
            notifier: None,
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_notifier(mut self, notifier: impl NotifierPort + 'static) -> Self {
        self.notifier = Some(Box::new(notifier));
        self
    }

    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown = flag;
        self
    }

    pub fn scan(&self, config: &ScanConfig) -> Result<ScanResult, ScanError> {
        let root = validate_root(&config.root)?;
        log::info!("Scanning {}", root.display());

        let walk = self.filesystem.walk(&root, config.follow_symlinks);
        let total = walk.files.len();
        log::debug!("Found {} files ({} walk errors)", total, walk.errors);

        let mut result = ScanResult {
            total_files: total,
            walk_errors: walk.errors,
            ..ScanResult::default()
        };

        if total == 0 {
            self.progress.start(0);
            self.progress.update(0, 0);
        } else {
            let pool = build_pool(config.effective_workers())?;
            self.progress.start(total as u64);
            self.hash_all(&pool, walk.files, config, &mut result);
        }
        self.progress.finish();

        if result.cancelled {
            log::warn!(
                "Scan cancelled after hashing {} of {} files",
                result.hashed_files,
                total
            );
        }

        if let Some(notifier) = &self.notifier {
            let groups = group(&result, config.original_policy);
            notifier.scan_complete(&summarize(&result, &groups));
        }

        Ok(result)
    }

    fn hash_all(
        &self,
        pool: &ThreadPool,
        files: Vec<PathBuf>,
        config: &ScanConfig,
        result: &mut ScanResult,
    ) {
        let workers = pool.current_num_threads();
        log::debug!(
            "Hashing with {} workers ({}, {} byte blocks)",
            workers,
            config.hash_algorithm.as_str(),
            config.block_size
        );

        let total = files.len() as u64;
        let algorithm = config.hash_algorithm;
        let block_size = config.block_size;
        let hasher = &self.hasher;
        let shutdown = &self.shutdown;
        let (tx, rx) = mpsc::sync_channel::<Completion>(workers * 2);

        thread::scope(|scope| {
            scope.spawn(move || {
                pool.install(|| {
                    files.into_par_iter().enumerate().for_each_with(tx, |tx, (index, path)| {
                        let outcome = if shutdown.load(Ordering::SeqCst) {
                            HashOutcome::Skipped
                        } else {
                            match hasher.hash_file(&path, algorithm, block_size) {
                                Ok(fingerprint) => HashOutcome::Hashed(fingerprint),
                                Err(err) => HashOutcome::Unreadable(err),
                            }
                        };
                        let _ = tx.send(Completion { index, path, outcome });
                    });
                });
            });

            let mut completed = 0u64;
            for completion in rx {
                match completion.outcome {
                    HashOutcome::Hashed(fingerprint) => {
                        log::trace!("{} {}", fingerprint.short(), completion.path.display());
                        result.insert(
                            fingerprint,
                            ScannedFile {
                                path: completion.path,
                                traversal_index: completion.index,
                            },
                        );
                    }
                    HashOutcome::Unreadable(err) => {
                        log::warn!("{}", err);
                        result.unreadable.push(UnreadableFile {
                            path: completion.path,
                            reason: err.to_string(),
                        });
                    }
                    HashOutcome::Skipped => result.cancelled = true,
                }
                completed += 1;
                self.progress.update(completed, total);
            }
        });
    }
}

fn build_pool(workers: usize) -> Result<ThreadPool, ScanError> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("hash-{}", i))
        .build()
        .map_err(|e| ScanError::WorkerPool(e.to_string()))
}

fn validate_root(root: &Path) -> Result<PathBuf, ScanError> {
    let invalid = |reason: String| ScanError::InvalidRoot {
        path: root.to_path_buf(),
        reason,
    };
    let metadata = fs::metadata(root).map_err(|e| invalid(e.to_string()))?;
    if !metadata.is_dir() {
        return Err(invalid("not a directory".to_string()));
    }
    fs::canonicalize(root).map_err(|e| invalid(e.to_string()))
}
