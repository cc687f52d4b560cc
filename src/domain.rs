use crate::error::DeleteFailure;
use serde::{Serialize, Serializer};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::{Path, PathBuf};

pub const DEFAULT_BLOCK_SIZE: usize = 64 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HashAlgorithm {
    #[default]
    Sha256,
    Blake3,
}

impl HashAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Blake3 => "blake3",
        }
    }
}

/// Digest of a file's full content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint(Vec<u8>);

impl Fingerprint {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{:02x}", b)).collect()
    }

    pub fn short(&self) -> String {
        let hex = self.to_hex();
        hex[..hex.len().min(10)].to_string()
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Fingerprint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

/// Which member of a duplicate group is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OriginalPolicy {
    /// First file whose hash completed. Depends on worker scheduling.
    Completion,
    /// Earliest file in walk order.
    Traversal,
    /// Lexicographically smallest path.
    #[default]
    Path,
}

#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub root: PathBuf,
    pub worker_count: Option<usize>,
    pub block_size: usize,
    pub hash_algorithm: HashAlgorithm,
    pub follow_symlinks: bool,
    pub original_policy: OriginalPolicy,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            worker_count: None,
            block_size: DEFAULT_BLOCK_SIZE,
            hash_algorithm: HashAlgorithm::default(),
            follow_symlinks: false,
            original_policy: OriginalPolicy::default(),
        }
    }
}

impl ScanConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    pub fn with_worker_count(mut self, workers: usize) -> Self {
        self.worker_count = Some(workers.max(1));
        self
    }

    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size.max(1);
        self
    }

    pub fn with_hash_algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.hash_algorithm = algorithm;
        self
    }

    pub fn with_follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    pub fn with_original_policy(mut self, policy: OriginalPolicy) -> Self {
        self.original_policy = policy;
        self
    }

    pub fn effective_workers(&self) -> usize {
        self.worker_count.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4)
        })
    }
}

/// Output of a directory walk.
#[derive(Debug, Default)]
pub struct Walk {
    pub files: Vec<PathBuf>,
    /// Further names of files already in `files`, left out.
    pub aliases: usize,
    pub errors: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedFile {
    pub path: PathBuf,
    pub traversal_index: usize,
}

#[derive(Debug, Clone)]
pub struct UnreadableFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Everything one scan produced. Bucket vectors are in hash completion order.
#[derive(Debug, Default)]
pub struct ScanResult {
    pub buckets: HashMap<Fingerprint, Vec<ScannedFile>>,
    pub total_files: usize,
    pub hashed_files: usize,
    pub unreadable: Vec<UnreadableFile>,
    pub walk_errors: usize,
    pub cancelled: bool,
}

impl ScanResult {
    pub fn insert(&mut self, fingerprint: Fingerprint, file: ScannedFile) {
        self.buckets.entry(fingerprint).or_default().push(file);
        self.hashed_files += 1;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateGroup {
    pub fingerprint: Fingerprint,
    pub original: PathBuf,
    pub candidates: Vec<PathBuf>,
}

impl DuplicateGroup {
    pub fn member_count(&self) -> usize {
        self.candidates.len() + 1
    }

    pub fn members(&self) -> impl Iterator<Item = &Path> {
        std::iter::once(self.original.as_path()).chain(self.candidates.iter().map(PathBuf::as_path))
    }
}

pub type SelectionSet = HashSet<PathBuf>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeletionStatus {
    Deleted,
    Failed(DeleteFailure),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionOutcome {
    pub path: PathBuf,
    pub status: DeletionStatus,
}

impl DeletionOutcome {
    pub fn deleted(path: PathBuf) -> Self {
        Self {
            path,
            status: DeletionStatus::Deleted,
        }
    }

    pub fn failed(path: PathBuf, failure: DeleteFailure) -> Self {
        Self {
            path,
            status: DeletionStatus::Failed(failure),
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.status == DeletionStatus::Deleted
    }

    pub fn reason(&self) -> Option<String> {
        match &self.status {
            DeletionStatus::Deleted => None,
            DeletionStatus::Failed(failure) => Some(failure.to_string()),
        }
    }
}

impl Serialize for DeletionOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("DeletionOutcome", 3)?;
        state.serialize_field("path", &self.path)?;
        state.serialize_field("status", if self.is_deleted() { "deleted" } else { "failed" })?;
        state.serialize_field("reason", &self.reason())?;
        state.end()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProgressEvent {
    pub completed: u64,
    pub total: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanSummary {
    pub total_files: usize,
    pub hashed_files: usize,
    pub unreadable_files: usize,
    pub walk_errors: usize,
    pub duplicate_groups: usize,
    pub duplicate_files: usize,
    pub cancelled: bool,
}
