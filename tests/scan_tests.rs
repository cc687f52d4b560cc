use dupsweep::adapters::{ChannelProgressAdapter, FileSystemAdapter, StreamingHasher};
use dupsweep::domain::{
    DeletionStatus, Fingerprint, HashAlgorithm, OriginalPolicy, ProgressEvent, ScanConfig,
    SelectionSet,
};
use dupsweep::error::{DeleteFailure, HashError, ScanError};
use dupsweep::ports::HashingPort;
use dupsweep::services::{DeletionExecutor, ScanCoordinator, all_candidates, group, summarize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use tempfile::TempDir;

const HELLO_SHA256: &str = "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824";

/// Fails on any file with the given name, like a permission error would.
struct DenyingHasher {
    inner: StreamingHasher,
    denied: &'static str,
}

impl HashingPort for DenyingHasher {
    fn hash_file(
        &self,
        path: &Path,
        algorithm: HashAlgorithm,
        block_size: usize,
    ) -> Result<Fingerprint, HashError> {
        if path.file_name().is_some_and(|n| n == self.denied) {
            return Err(HashError::Unreadable {
                path: path.to_path_buf(),
                source: io::Error::from(io::ErrorKind::PermissionDenied),
            });
        }
        self.inner.hash_file(path, algorithm, block_size)
    }
}

fn canonical_tempdir() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let root = dir.path().canonicalize().unwrap();
    (dir, root)
}

fn coordinator<H: HashingPort + Sync>(
    hasher: H,
) -> (
    ScanCoordinator<FileSystemAdapter, H, ChannelProgressAdapter>,
    Receiver<ProgressEvent>,
) {
    let (tx, rx) = mpsc::channel();
    (
        ScanCoordinator::new(FileSystemAdapter::new(), hasher, ChannelProgressAdapter::new(tx)),
        rx,
    )
}

fn names(paths: &[PathBuf]) -> Vec<String> {
    let mut names: Vec<String> = paths
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn test_hello_world_scenario() {
    let (_dir, root) = canonical_tempdir();
    fs::create_dir(root.join("sub")).unwrap();
    fs::write(root.join("p1"), "hello").unwrap();
    fs::write(root.join("p2"), "hello").unwrap();
    fs::write(root.join("sub/p3"), "hello").unwrap();
    fs::write(root.join("p4"), "world").unwrap();
    let (coordinator, _rx) = coordinator(StreamingHasher::new());

    let result = coordinator.scan(&ScanConfig::new(&root)).unwrap();
    let groups = group(&result, OriginalPolicy::Path);

    assert_eq!(groups.len(), 1);
    let hello = &groups[0];
    assert_eq!(hello.fingerprint.to_hex(), HELLO_SHA256);
    assert_eq!(hello.member_count(), 3);
    assert_eq!(hello.original, root.join("p1"));
    assert!(!hello.candidates.contains(&hello.original));
    assert!(groups.iter().all(|g| g.members().all(|p| p != root.join("p4").as_path())));
}

#[test]
fn test_unreadable_file_is_excluded() {
    let (_dir, root) = canonical_tempdir();
    for i in 0..10 {
        let content = if i < 6 { "dup".to_string() } else { format!("unique{}", i) };
        fs::write(root.join(format!("f{}", i)), content).unwrap();
    }
    let hasher = DenyingHasher {
        inner: StreamingHasher::new(),
        denied: "f3",
    };
    let (coordinator, rx) = coordinator(hasher);

    let result = coordinator.scan(&ScanConfig::new(&root).with_worker_count(4)).unwrap();
    let groups = group(&result, OriginalPolicy::Path);

    assert_eq!(result.total_files, 10);
    assert_eq!(result.hashed_files, 9);
    assert_eq!(result.unreadable.len(), 1);
    assert_eq!(result.unreadable[0].path, root.join("f3"));
    assert_eq!(groups.len(), 1);
    let members: Vec<PathBuf> = groups[0].members().map(Path::to_path_buf).collect();
    assert_eq!(names(&members), vec!["f0", "f1", "f2", "f4", "f5"]);
    assert_eq!(rx.try_iter().last(), Some(ProgressEvent { completed: 10, total: 10 }));
}

#[test]
fn test_empty_root() {
    let (_dir, root) = canonical_tempdir();
    let (coordinator, rx) = coordinator(StreamingHasher::new());

    let result = coordinator.scan(&ScanConfig::new(&root)).unwrap();
    let groups = group(&result, OriginalPolicy::default());
    let summary = summarize(&result, &groups);

    assert!(groups.is_empty());
    assert_eq!(summary.total_files, 0);
    assert_eq!(
        rx.try_iter().collect::<Vec<_>>(),
        vec![ProgressEvent { completed: 0, total: 0 }]
    );
}

#[test]
fn test_invalid_root_is_distinguishable_from_no_duplicates() {
    let (_dir, root) = canonical_tempdir();
    fs::write(root.join("only"), "x").unwrap();
    let (coordinator, rx) = coordinator(StreamingHasher::new());

    let ok = coordinator.scan(&ScanConfig::new(&root)).unwrap();
    assert!(group(&ok, OriginalPolicy::default()).is_empty());

    let err = coordinator.scan(&ScanConfig::new(root.join("nope"))).unwrap_err();
    assert!(matches!(err, ScanError::InvalidRoot { .. }));
    assert_eq!(rx.try_iter().count(), 1);
}

#[test]
fn test_progress_is_monotonic() {
    let (_dir, root) = canonical_tempdir();
    for i in 0..40 {
        fs::write(root.join(format!("{:02}", i)), vec![b'x'; i * 1000]).unwrap();
    }
    let (coordinator, rx) = coordinator(StreamingHasher::new());

    coordinator
        .scan(&ScanConfig::new(&root).with_worker_count(6).with_block_size(512))
        .unwrap();
    let events: Vec<ProgressEvent> = rx.try_iter().collect();

    assert_eq!(events.len(), 40);
    assert!(events.windows(2).all(|w| w[0].completed <= w[1].completed));
    assert_eq!(events.iter().filter(|e| e.completed == e.total).count(), 1);
    assert_eq!(events.last(), Some(&ProgressEvent { completed: 40, total: 40 }));
}

#[test]
fn test_scan_then_delete_round_trip() {
    let (_dir, root) = canonical_tempdir();
    for name in ["a", "b", "c"] {
        fs::write(root.join(name), "same").unwrap();
    }
    fs::write(root.join("d"), "different").unwrap();
    let (coordinator, _rx) = coordinator(StreamingHasher::new());
    let config = ScanConfig::new(&root).with_hash_algorithm(HashAlgorithm::Blake3);

    let groups = group(&coordinator.scan(&config).unwrap(), OriginalPolicy::Path);
    let outcomes = DeletionExecutor::new(FileSystemAdapter::new()).delete(&groups, &all_candidates(&groups));

    assert_eq!(outcomes.len(), 2);
    assert!(outcomes.iter().all(|o| o.is_deleted()));
    assert!(root.join("a").exists());
    assert!(root.join("d").exists());

    let rescanned = group(&coordinator.scan(&config).unwrap(), OriginalPolicy::Path);
    assert!(rescanned.is_empty());
}

#[test]
fn test_adversarial_selection_keeps_originals() {
    let (_dir, root) = canonical_tempdir();
    for name in ["x1", "x2", "y1", "y2"] {
        fs::write(root.join(name), &name[..1]).unwrap();
    }
    let (coordinator, _rx) = coordinator(StreamingHasher::new());
    let groups = group(&coordinator.scan(&ScanConfig::new(&root)).unwrap(), OriginalPolicy::Path);
    let mut selection: SelectionSet = groups.iter().map(|g| g.original.clone()).collect();
    selection.insert(root.join("x2"));
    selection.insert(root.join("not-a-candidate"));

    let outcomes = DeletionExecutor::new(FileSystemAdapter::new()).delete(&groups, &selection);

    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].path, root.join("x2"));
    assert!(root.join("x1").exists());
    assert!(root.join("y1").exists());
    assert!(root.join("y2").exists());
}

#[test]
fn test_rerun_reports_failed_not_crash() {
    let (_dir, root) = canonical_tempdir();
    for name in ["a", "b"] {
        fs::write(root.join(name), "same").unwrap();
    }
    let (coordinator, _rx) = coordinator(StreamingHasher::new());
    let groups = group(&coordinator.scan(&ScanConfig::new(&root)).unwrap(), OriginalPolicy::Path);
    let selection = all_candidates(&groups);
    let executor = DeletionExecutor::new(FileSystemAdapter::new());

    executor.delete(&groups, &selection);
    let second = executor.delete(&groups, &selection);

    assert_eq!(second.len(), 1);
    assert_eq!(second[0].status, DeletionStatus::Failed(DeleteFailure::NotFound));
}

#[cfg(unix)]
#[test]
fn test_followed_symlink_never_costs_the_real_file() {
    let (_dir, root) = canonical_tempdir();
    fs::write(root.join("z_real.txt"), "precious").unwrap();
    std::os::unix::fs::symlink(root.join("z_real.txt"), root.join("a_link.txt")).unwrap();
    let (coordinator, _rx) = coordinator(StreamingHasher::new());
    let config = ScanConfig::new(&root).with_follow_symlinks(true);

    let groups = group(&coordinator.scan(&config).unwrap(), OriginalPolicy::Path);
    let outcomes =
        DeletionExecutor::new(FileSystemAdapter::new()).delete(&groups, &all_candidates(&groups));

    assert!(groups.is_empty());
    assert!(outcomes.is_empty());
    assert_eq!(fs::read_to_string(root.join("z_real.txt")).unwrap(), "precious");
    assert_eq!(fs::read_to_string(root.join("a_link.txt")).unwrap(), "precious");
}

#[cfg(unix)]
#[test]
fn test_followed_symlink_beside_a_real_copy() {
    let (_dir, root) = canonical_tempdir();
    fs::write(root.join("z_real.txt"), "precious").unwrap();
    fs::write(root.join("m_copy.txt"), "precious").unwrap();
    std::os::unix::fs::symlink(root.join("z_real.txt"), root.join("a_link.txt")).unwrap();
    let (coordinator, _rx) = coordinator(StreamingHasher::new());
    let config = ScanConfig::new(&root).with_follow_symlinks(true);

    let groups = group(&coordinator.scan(&config).unwrap(), OriginalPolicy::Path);
    let outcomes =
        DeletionExecutor::new(FileSystemAdapter::new()).delete(&groups, &all_candidates(&groups));

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].original, root.join("a_link.txt"));
    assert_eq!(groups[0].candidates, vec![root.join("m_copy.txt")]);
    assert_eq!(outcomes.len(), 1);
    assert_eq!(fs::read_to_string(root.join("a_link.txt")).unwrap(), "precious");
}

#[cfg(unix)]
#[test]
fn test_scan_continues_past_unenterable_directory() {
    use std::os::unix::fs::PermissionsExt;

    let (_dir, root) = canonical_tempdir();
    let locked = root.join("locked");
    fs::create_dir(&locked).unwrap();
    fs::write(locked.join("inner"), "dup").unwrap();
    fs::write(root.join("a"), "dup").unwrap();
    fs::write(root.join("b"), "dup").unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
    if fs::read_dir(&locked).is_ok() {
        // Privileged users can enter any directory.
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }
    let (coordinator, rx) = coordinator(StreamingHasher::new());

    let result = coordinator.scan(&ScanConfig::new(&root));
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
    let result = result.unwrap();
    let groups = group(&result, OriginalPolicy::Path);

    assert_eq!(result.total_files, 2);
    assert!(result.walk_errors >= 1);
    assert!(summarize(&result, &groups).walk_errors >= 1);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].original, root.join("a"));
    assert_eq!(groups[0].candidates, vec![root.join("b")]);
    assert_eq!(rx.try_iter().last(), Some(ProgressEvent { completed: 2, total: 2 }));
}
