use crate::domain::{
    DeletionOutcome, DuplicateGroup, Fingerprint, HashAlgorithm, ScanSummary, SelectionSet, Walk,
};
use crate::error::HashError;
use anyhow::Result;
use std::io;
use std::path::Path;

pub trait FileSystemPort {
    fn walk(&self, root: &Path, follow_symlinks: bool) -> Walk;
    fn remove_file(&self, path: &Path) -> io::Result<()>;
}

impl<T: FileSystemPort + ?Sized> FileSystemPort for &T {
    fn walk(&self, root: &Path, follow_symlinks: bool) -> Walk {
        (**self).walk(root, follow_symlinks)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        (**self).remove_file(path)
    }
}

/// Content hashing. Files are read `block_size` bytes at a time.
pub trait HashingPort {
    fn hash_file(
        &self,
        path: &Path,
        algorithm: HashAlgorithm,
        block_size: usize,
    ) -> Result<Fingerprint, HashError>;
}

impl<T: HashingPort + ?Sized> HashingPort for &T {
    fn hash_file(
        &self,
        path: &Path,
        algorithm: HashAlgorithm,
        block_size: usize,
    ) -> Result<Fingerprint, HashError> {
        (**self).hash_file(path, algorithm, block_size)
    }
}

/// Receives `(completed, total)` as hashing finishes.
pub trait ProgressPort {
    fn start(&self, total: u64);
    fn update(&self, completed: u64, total: u64);
    fn finish(&self);
}

pub trait NotifierPort {
    fn scan_complete(&self, summary: &ScanSummary);
}

pub trait SelectionPort {
    fn select(&self, groups: &[DuplicateGroup]) -> Result<SelectionSet>;
}

pub trait OutputPort {
    fn write_groups(&self, summary: &ScanSummary, groups: &[DuplicateGroup]) -> Result<()>;
    fn write_deletions(&self, outcomes: &[DeletionOutcome]) -> Result<()>;

    /// Flushes anything held back until the run ends.
    fn finish(&self) -> Result<()> {
        Ok(())
    }
}
