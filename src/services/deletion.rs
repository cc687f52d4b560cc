use crate::domain::{DeletionOutcome, DuplicateGroup, SelectionSet};
use crate::error::DeleteFailure;
use crate::ports::FileSystemPort;
use std::collections::HashSet;
use std::path::Path;

/// Removes selected candidates, one group at a time.
///
/// Originals are never removed, even when selected. Paths that are not a
/// candidate of any group are ignored and get no outcome.
pub struct DeletionExecutor<F> {
    filesystem: F,
    dry_run: bool,
}

impl<F: FileSystemPort> DeletionExecutor<F> {
    pub fn new(filesystem: F) -> Self {
        Self {
            filesystem,
            dry_run: false,
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn delete(&self, groups: &[DuplicateGroup], selection: &SelectionSet) -> Vec<DeletionOutcome> {
        let originals: HashSet<&Path> = groups.iter().map(|g| g.original.as_path()).collect();
        for original in originals.iter().filter(|p| selection.contains(**p)) {
            log::warn!("Refusing to delete original {}", original.display());
        }

        let mut attempted: HashSet<&Path> = HashSet::new();
        let mut outcomes = Vec::new();

        for group in groups {
            for candidate in &group.candidates {
                let path = candidate.as_path();
                if !selection.contains(path) || originals.contains(path) || !attempted.insert(path) {
                    continue;
                }

                if self.dry_run {
                    log::info!("Would delete: {}", path.display());
                    outcomes.push(DeletionOutcome::deleted(candidate.clone()));
                    continue;
                }

                match self.filesystem.remove_file(path) {
                    Ok(()) => {
                        log::info!("Deleted: {}", path.display());
                        outcomes.push(DeletionOutcome::deleted(candidate.clone()));
                    }
                    Err(err) => {
                        let failure = DeleteFailure::from_io(path, &err);
                        log::warn!("Failed to delete {}: {}", path.display(), failure);
                        outcomes.push(DeletionOutcome::failed(candidate.clone(), failure));
                    }
                }
            }
        }

        outcomes
    }
}

/// Every candidate of every group; the "select all" choice.
pub fn all_candidates(groups: &[DuplicateGroup]) -> SelectionSet {
    groups
        .iter()
        .flat_map(|g| g.candidates.iter().cloned())
        .collect()
}
