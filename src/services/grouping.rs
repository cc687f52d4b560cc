use crate::domain::{DuplicateGroup, OriginalPolicy, ScanResult, ScanSummary, ScannedFile};

/// Buckets with two or more members, sorted by fingerprint. Member order
/// follows `policy`; the first member becomes the original.
pub fn group(result: &ScanResult, policy: OriginalPolicy) -> Vec<DuplicateGroup> {
    let mut groups: Vec<DuplicateGroup> = result
        .buckets
        .iter()
        .filter(|(_, files)| files.len() > 1)
        .map(|(fingerprint, files)| {
            let mut members: Vec<&ScannedFile> = files.iter().collect();
            match policy {
                OriginalPolicy::Completion => {}
                OriginalPolicy::Traversal => members.sort_by_key(|f| f.traversal_index),
                OriginalPolicy::Path => members.sort_by(|a, b| a.path.cmp(&b.path)),
            }

            let mut paths = members.into_iter().map(|f| f.path.clone());
            let original = paths.next().unwrap_or_default();
            DuplicateGroup {
                fingerprint: fingerprint.clone(),
                original,
                candidates: paths.collect(),
            }
        })
        .collect();

    groups.sort_by(|a, b| a.fingerprint.cmp(&b.fingerprint));
    groups
}

pub fn summarize(result: &ScanResult, groups: &[DuplicateGroup]) -> ScanSummary {
    ScanSummary {
        total_files: result.total_files,
        hashed_files: result.hashed_files,
        unreadable_files: result.unreadable.len(),
        walk_errors: result.walk_errors,
        duplicate_groups: groups.len(),
        duplicate_files: groups.iter().map(|g| g.candidates.len()).sum(),
        cancelled: result.cancelled,
    }
}
