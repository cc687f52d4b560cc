pub mod deletion;
pub mod grouping;
pub mod scan_coordinator;

pub use deletion::{DeletionExecutor, all_candidates};
pub use grouping::{group, summarize};
pub use scan_coordinator::ScanCoordinator;
