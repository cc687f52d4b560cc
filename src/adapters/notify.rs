use crate::domain::ScanSummary;
use crate::ports::NotifierPort;
use console::Term;

/// Rings the terminal bell when a scan finishes.
pub struct TerminalNotifier {
    term: Term,
    bell: bool,
}

impl TerminalNotifier {
    pub fn new() -> Self {
        Self {
            term: Term::stderr(),
            bell: true,
        }
    }

    pub fn with_bell(mut self, bell: bool) -> Self {
        self.bell = bell;
        self
    }
}

impl Default for TerminalNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl NotifierPort for TerminalNotifier {
    fn scan_complete(&self, summary: &ScanSummary) {
        log::info!(
            "Scan complete: {} files, {} duplicate groups",
            summary.total_files,
            summary.duplicate_groups
        );
        if self.bell && self.term.is_term() {
            let _ = self.term.write_str("\x07");
        }
    }
}
