use crate::domain::ProgressEvent;
use crate::ports::ProgressPort;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::mpsc::Sender;
use std::time::Duration;

pub struct ProgressBarAdapter {
    bar: ProgressBar,
    quiet: bool,
}

impl ProgressBarAdapter {
    pub fn new() -> Self {
        let bar = ProgressBar::new(0);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} {percent:>3}% {msg} (ETA: {eta})")
        {
            bar.set_style(style.progress_chars("█▉▊▋▌▍▎▏ "));
        }
        Self { bar, quiet: false }
    }

    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        if quiet {
            self.bar = ProgressBar::hidden();
        }
        self
    }
}

impl Default for ProgressBarAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressPort for ProgressBarAdapter {
    fn start(&self, total: u64) {
        if self.quiet {
            return;
        }

        self.bar.set_length(total);
        self.bar.set_message(format!("Scanning {} files...", total));
        self.bar.enable_steady_tick(Duration::from_millis(100));
    }

    fn update(&self, completed: u64, total: u64) {
        if self.quiet {
            return;
        }

        self.bar.set_position(completed);
        self.bar.set_message(format!("Scanning {}/{} files...", completed, total));
    }

    fn finish(&self) {
        if self.quiet {
            return;
        }

        self.bar.disable_steady_tick();
        self.bar.finish_with_message("✓ Scan complete!");
    }
}

/// Forwards every progress update as a [`ProgressEvent`] over a channel.
///
/// A closed receiver is not an error; the scan keeps going.
pub struct ChannelProgressAdapter {
    tx: Sender<ProgressEvent>,
}

impl ChannelProgressAdapter {
    pub fn new(tx: Sender<ProgressEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressPort for ChannelProgressAdapter {
    fn start(&self, _total: u64) {}

    fn update(&self, completed: u64, total: u64) {
        let _ = self.tx.send(ProgressEvent { completed, total });
    }

    fn finish(&self) {}
}
