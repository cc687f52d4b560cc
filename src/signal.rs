//! Ctrl+C handling.
//!
//! The handler only flips a shared flag. The scan coordinator checks it
//! before each file and stops scheduling new work once it is set.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Clone, Default)]
pub struct ShutdownHandler {
    flag: Arc<AtomicBool>,
}

impl ShutdownHandler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_shutdown_requested(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    pub fn request_shutdown(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Shared flag for the scan coordinator.
    #[must_use]
    pub fn get_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.flag)
    }
}

/// Install the process-wide Ctrl+C handler.
///
/// # Errors
///
/// Fails if a handler is already installed.
pub fn install_handler() -> Result<ShutdownHandler, ctrlc::Error> {
    let handler = ShutdownHandler::new();
    let signal_handler = handler.clone();
    ctrlc::set_handler(move || {
        if signal_handler.is_shutdown_requested() {
            // Second Ctrl+C: stop waiting for in-flight work.
            std::process::exit(crate::error::ExitCode::Interrupted.as_i32());
        }
        eprintln!("\nInterrupted. Finishing in-flight files...");
        signal_handler.request_shutdown();
    })?;
    Ok(handler)
}
