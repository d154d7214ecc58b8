use crate::error::{PunctalyzerError, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Ctrl+C handling. The first interrupt asks the batch to stop after the
/// current document; the second exits immediately.
pub struct GracefulShutdown {
    running: Arc<AtomicBool>,
    interrupted_once: Arc<AtomicBool>,
}

impl GracefulShutdown {
    pub fn new() -> Result<Self> {
        let running = Arc::new(AtomicBool::new(true));
        let interrupted_once = Arc::new(AtomicBool::new(false));

        let running_handle = running.clone();
        let interrupted_handle = interrupted_once.clone();

        ctrlc::set_handler(move || {
            running_handle.store(false, Ordering::SeqCst);

            if !interrupted_handle.swap(true, Ordering::SeqCst) {
                eprintln!("\n🛑 Stopping after the current document... (press Ctrl+C again to quit now)");
            } else {
                eprintln!("\n💀 Quitting");
                std::process::exit(130);
            }
        })
        .map_err(|e| PunctalyzerError::Config {
            message: format!("Failed to set signal handler: {}", e),
        })?;

        Ok(Self {
            running,
            interrupted_once,
        })
    }

    /// No signal handler registration, for tests and embedding.
    pub fn new_for_test() -> Self {
        Self {
            running: Arc::new(AtomicBool::new(true)),
            interrupted_once: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn check_shutdown(&self) -> Result<()> {
        if !self.is_running() {
            return Err(PunctalyzerError::Cancelled);
        }
        Ok(())
    }

    pub fn request_shutdown(&self) {
        self.running.store(false, Ordering::SeqCst);
    }
}

impl Default for GracefulShutdown {
    fn default() -> Self {
        // ctrlc allows a single handler per process
        Self::new().unwrap_or_else(|_| Self::new_for_test())
    }
}
