use crate::error::{FolderPrintError, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Flag pair shared with the signal handler. `running` drops on the first
/// Ctrl+C; `warned` tracks whether the second press should force-exit.
struct ShutdownState {
    running: AtomicBool,
    warned: AtomicBool,
}

impl ShutdownState {
    fn fresh() -> Self {
        Self {
            running: AtomicBool::new(true),
            warned: AtomicBool::new(false),
        }
    }

    fn on_interrupt(&self) {
        self.running.store(false, Ordering::SeqCst);

        if self.warned.swap(true, Ordering::SeqCst) {
            eprintln!("\n💀 Force stopping...");
            std::process::exit(130);
        }
        eprintln!("\n🛑 Gracefully stopping... (press Ctrl+C again to force exit)");
    }
}

pub struct GracefulShutdown {
    state: Arc<ShutdownState>,
}

impl GracefulShutdown {
    pub fn new() -> Result<Self> {
        let state = Arc::new(ShutdownState::fresh());

        let handler_state = state.clone();
        ctrlc::set_handler(move || handler_state.on_interrupt()).map_err(|e| {
            FolderPrintError::Config {
                message: format!("Failed to set signal handler: {}", e),
            }
        })?;

        Ok(Self { state })
    }

    /// Create a GracefulShutdown instance for testing (no signal handler registration)
    pub fn new_for_test() -> Self {
        Self {
            state: Arc::new(ShutdownState::fresh()),
        }
    }

    pub fn is_running(&self) -> bool {
        self.state.running.load(Ordering::SeqCst)
    }

    pub fn check_shutdown(&self) -> Result<()> {
        if self.is_running() {
            Ok(())
        } else {
            Err(FolderPrintError::Interrupted)
        }
    }

    pub fn request_shutdown(&self) {
        self.state.running.store(false, Ordering::SeqCst);
    }

    pub fn reset(&self) {
        self.state.running.store(true, Ordering::SeqCst);
        self.state.warned.store(false, Ordering::SeqCst);
    }
}
