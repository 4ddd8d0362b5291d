pub mod progress;
pub mod output;
pub mod signals;

pub use progress::{update_traversal_progress, ProgressManager};
pub use output::{OutputFormatter, OutputMode, ProgressAwareOutput};
pub use signals::GracefulShutdown;
