pub mod record;
pub mod writer;

pub use record::{FileRecord, ReadOutcome};
pub use writer::{ReportWriter, SEPARATOR_WIDTH};
