use std::path::PathBuf;
use tokio::sync::mpsc;

/// One-directional notifications from the traversal worker to whatever is
/// presenting the run. Events carry all needed data by value, so the
/// consumer never touches worker state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerEvent {
    /// Percent complete (0-100) plus a message naming the file being
    /// processed. Percent never decreases within one run.
    Progress { percent: u8, message: String },
    /// Terminal or informational status text ("No files found", "Completed").
    Status { message: String },
    /// The run finished and the report artifact at `output_path` is complete.
    Completed { output_path: PathBuf },
}

pub type EventSender = mpsc::UnboundedSender<WorkerEvent>;
pub type EventReceiver = mpsc::UnboundedReceiver<WorkerEvent>;

pub fn event_channel() -> (EventSender, EventReceiver) {
    mpsc::unbounded_channel()
}
