pub mod events;
pub mod traversal;

pub use events::{event_channel, EventReceiver, EventSender, WorkerEvent};
pub use traversal::{TraversalOutcome, TraversalSummary, TraversalWorker};
