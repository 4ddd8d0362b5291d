use crate::error::Result;
use crate::report::{FileRecord, ReportWriter};
use crate::scanner::FolderWalker;
use crate::ui::GracefulShutdown;
use crate::worker::events::{EventSender, WorkerEvent};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Totals for one completed traversal run.
#[derive(Debug, Clone)]
pub struct TraversalSummary {
    pub files_processed: usize,
    pub read_errors: usize,
    pub scan_skips: usize,
    pub bytes_written: u64,
    pub output_path: PathBuf,
    pub elapsed: Duration,
}

#[derive(Debug)]
pub enum TraversalOutcome {
    /// Zero files under the root; no artifact was written and no percent-100
    /// event was emitted.
    Empty,
    Completed(TraversalSummary),
}

/// Walks a root directory and folds every file into the report, emitting
/// progress events as it goes. A file that cannot be read is recorded in the
/// report and the run continues; the run only refuses to start when the root
/// itself is invalid.
pub struct TraversalWorker {
    output_filename: String,
    shutdown: Option<Arc<GracefulShutdown>>,
}

impl TraversalWorker {
    pub fn new<S: Into<String>>(output_filename: S) -> Self {
        Self {
            output_filename: output_filename.into(),
            shutdown: None,
        }
    }

    pub fn with_shutdown(mut self, shutdown: Arc<GracefulShutdown>) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    pub fn run(&self, root: &Path, events: &EventSender) -> Result<TraversalOutcome> {
        let started = Instant::now();
        let output_path = root.join(&self.output_filename);

        let enumeration = FolderWalker::new()
            .with_excluded_file(output_path.clone())
            .enumerate(root)?;

        if enumeration.is_empty() {
            emit(
                events,
                WorkerEvent::Status {
                    message: format!("No files found in {}", root.display()),
                },
            );
            return Ok(TraversalOutcome::Empty);
        }

        // Shutdown is honored between phases only; once the write loop starts
        // the run goes to completion.
        if let Some(ref shutdown) = self.shutdown {
            shutdown.check_shutdown()?;
        }

        let total = enumeration.len();
        let mut writer = ReportWriter::create(output_path)?;
        let mut read_errors = 0;

        for (index, path) in enumeration.files.iter().enumerate() {
            let percent = (index * 100 / total) as u8;
            emit(
                events,
                WorkerEvent::Progress {
                    percent,
                    message: format!("Processing {}", path.display()),
                },
            );

            let record = FileRecord::read(path);
            if record.is_error() {
                read_errors += 1;
            }
            writer.append(&record)?;
        }

        let files_processed = writer.records_written();
        let bytes_written = writer.bytes_written();
        let output_path = writer.finish()?;

        emit(
            events,
            WorkerEvent::Progress {
                percent: 100,
                message: "All files processed".to_string(),
            },
        );
        emit(
            events,
            WorkerEvent::Status {
                message: "Completed".to_string(),
            },
        );
        emit(
            events,
            WorkerEvent::Completed {
                output_path: output_path.clone(),
            },
        );

        Ok(TraversalOutcome::Completed(TraversalSummary {
            files_processed,
            read_errors,
            scan_skips: enumeration.walk_errors.len(),
            bytes_written,
            output_path,
            elapsed: started.elapsed(),
        }))
    }
}

// A dropped receiver only means nobody is watching; the run itself continues.
fn emit(events: &EventSender, event: WorkerEvent) {
    let _ = events.send(event);
}
