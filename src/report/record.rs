use std::path::PathBuf;

/// Outcome of one attempted file read. A record carries either the file's
/// UTF-8 content or the error message that replaced it, never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    Content(String),
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub path: PathBuf,
    pub outcome: ReadOutcome,
}

impl FileRecord {
    /// Reads `path` as UTF-8 text. Any failure (permission, non-UTF-8 bytes,
    /// file vanished between enumeration and read) becomes an error record
    /// rather than aborting the caller's run.
    pub fn read<P: Into<PathBuf>>(path: P) -> Self {
        let path = path.into();

        let outcome = match std::fs::read_to_string(&path) {
            Ok(content) => ReadOutcome::Content(content),
            Err(err) => ReadOutcome::Error(err.to_string()),
        };

        Self { path, outcome }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.outcome, ReadOutcome::Error(_))
    }
}
