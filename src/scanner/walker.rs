use crate::error::{FolderPrintError, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Result of enumerating a directory tree: every regular file found, plus
/// descriptions of entries the walk could not read.
#[derive(Debug)]
pub struct Enumeration {
    pub files: Vec<PathBuf>,
    pub walk_errors: Vec<String>,
}

impl Enumeration {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }
}

pub struct FolderWalker {
    excluded_file: Option<PathBuf>,
}

impl FolderWalker {
    pub fn new() -> Self {
        Self {
            excluded_file: None,
        }
    }

    /// Excludes a single file path from enumeration. Used to keep the report
    /// artifact of a prior run out of the next run's input set.
    pub fn with_excluded_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.excluded_file = Some(path.into());
        self
    }

    pub fn enumerate<P: AsRef<Path>>(&self, root: P) -> Result<Enumeration> {
        let root_path = root.as_ref();

        if !root_path.exists() {
            return Err(FolderPrintError::InvalidPath {
                path: root_path.display().to_string(),
            });
        }

        if !root_path.is_dir() {
            return Err(FolderPrintError::InvalidPath {
                path: format!("{} is not a directory", root_path.display()),
            });
        }

        let mut files = Vec::new();
        let mut walk_errors = Vec::new();

        let walker = WalkDir::new(root_path).follow_links(false); // Security: don't follow symlinks

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    // Unreadable entries are skipped, never fatal
                    if err
                        .io_error()
                        .is_some_and(|e| e.kind() == std::io::ErrorKind::PermissionDenied)
                    {
                        walk_errors.push(format!("Permission denied: {}", err));
                    } else {
                        walk_errors.push(format!("Scan error: {}", err));
                    }
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            if self.is_excluded(entry.path()) {
                continue;
            }

            files.push(entry.path().to_path_buf());
        }

        Ok(Enumeration { files, walk_errors })
    }

    fn is_excluded(&self, path: &Path) -> bool {
        self.excluded_file
            .as_deref()
            .is_some_and(|excluded| path == excluded)
    }
}

impl Default for FolderWalker {
    fn default() -> Self {
        Self::new()
    }
}
