use crate::config::UnlockConfig;
use crate::error::{FolderPrintError, Result};
use crate::unlock::{OoxmlUnlocker, PdfUnlocker, XmlUnlocker};
use std::path::{Path, PathBuf};

/// One format-specific unlock implementation. Providers never modify the
/// source file; they write an unlocked copy to `destination` (truncating it
/// when overwrite is enabled).
pub trait DocumentUnlocker: Send + Sync {
    /// Lowercase file extensions this provider handles.
    fn extensions(&self) -> &[&str];

    /// Removes password protection from `source`, writing the unlocked copy
    /// to `destination`.
    fn unlock(&self, source: &Path, password: &str, destination: &Path) -> Result<()>;
}

/// Dispatches unlock requests to the provider registered for the source
/// file's extension and owns the destination-path policy.
pub struct UnlockService {
    config: UnlockConfig,
    providers: Vec<Box<dyn DocumentUnlocker>>,
}

impl UnlockService {
    pub fn new(config: UnlockConfig) -> Self {
        Self {
            config,
            providers: vec![
                Box::new(PdfUnlocker::new()),
                Box::new(OoxmlUnlocker::new()),
                Box::new(XmlUnlocker::new()),
            ],
        }
    }

    /// Unlocks `source` with `password`, returning the path of the new file.
    /// With no explicit `destination` the copy lands beside the source as
    /// `<stem><suffix>.<ext>`.
    pub fn unlock_file(
        &self,
        source: &Path,
        password: &str,
        destination: Option<&Path>,
    ) -> Result<PathBuf> {
        if !source.is_file() {
            return Err(FolderPrintError::InvalidPath {
                path: source.display().to_string(),
            });
        }

        let extension = source
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        let provider =
            self.provider_for(&extension)
                .ok_or_else(|| FolderPrintError::UnsupportedFormat {
                    path: source.display().to_string(),
                    extension: if extension.is_empty() {
                        "(none)".to_string()
                    } else {
                        extension.clone()
                    },
                })?;

        let destination = match destination {
            Some(path) => path.to_path_buf(),
            None => self.default_destination(source, &extension),
        };

        if destination.exists() && !self.config.overwrite {
            return Err(FolderPrintError::OutputExists {
                path: destination.display().to_string(),
            });
        }

        if let Err(err) = provider.unlock(source, password, &destination) {
            // Never leave a half-written copy behind
            let _ = std::fs::remove_file(&destination);
            return Err(err);
        }

        preserve_modified_time(source, &destination);

        Ok(destination)
    }

    pub fn supported_extensions(&self) -> Vec<&str> {
        self.providers
            .iter()
            .flat_map(|provider| provider.extensions().iter().copied())
            .collect()
    }

    fn provider_for(&self, extension: &str) -> Option<&dyn DocumentUnlocker> {
        self.providers
            .iter()
            .find(|provider| provider.extensions().contains(&extension))
            .map(|boxed| boxed.as_ref())
    }

    fn default_destination(&self, source: &Path, extension: &str) -> PathBuf {
        let stem = source
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("document");

        let filename = if extension.is_empty() {
            format!("{}{}", stem, self.config.suffix)
        } else {
            format!("{}{}.{}", stem, self.config.suffix, extension)
        };

        source.with_file_name(filename)
    }
}

// Preserve modification time; a copy that cannot take it is still unlocked.
fn preserve_modified_time(source: &Path, destination: &Path) {
    if let Ok(metadata) = std::fs::metadata(source) {
        let mtime = filetime::FileTime::from_last_modification_time(&metadata);
        let _ = filetime::set_file_mtime(destination, mtime);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const PROTECTED_XML: &str = concat!(
        "<?xml version=\"1.0\"?>",
        "<w:wordDocument xmlns:w=\"http://schemas.microsoft.com/office/word/2003/wordml\">",
        "<w:docPr><w:documentProtection w:edit=\"read-only\" w:unprotectPassword=\"9B54\"/></w:docPr>",
        "<w:body/></w:wordDocument>"
    );

    fn service() -> UnlockService {
        UnlockService::new(UnlockConfig::default())
    }

    #[test]
    fn test_missing_source_is_invalid_path() {
        let result = service().unlock_file(Path::new("/no/such/file.pdf"), "pw", None);
        assert!(matches!(result, Err(FolderPrintError::InvalidPath { .. })));
    }

    #[test]
    fn test_unsupported_extension_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("notes.odt");
        fs::write(&source, "odt bytes").unwrap();

        let result = service().unlock_file(&source, "pw", None);
        match result {
            Err(FolderPrintError::UnsupportedFormat { extension, .. }) => {
                assert_eq!(extension, "odt");
            }
            other => panic!("Expected unsupported format, got {:?}", other),
        }
    }

    #[test]
    fn test_default_destination_uses_suffix() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("memo.xml");
        fs::write(&source, PROTECTED_XML).unwrap();

        let unlocked = service().unlock_file(&source, "pw", None).unwrap();

        assert_eq!(unlocked, temp_dir.path().join("memo_unlocked.xml"));
        assert!(unlocked.exists());
        // The source is never modified
        assert_eq!(fs::read_to_string(&source).unwrap(), PROTECTED_XML);
    }

    #[test]
    fn test_existing_destination_is_refused_without_overwrite() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("memo.xml");
        fs::write(&source, PROTECTED_XML).unwrap();
        let destination = temp_dir.path().join("memo_unlocked.xml");
        fs::write(&destination, "already here").unwrap();

        let result = service().unlock_file(&source, "pw", None);

        assert!(matches!(result, Err(FolderPrintError::OutputExists { .. })));
        assert_eq!(fs::read_to_string(&destination).unwrap(), "already here");
    }

    #[test]
    fn test_overwrite_replaces_existing_destination() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("memo.xml");
        fs::write(&source, PROTECTED_XML).unwrap();
        let destination = temp_dir.path().join("memo_unlocked.xml");
        fs::write(&destination, "stale copy").unwrap();

        let config = UnlockConfig {
            overwrite: true,
            ..UnlockConfig::default()
        };
        let unlocked = UnlockService::new(config)
            .unlock_file(&source, "pw", None)
            .unwrap();

        let text = fs::read_to_string(&unlocked).unwrap();
        assert!(!text.contains("documentProtection"));
        assert!(!text.contains("stale copy"));
    }

    #[test]
    fn test_explicit_destination_is_honored() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("memo.xml");
        fs::write(&source, PROTECTED_XML).unwrap();
        let destination = temp_dir.path().join("plain.xml");

        let unlocked = service()
            .unlock_file(&source, "pw", Some(&destination))
            .unwrap();

        assert_eq!(unlocked, destination);
        assert!(destination.exists());
    }

    #[test]
    fn test_failed_unlock_leaves_no_destination() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("plain.xml");
        fs::write(&source, "<doc>no protection here</doc>").unwrap();

        let result = service().unlock_file(&source, "pw", None);

        assert!(matches!(result, Err(FolderPrintError::NotProtected { .. })));
        assert!(!temp_dir.path().join("plain_unlocked.xml").exists());
    }

    #[test]
    fn test_supported_extensions_cover_all_formats() {
        let service = service();
        let extensions = service.supported_extensions();
        for expected in ["pdf", "docx", "xlsx", "xml"] {
            assert!(extensions.contains(&expected), "missing {}", expected);
        }
    }
}
