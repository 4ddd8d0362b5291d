use crate::error::{FolderPrintError, Result};
use crate::unlock::service::DocumentUnlocker;
use lopdf::Document;
use std::path::Path;

/// PDF provider. Decryption itself is owned by `lopdf`; this provider loads
/// the document, authenticates the password, and saves a copy with the
/// encryption dictionary removed.
pub struct PdfUnlocker;

impl PdfUnlocker {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PdfUnlocker {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentUnlocker for PdfUnlocker {
    fn extensions(&self) -> &[&str] {
        &["pdf"]
    }

    fn unlock(&self, source: &Path, password: &str, destination: &Path) -> Result<()> {
        let mut document = Document::load(source).map_err(|e| FolderPrintError::Unlock {
            path: source.display().to_string(),
            message: e.to_string(),
        })?;

        if !document.is_encrypted() {
            return Err(FolderPrintError::NotProtected {
                path: source.display().to_string(),
            });
        }

        document.decrypt(password).map_err(|e| {
            let message = e.to_string();
            if message.to_lowercase().contains("password") {
                FolderPrintError::IncorrectPassword {
                    path: source.display().to_string(),
                }
            } else {
                FolderPrintError::Unlock {
                    path: source.display().to_string(),
                    message,
                }
            }
        })?;

        // Objects are cleartext after decrypt; without this a reader would
        // still treat the copy as encrypted.
        document.trailer.remove(b"Encrypt");

        document
            .save(destination)
            .map_err(|e| FolderPrintError::Unlock {
                path: destination.display().to_string(),
                message: e.to_string(),
            })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::{dictionary, Object};
    use tempfile::TempDir;

    fn write_minimal_pdf(path: &Path) {
        let mut document = Document::with_version("1.5");
        let pages_id = document.new_object_id();

        let page_id = document.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(612),
                Object::Integer(792),
            ],
        });

        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::Reference(page_id)],
            "Count" => Object::Integer(1),
        };
        document
            .objects
            .insert(pages_id, Object::Dictionary(pages));

        let catalog_id = document.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        document.trailer.set("Root", catalog_id);

        document.save(path).unwrap();
    }

    #[test]
    fn test_handles_pdf_extension() {
        assert_eq!(PdfUnlocker::new().extensions(), &["pdf"]);
    }

    #[test]
    fn test_unencrypted_pdf_is_not_protected() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("plain.pdf");
        write_minimal_pdf(&source);

        let destination = temp_dir.path().join("plain_unlocked.pdf");
        let result = PdfUnlocker::new().unlock(&source, "pw", &destination);

        assert!(matches!(result, Err(FolderPrintError::NotProtected { .. })));
        assert!(!destination.exists());
    }

    #[test]
    fn test_garbage_file_is_a_descriptive_failure() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("broken.pdf");
        std::fs::write(&source, b"not a pdf at all").unwrap();

        let destination = temp_dir.path().join("broken_unlocked.pdf");
        let result = PdfUnlocker::new().unlock(&source, "pw", &destination);

        match result {
            Err(FolderPrintError::Unlock { message, .. }) => assert!(!message.is_empty()),
            other => panic!("Expected an unlock failure, got {:?}", other),
        }
    }
}
