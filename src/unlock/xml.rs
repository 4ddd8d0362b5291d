use crate::error::{FolderPrintError, Result};
use crate::unlock::service::DocumentUnlocker;
use regex::Regex;
use std::path::Path;

/// Protection settings elements of Word 2003 XML documents. Self-closing,
/// with or without the `w:` namespace prefix.
const PROTECTION_PATTERNS: &[&str] = &[
    r"<(?:\w+:)?documentProtection\b[^>]*/>",
    r"<(?:\w+:)?writeProtection\b[^>]*/>",
];

/// Word 2003 XML provider. The protection password is stored as a settings
/// hash, so unlocking is a matter of dropping the settings elements and
/// writing the document back out.
pub struct XmlUnlocker {
    protection_patterns: Vec<Regex>,
}

impl XmlUnlocker {
    pub fn new() -> Self {
        let protection_patterns = PROTECTION_PATTERNS
            .iter()
            .filter_map(|pattern| Regex::new(pattern).ok())
            .collect();

        Self {
            protection_patterns,
        }
    }
}

impl Default for XmlUnlocker {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentUnlocker for XmlUnlocker {
    fn extensions(&self) -> &[&str] {
        &["xml"]
    }

    fn unlock(&self, source: &Path, _password: &str, destination: &Path) -> Result<()> {
        let text = std::fs::read_to_string(source)?;

        let mut stripped = text;
        let mut changed = false;
        for pattern in &self.protection_patterns {
            if pattern.is_match(&stripped) {
                stripped = pattern.replace_all(&stripped, "").into_owned();
                changed = true;
            }
        }

        if !changed {
            return Err(FolderPrintError::NotProtected {
                path: source.display().to_string(),
            });
        }

        std::fs::write(destination, stripped)?;

        Ok(())
    }
}
