use crate::error::{FolderPrintError, Result};
use crate::unlock::service::DocumentUnlocker;
use regex::Regex;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// CFB/OLE compound-file signature. Office stores OFFCRYPTO-encrypted OOXML
/// documents in this container instead of a plain ZIP package.
const CFB_SIGNATURE: [u8; 8] = [0xd0, 0xcf, 0x11, 0xe0, 0xa1, 0xb1, 0x1a, 0xe1];

/// Protection settings elements, with or without a namespace prefix. All of
/// them are written self-closing by Office.
const PROTECTION_PATTERNS: &[&str] = &[
    r"<(?:\w+:)?documentProtection\b[^>]*/>",
    r"<(?:\w+:)?writeProtection\b[^>]*/>",
    r"<(?:\w+:)?sheetProtection\b[^>]*/>",
    r"<(?:\w+:)?workbookProtection\b[^>]*/>",
    r"<(?:\w+:)?fileSharing\b[^>]*/>",
];

struct EntryData {
    name: String,
    is_dir: bool,
    bytes: Vec<u8>,
}

/// DOCX/XLSX provider. Package and entry cryptography are owned by the `zip`
/// crate: entries encrypted with a package password are decrypted and the
/// package rewritten in the clear; unencrypted packages have their
/// protection settings elements stripped instead.
pub struct OoxmlUnlocker {
    protection_patterns: Vec<Regex>,
}

impl OoxmlUnlocker {
    pub fn new() -> Self {
        let protection_patterns = PROTECTION_PATTERNS
            .iter()
            .filter_map(|pattern| Regex::new(pattern).ok())
            .collect();

        Self {
            protection_patterns,
        }
    }

    fn strip_protection(&self, text: &str) -> (String, bool) {
        let mut result = text.to_string();
        let mut changed = false;

        for pattern in &self.protection_patterns {
            if pattern.is_match(&result) {
                result = pattern.replace_all(&result, "").into_owned();
                changed = true;
            }
        }

        (result, changed)
    }
}

impl Default for OoxmlUnlocker {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentUnlocker for OoxmlUnlocker {
    fn extensions(&self) -> &[&str] {
        &["docx", "xlsx"]
    }

    fn unlock(&self, source: &Path, password: &str, destination: &Path) -> Result<()> {
        if is_cfb_envelope(source)? {
            return Err(FolderPrintError::UnsupportedEncryption {
                path: source.display().to_string(),
                scheme: "Office CFB/OFFCRYPTO envelope".to_string(),
            });
        }

        let file = File::open(source)?;
        let mut archive =
            ZipArchive::new(BufReader::new(file)).map_err(|e| unlock_error(source, e))?;

        let mut entries = Vec::with_capacity(archive.len());
        let mut had_encrypted_entries = false;

        for index in 0..archive.len() {
            // First borrow must end before the decrypt fallback can start
            let plain = match archive.by_index(index) {
                Ok(mut entry) => {
                    let name = entry.name().to_string();
                    let is_dir = entry.is_dir();
                    let bytes = read_entry(&mut entry)?;
                    Some(EntryData {
                        name,
                        is_dir,
                        bytes,
                    })
                }
                Err(_) => None,
            };

            let data = match plain {
                Some(data) => data,
                None => match archive.by_index_decrypt(index, password.as_bytes()) {
                    Ok(mut entry) => {
                        had_encrypted_entries = true;
                        let name = entry.name().to_string();
                        let is_dir = entry.is_dir();
                        let bytes = read_entry(&mut entry)?;
                        EntryData {
                            name,
                            is_dir,
                            bytes,
                        }
                    }
                    Err(ZipError::InvalidPassword) => {
                        return Err(FolderPrintError::IncorrectPassword {
                            path: source.display().to_string(),
                        });
                    }
                    Err(e) => return Err(unlock_error(source, e)),
                },
            };

            entries.push(data);
        }

        let mut stripped_any = false;
        for entry in &mut entries {
            if !is_protection_part(&entry.name) {
                continue;
            }

            if let Ok(text) = std::str::from_utf8(&entry.bytes) {
                let (stripped, changed) = self.strip_protection(text);
                if changed {
                    entry.bytes = stripped.into_bytes();
                    stripped_any = true;
                }
            }
        }

        if !had_encrypted_entries && !stripped_any {
            return Err(FolderPrintError::NotProtected {
                path: source.display().to_string(),
            });
        }

        write_package(destination, &entries)
    }
}

fn is_cfb_envelope(path: &Path) -> Result<bool> {
    let mut file = File::open(path)?;
    let mut magic = [0u8; 8];

    match file.read_exact(&mut magic) {
        Ok(()) => Ok(magic == CFB_SIGNATURE),
        // Shorter than the signature; cannot be a CFB container
        Err(_) => Ok(false),
    }
}

fn is_protection_part(name: &str) -> bool {
    name == "word/settings.xml"
        || name == "xl/workbook.xml"
        || (name.starts_with("xl/worksheets/") && name.ends_with(".xml"))
}

fn read_entry<R: Read>(entry: &mut R) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    entry.read_to_end(&mut bytes)?;
    Ok(bytes)
}

fn write_package(destination: &Path, entries: &[EntryData]) -> Result<()> {
    let out = File::create(destination)?;
    let mut writer = ZipWriter::new(BufWriter::new(out));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for entry in entries {
        if entry.is_dir {
            writer
                .add_directory(entry.name.clone(), options)
                .map_err(|e| unlock_error(destination, e))?;
        } else {
            writer
                .start_file(entry.name.clone(), options)
                .map_err(|e| unlock_error(destination, e))?;
            writer.write_all(&entry.bytes)?;
        }
    }

    let mut inner = writer.finish().map_err(|e| unlock_error(destination, e))?;
    inner.flush()?;

    Ok(())
}

fn unlock_error(path: &Path, error: ZipError) -> FolderPrintError {
    FolderPrintError::Unlock {
        path: path.display().to_string(),
        message: error.to_string(),
    }
}
