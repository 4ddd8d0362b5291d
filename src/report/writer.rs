use crate::error::Result;
use crate::report::record::{FileRecord, ReadOutcome};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Width of the `=` separator line between report blocks.
pub const SEPARATOR_WIDTH: usize = 50;

/// Serializes FileRecords into the report artifact, one block per file:
///
/// ```text
/// File: <path>
/// Content:
/// <content>
///
/// ==================================================
///
/// ```
///
/// An unreadable file's block carries `Error reading file: <message>` in
/// place of the `Content:` section. Blocks are written in append order and
/// the artifact is complete once `finish` returns.
pub struct ReportWriter {
    writer: BufWriter<File>,
    path: PathBuf,
    records_written: usize,
    bytes_written: u64,
}

impl ReportWriter {
    pub fn create<P: Into<PathBuf>>(path: P) -> Result<Self> {
        let path = path.into();
        let file = File::create(&path)?;

        Ok(Self {
            writer: BufWriter::new(file),
            path,
            records_written: 0,
            bytes_written: 0,
        })
    }

    pub fn append(&mut self, record: &FileRecord) -> Result<()> {
        let block = render_block(record);
        self.writer.write_all(block.as_bytes())?;

        self.records_written += 1;
        self.bytes_written += block.len() as u64;

        Ok(())
    }

    pub fn records_written(&self) -> usize {
        self.records_written
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flushes buffered blocks and hands back the artifact path.
    pub fn finish(mut self) -> Result<PathBuf> {
        self.writer.flush()?;
        Ok(self.path)
    }
}

fn render_block(record: &FileRecord) -> String {
    let mut block = format!("File: {}\n", record.path.display());

    match &record.outcome {
        ReadOutcome::Content(content) => {
            block.push_str("Content:\n");
            block.push_str(content);
            block.push('\n');
        }
        ReadOutcome::Error(message) => {
            block.push_str(&format!("Error reading file: {}\n", message));
        }
    }

    block.push('\n');
    block.push_str(&"=".repeat(SEPARATOR_WIDTH));
    block.push_str("\n\n");

    block
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn content_record(path: &str, content: &str) -> FileRecord {
        FileRecord {
            path: PathBuf::from(path),
            outcome: ReadOutcome::Content(content.to_string()),
        }
    }

    fn error_record(path: &str, message: &str) -> FileRecord {
        FileRecord {
            path: PathBuf::from(path),
            outcome: ReadOutcome::Error(message.to_string()),
        }
    }

    /// Inverse of `render_block`, for checking that the artifact preserves
    /// every record. Returns (path, Ok(content) | Err(error)) per block.
    fn parse_report(text: &str) -> Vec<(String, std::result::Result<String, String>)> {
        let separator = format!("\n{}\n\n", "=".repeat(SEPARATOR_WIDTH));
        let mut records = Vec::new();

        for chunk in text.split(&separator) {
            if chunk.is_empty() {
                continue;
            }

            let (first_line, rest) = chunk.split_once('\n').expect("block has a path line");
            let path = first_line
                .strip_prefix("File: ")
                .expect("block starts with File:")
                .to_string();

            let outcome = if let Some(content) = rest.strip_prefix("Content:\n") {
                Ok(content
                    .strip_suffix('\n')
                    .expect("content section ends with newline")
                    .to_string())
            } else if let Some(error) = rest.strip_prefix("Error reading file: ") {
                Err(error
                    .strip_suffix('\n')
                    .expect("error section ends with newline")
                    .to_string())
            } else {
                panic!("block has neither content nor error section");
            };

            records.push((path, outcome));
        }

        records
    }

    #[test]
    fn test_block_format_for_content() {
        let temp_dir = TempDir::new().unwrap();
        let artifact = temp_dir.path().join("report.txt");

        let mut writer = ReportWriter::create(&artifact).unwrap();
        writer.append(&content_record("a.txt", "hello")).unwrap();
        writer.finish().unwrap();

        let text = fs::read_to_string(&artifact).unwrap();
        let expected = format!("File: a.txt\nContent:\nhello\n\n{}\n\n", "=".repeat(50));
        assert_eq!(text, expected);
    }

    #[test]
    fn test_block_format_for_error() {
        let temp_dir = TempDir::new().unwrap();
        let artifact = temp_dir.path().join("report.txt");

        let mut writer = ReportWriter::create(&artifact).unwrap();
        writer
            .append(&error_record("b.bin", "stream did not contain valid UTF-8"))
            .unwrap();
        writer.finish().unwrap();

        let text = fs::read_to_string(&artifact).unwrap();
        assert!(text.starts_with("File: b.bin\nError reading file: stream did not contain valid UTF-8\n"));
        assert!(!text.contains("Content:"));
    }

    #[test]
    fn test_round_trip_preserves_order_and_data() {
        let temp_dir = TempDir::new().unwrap();
        let artifact = temp_dir.path().join("report.txt");

        let records = [
            content_record("src/a.txt", "hello"),
            error_record("src/b.bin", "invalid utf-8 sequence"),
            content_record("src/c.txt", "multi\nline\ncontent"),
        ];

        let mut writer = ReportWriter::create(&artifact).unwrap();
        for record in &records {
            writer.append(record).unwrap();
        }
        writer.finish().unwrap();

        let text = fs::read_to_string(&artifact).unwrap();
        let parsed = parse_report(&text);

        assert_eq!(parsed.len(), records.len());
        assert_eq!(parsed[0], ("src/a.txt".to_string(), Ok("hello".to_string())));
        assert_eq!(
            parsed[1],
            (
                "src/b.bin".to_string(),
                Err("invalid utf-8 sequence".to_string())
            )
        );
        assert_eq!(
            parsed[2],
            (
                "src/c.txt".to_string(),
                Ok("multi\nline\ncontent".to_string())
            )
        );
    }

    #[test]
    fn test_writer_counts_records_and_bytes() {
        let temp_dir = TempDir::new().unwrap();
        let artifact = temp_dir.path().join("report.txt");

        let mut writer = ReportWriter::create(&artifact).unwrap();
        writer.append(&content_record("a.txt", "one")).unwrap();
        writer.append(&content_record("b.txt", "two")).unwrap();

        assert_eq!(writer.records_written(), 2);
        let bytes = writer.bytes_written();
        writer.finish().unwrap();

        let on_disk = fs::metadata(&artifact).unwrap().len();
        assert_eq!(bytes, on_disk);
    }

    #[test]
    fn test_separator_is_fifty_equals_signs() {
        let temp_dir = TempDir::new().unwrap();
        let artifact = temp_dir.path().join("report.txt");

        let mut writer = ReportWriter::create(&artifact).unwrap();
        writer.append(&content_record("a.txt", "x")).unwrap();
        writer.finish().unwrap();

        let text = fs::read_to_string(&artifact).unwrap();
        let separator_line = text
            .lines()
            .find(|line| line.starts_with('='))
            .expect("artifact contains a separator line");
        assert_eq!(separator_line.len(), 50);
        assert!(separator_line.chars().all(|c| c == '='));
    }
}
