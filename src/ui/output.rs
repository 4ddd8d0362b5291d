use crate::error::{FolderPrintError, UserFriendlyError};
use crate::ui::progress::format_duration;
use crate::worker::TraversalSummary;
use console::{style, Emoji, StyledObject, Term};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputMode {
    Human,
    Json,
    Plain,
}

// Emojis with text fallbacks
static CHECKMARK: Emoji = Emoji("✅ ", "✓ ");
static CROSS: Emoji = Emoji("❌ ", "✗ ");
static INFO: Emoji = Emoji("ℹ️  ", "i ");
static WARNING: Emoji = Emoji("⚠️  ", "! ");
static ROCKET: Emoji = Emoji("🚀 ", "> ");

/// Visual treatment of one message line in Human mode.
#[derive(Debug, Clone, Copy)]
enum Tone {
    Success,
    Error,
    Warning,
    Info,
}

impl Tone {
    fn emoji(self) -> Emoji<'static, 'static> {
        match self {
            Tone::Success => CHECKMARK,
            Tone::Error => CROSS,
            Tone::Warning => WARNING,
            Tone::Info => INFO,
        }
    }

    fn bare_prefix(self) -> &'static str {
        match self {
            Tone::Success => "✓",
            Tone::Error => "✗",
            Tone::Warning => "!",
            Tone::Info => "i",
        }
    }

    fn paint(self, text: &str) -> StyledObject<&str> {
        match self {
            Tone::Success => style(text).green().bold(),
            Tone::Error => style(text).red().bold(),
            Tone::Warning => style(text).yellow().bold(),
            Tone::Info => style(text).cyan(),
        }
    }

    // Errors go to stderr in every mode; everything else is stdout.
    fn to_stderr(self) -> bool {
        matches!(self, Tone::Error)
    }
}

pub struct OutputFormatter {
    mode: OutputMode,
    use_colors: bool,
    verbose_level: u8,
    quiet: bool,
}

impl OutputFormatter {
    pub fn new(mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let colors_supported = Term::stdout().features().colors_supported();

        Self {
            mode,
            use_colors: mode == OutputMode::Human && colors_supported && !quiet,
            verbose_level: if quiet { 0 } else { verbose },
            quiet,
        }
    }

    pub fn success(&self, message: &str) {
        self.emit(Tone::Success, "success", message);
    }

    pub fn error(&self, message: &str) {
        self.emit(Tone::Error, "error", message);
    }

    pub fn warning(&self, message: &str) {
        if self.should_show_message(1) {
            self.emit(Tone::Warning, "warning", message);
        }
    }

    pub fn info(&self, message: &str) {
        if self.should_show_message(1) {
            self.emit(Tone::Info, "info", message);
        }
    }

    /// Run-outcome lines ("No files found"); visible unless quiet.
    pub fn status(&self, message: &str) {
        if self.should_show_message(0) {
            self.emit(Tone::Info, "status", message);
        }
    }

    pub fn debug(&self, message: &str) {
        if !self.should_show_message(2) {
            return;
        }
        match self.mode {
            OutputMode::Human if self.use_colors => println!("  {}", style(message).dim()),
            OutputMode::Human => println!("  DEBUG: {}", message),
            OutputMode::Json => self.json_line("debug", message),
            OutputMode::Plain => println!("DEBUG: {}", message),
        }
    }

    pub fn start_operation(&self, operation: &str) {
        if !self.should_show_message(0) {
            return;
        }
        match self.mode {
            OutputMode::Human if self.use_colors => {
                println!("{}{}", ROCKET, style(operation).bold());
            }
            OutputMode::Human => println!("> {}", operation),
            OutputMode::Json => self.json_line("operation_start", operation),
            OutputMode::Plain => println!("STARTING: {}", operation),
        }
    }

    pub fn print_user_friendly_error(&self, error: &FolderPrintError) {
        self.error(&error.user_message());

        let suggestion = match error.suggestion() {
            Some(suggestion) => suggestion,
            None => return,
        };
        match self.mode {
            OutputMode::Human if self.use_colors => {
                println!();
                let hint = format!("Suggestion: {}", suggestion);
                println!("{}{}", INFO, style(hint.as_str()).cyan());
            }
            OutputMode::Human => {
                println!();
                println!("Suggestion: {}", suggestion);
            }
            OutputMode::Json => self.json_object(serde_json::json!({
                "type": "suggestion",
                "message": suggestion,
            })),
            OutputMode::Plain => println!("SUGGESTION: {}", suggestion),
        }
    }

    pub fn print_run_summary(&self, summary: &TraversalSummary) {
        if self.quiet {
            return;
        }

        match self.mode {
            OutputMode::Human => self.human_run_summary(summary),
            OutputMode::Json => self.json_run_summary(summary),
            OutputMode::Plain => {
                println!("COMPLETED: Folder report");
                println!("Files processed: {}", summary.files_processed);
                println!("Read errors: {}", summary.read_errors);
                println!("Bytes written: {}", summary.bytes_written);
                println!("Output: {}", summary.output_path.display());
                println!("Duration: {:?}", summary.elapsed);
            }
        }
    }

    pub fn print_unlock_summary(&self, source: &Path, destination: &Path) {
        match self.mode {
            OutputMode::Human => {
                self.success(&format!(
                    "Unlocked copy written to {}",
                    destination.display()
                ));
            }
            OutputMode::Json => self.json_object(serde_json::json!({
                "type": "unlock_summary",
                "source": source.display().to_string(),
                "destination": destination.display().to_string(),
                "timestamp": chrono::Utc::now().to_rfc3339(),
            })),
            OutputMode::Plain => {
                println!(
                    "UNLOCKED: {} -> {}",
                    source.display(),
                    destination.display()
                );
            }
        }
    }

    pub fn print_separator(&self) {
        if self.quiet {
            return;
        }

        match self.mode {
            OutputMode::Human if self.use_colors => println!("{}", style("─".repeat(60)).dim()),
            OutputMode::Human | OutputMode::Plain => println!("{}", "-".repeat(60)),
            OutputMode::Json => {}
        }
    }

    fn should_show_message(&self, min_verbose_level: u8) -> bool {
        !self.quiet && self.verbose_level >= min_verbose_level
    }

    fn emit(&self, tone: Tone, level: &str, message: &str) {
        match self.mode {
            OutputMode::Human => {
                let line = if self.use_colors {
                    format!("{}{}", tone.emoji(), tone.paint(message))
                } else {
                    format!("{} {}", tone.bare_prefix(), message)
                };
                if tone.to_stderr() {
                    eprintln!("{}", line);
                } else {
                    println!("{}", line);
                }
            }
            OutputMode::Json => self.json_line(level, message),
            OutputMode::Plain => {
                let line = format!("{}: {}", level.to_ascii_uppercase(), message);
                if tone.to_stderr() {
                    eprintln!("{}", line);
                } else {
                    println!("{}", line);
                }
            }
        }
    }

    fn json_line(&self, level: &str, message: &str) {
        self.json_object(serde_json::json!({
            "type": "message",
            "level": level,
            "message": message,
            "timestamp": chrono::Utc::now().to_rfc3339(),
        }));
    }

    fn json_object(&self, value: serde_json::Value) {
        match serde_json::to_string(&value) {
            Ok(line) => println!("{}", line),
            Err(_) => println!("{{}}"),
        }
    }

    // Accent color for summary values; identity when colors are off.
    fn accent(&self, text: String) -> String {
        if self.use_colors {
            style(text).cyan().bold().to_string()
        } else {
            text
        }
    }

    fn human_run_summary(&self, summary: &TraversalSummary) {
        println!();
        self.print_separator();

        if self.use_colors {
            println!(
                "{} {}",
                style("Folder report completed!").green().bold(),
                CHECKMARK
            );
        } else {
            println!("✓ Folder report completed!");
        }

        println!();
        println!(
            "  Files processed: {}",
            self.accent(summary.files_processed.to_string())
        );
        println!(
            "  Report size:     {}",
            self.accent(format_bytes(summary.bytes_written))
        );
        println!(
            "  Time taken:      {}",
            self.accent(format_duration(summary.elapsed))
        );

        if summary.read_errors > 0 {
            println!(
                "  Read errors:     {} (recorded in the report)",
                summary.read_errors
            );
        }

        if summary.scan_skips > 0 {
            println!("  Skipped entries: {}", summary.scan_skips);
        }

        println!("  Report location: {}", summary.output_path.display());

        self.print_separator();
    }

    fn json_run_summary(&self, summary: &TraversalSummary) {
        let payload = serde_json::json!({
            "type": "summary",
            "files_processed": summary.files_processed,
            "read_errors": summary.read_errors,
            "scan_skips": summary.scan_skips,
            "bytes_written": summary.bytes_written,
            "output_path": summary.output_path.display().to_string(),
            "duration_ms": summary.elapsed.as_millis(),
            "timestamp": chrono::Utc::now().to_rfc3339(),
        });

        match serde_json::to_string_pretty(&payload) {
            Ok(text) => println!("{}", text),
            Err(_) => println!("{{}}"),
        }
    }
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{} B", bytes);
    }

    let mut value = bytes as f64;
    let mut unit = "B";
    for next in ["KB", "MB", "GB"] {
        if value < 1024.0 {
            break;
        }
        value /= 1024.0;
        unit = next;
    }
    format!("{:.1} {}", value, unit)
}

/// Prints through the formatter while keeping any live progress bars intact.
pub struct ProgressAwareOutput<'a> {
    formatter: &'a OutputFormatter,
    progress_manager: Option<&'a crate::ui::ProgressManager>,
}

impl<'a> ProgressAwareOutput<'a> {
    pub fn new(
        formatter: &'a OutputFormatter,
        progress_manager: Option<&'a crate::ui::ProgressManager>,
    ) -> Self {
        Self {
            formatter,
            progress_manager,
        }
    }

    pub fn suspend_and_print<F>(&self, f: F)
    where
        F: FnOnce(&OutputFormatter),
    {
        match self.progress_manager {
            Some(pm) => pm.suspend(|| f(self.formatter)),
            None => f(self.formatter),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_is_zeroed_by_quiet() {
        let formatter = OutputFormatter::new(OutputMode::Human, 2, true);
        assert_eq!(formatter.verbose_level, 0);
        assert!(formatter.quiet);
        assert!(!formatter.use_colors);

        let formatter = OutputFormatter::new(OutputMode::Human, 1, false);
        assert_eq!(formatter.verbose_level, 1);
        assert!(!formatter.quiet);
    }

    #[test]
    fn test_non_human_modes_never_color() {
        assert!(!OutputFormatter::new(OutputMode::Json, 0, false).use_colors);
        assert!(!OutputFormatter::new(OutputMode::Plain, 0, false).use_colors);
    }

    #[test]
    fn test_message_gating_by_level() {
        let formatter = OutputFormatter::new(OutputMode::Human, 2, false);
        assert!(formatter.should_show_message(0));
        assert!(formatter.should_show_message(2));
        assert!(!formatter.should_show_message(3));

        let quiet = OutputFormatter::new(OutputMode::Human, 2, true);
        assert!(!quiet.should_show_message(0));
    }

    #[test]
    fn test_format_bytes_scales_units() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(1024), "1.0 KB");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(1048576), "1.0 MB");
        assert_eq!(format_bytes(1073741824), "1.0 GB");
    }
}
