use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::time::Duration;

const TICK_INTERVAL: Duration = Duration::from_millis(100);

pub struct ProgressManager {
    multi_progress: MultiProgress,
    enabled: bool,
}

impl ProgressManager {
    pub fn new(enabled: bool) -> Self {
        Self {
            multi_progress: MultiProgress::new(),
            enabled,
        }
    }

    /// Percent-based bar for one traversal run. Positions map directly to
    /// the worker's 0-100 progress events.
    pub fn create_traversal_progress(&self) -> ProgressBar {
        if !self.enabled {
            return ProgressBar::hidden();
        }

        let style = ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos:>3}% {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");

        let bar = self.multi_progress.add(
            ProgressBar::new(100)
                .with_style(style)
                .with_message("Enumerating files..."),
        );
        bar.enable_steady_tick(TICK_INTERVAL);
        bar
    }

    pub fn create_spinner(&self, message: &str) -> ProgressBar {
        if !self.enabled {
            return ProgressBar::hidden();
        }

        let style = ProgressStyle::with_template("{spinner:.green} {msg} ({elapsed})")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);

        let spinner = self.multi_progress.add(
            ProgressBar::new_spinner()
                .with_style(style)
                .with_message(message.to_string()),
        );
        spinner.enable_steady_tick(TICK_INTERVAL);
        spinner
    }

    /// Runs `f` with all managed bars lifted off the terminal, so plain
    /// lines printed inside do not interleave with bar redraws.
    pub fn suspend<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        if self.enabled {
            self.multi_progress.suspend(f)
        } else {
            f()
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

pub fn update_traversal_progress(pb: &ProgressBar, percent: u8, message: &str) {
    pb.set_position(u64::from(percent));
    pb.set_message(message.to_string());
}

pub fn finish_progress_with_summary(pb: &ProgressBar, message: &str, duration: Duration) {
    pb.finish_with_message(format!(
        "{} (completed in {})",
        message,
        format_duration(duration)
    ));
}

pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    match secs {
        0 => format!("{}ms", duration.as_millis()),
        1..=59 => format!("{}s", secs),
        _ => format!("{}m {}s", secs / 60, secs % 60),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enabled_flag_controls_visibility() {
        let manager = ProgressManager::new(true);
        assert!(manager.is_enabled());

        let disabled = ProgressManager::new(false);
        assert!(!disabled.is_enabled());
        assert!(disabled.create_traversal_progress().is_hidden());
        assert!(disabled.create_spinner("waiting").is_hidden());
    }

    #[test]
    fn test_traversal_bar_spans_percent_range() {
        let manager = ProgressManager::new(true);
        let bar = manager.create_traversal_progress();

        assert_eq!(bar.length(), Some(100));

        update_traversal_progress(&bar, 42, "Processing src/lib.rs");
        assert_eq!(bar.position(), 42);
    }

    #[test]
    fn test_spinner_carries_its_message() {
        let manager = ProgressManager::new(true);
        let spinner = manager.create_spinner("Removing password protection...");
        assert_eq!(spinner.message(), "Removing password protection...");
    }

    #[test]
    fn test_suspend_runs_closure_when_disabled() {
        let manager = ProgressManager::new(false);
        let value = manager.suspend(|| 7);
        assert_eq!(value, 7);
    }

    #[test]
    fn test_format_duration_buckets() {
        assert_eq!(format_duration(Duration::from_millis(0)), "0ms");
        assert_eq!(format_duration(Duration::from_millis(500)), "500ms");
        assert_eq!(format_duration(Duration::from_secs(30)), "30s");
        assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
        assert_eq!(format_duration(Duration::from_secs(3661)), "61m 1s");
    }
}
