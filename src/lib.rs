pub mod cli;
pub mod config;
pub mod error;
pub mod report;
pub mod scanner;
pub mod unlock;
pub mod ui;
pub mod worker;

// Public API re-exports
pub use cli::{Cli, OutputFormat};
pub use config::{CliOverrides, Config, ReportConfig, UnlockConfig};
pub use error::{FolderPrintError, Result, UserFriendlyError};

// Core functionality re-exports
pub use report::{FileRecord, ReadOutcome, ReportWriter};
pub use scanner::{Enumeration, FolderWalker};
pub use unlock::{DocumentUnlocker, UnlockService};
pub use worker::{TraversalOutcome, TraversalSummary, TraversalWorker, WorkerEvent};
pub use ui::{GracefulShutdown, OutputFormatter, OutputMode, ProgressManager};

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task;

/// Main library interface for FolderPrint functionality
pub struct FolderPrint {
    config: Config,
    output_formatter: OutputFormatter,
    progress_manager: ProgressManager,
    shutdown: Arc<GracefulShutdown>,
}

impl FolderPrint {
    /// Create a new FolderPrint instance with the provided configuration
    pub fn new(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Result<Self> {
        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet);
        let progress_manager = ProgressManager::new(!quiet);
        let shutdown = Arc::new(GracefulShutdown::new()?);

        Ok(Self {
            config,
            output_formatter,
            progress_manager,
            shutdown,
        })
    }

    /// Create a new FolderPrint instance for testing (no signal handler conflicts)
    #[cfg(test)]
    pub fn new_for_test(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet);
        let progress_manager = ProgressManager::new(!quiet);
        let shutdown = Arc::new(GracefulShutdown::new_for_test());

        Self {
            config,
            output_formatter,
            progress_manager,
            shutdown,
        }
    }

    /// Create FolderPrint instance from CLI arguments
    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let config = cli_args.load_config()?;
        let output_mode = match cli_args.output_format {
            crate::cli::OutputFormat::Human => OutputMode::Human,
            crate::cli::OutputFormat::Json => OutputMode::Json,
            crate::cli::OutputFormat::Plain => OutputMode::Plain,
        };

        Self::new(config, output_mode, cli_args.verbosity_level(), cli_args.quiet)
    }

    /// Walk `root` and concatenate every file's content into the report
    /// artifact, streaming progress to the terminal while the background
    /// worker runs.
    pub async fn run_report(&self, root: &Path) -> Result<TraversalOutcome> {
        self.shutdown.check_shutdown()?;

        self.output_formatter
            .start_operation(&format!("Building folder report for {}", root.display()));

        let (sender, mut receiver) = worker::event_channel();
        let traversal = TraversalWorker::new(self.config.report.output_filename.clone())
            .with_shutdown(self.shutdown.clone());
        let root_owned = root.to_path_buf();

        let handle = task::spawn_blocking(move || traversal.run(&root_owned, &sender));

        let progress = self.progress_manager.create_traversal_progress();
        let output = ui::ProgressAwareOutput::new(&self.output_formatter, Some(&self.progress_manager));

        let mut last_status = None;
        while let Some(event) = receiver.recv().await {
            match event {
                WorkerEvent::Progress { percent, message } => {
                    ui::progress::update_traversal_progress(&progress, percent, &message);
                }
                WorkerEvent::Status { message } => {
                    output.suspend_and_print(|f| f.debug(&message));
                    last_status = Some(message);
                }
                WorkerEvent::Completed { output_path } => {
                    output.suspend_and_print(|f| {
                        f.debug(&format!("Report written to {}", output_path.display()))
                    });
                }
            }
        }

        let outcome = match handle.await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(err)) => {
                progress.finish_and_clear();
                return Err(err);
            }
            Err(join_err) => {
                progress.finish_and_clear();
                return Err(FolderPrintError::Config {
                    message: format!("Report task failed: {}", join_err),
                });
            }
        };

        match &outcome {
            TraversalOutcome::Empty => {
                progress.finish_and_clear();
                let message = last_status
                    .unwrap_or_else(|| format!("No files found in {}", root.display()));
                self.output_formatter.status(&message);
            }
            TraversalOutcome::Completed(summary) => {
                ui::progress::finish_progress_with_summary(
                    &progress,
                    "All files processed",
                    summary.elapsed,
                );
                self.output_formatter.print_run_summary(summary);
            }
        }

        Ok(outcome)
    }

    /// List the files a report run would include, without writing anything
    pub fn preview_report(&self, root: &Path) -> Result<Enumeration> {
        self.shutdown.check_shutdown()?;

        let output_path = root.join(&self.config.report.output_filename);
        FolderWalker::new()
            .with_excluded_file(output_path)
            .enumerate(root)
    }

    /// Remove password protection from `file`, writing an unlocked copy and
    /// returning its path
    pub async fn unlock_document(
        &self,
        file: &Path,
        password: &str,
        destination: Option<&Path>,
    ) -> Result<PathBuf> {
        self.shutdown.check_shutdown()?;

        self.output_formatter
            .start_operation(&format!("Unlocking {}", file.display()));

        let spinner = self
            .progress_manager
            .create_spinner("Removing password protection...");

        let service = UnlockService::new(self.config.unlock.clone());
        let source = file.to_path_buf();
        let password = password.to_string();
        let destination_owned = destination.map(Path::to_path_buf);

        let result = task::spawn_blocking(move || {
            service.unlock_file(&source, &password, destination_owned.as_deref())
        })
        .await
        .map_err(|e| FolderPrintError::Config {
            message: format!("Unlock task failed: {}", e),
        })?;

        spinner.finish_and_clear();

        if let Ok(ref unlocked_path) = result {
            self.output_formatter.print_unlock_summary(file, unlocked_path);
        }

        result
    }

    /// Generate sample configuration file
    pub fn generate_sample_config<P: AsRef<Path>>(output_path: P) -> Result<()> {
        let sample_config = Config::create_sample_config();
        std::fs::write(output_path.as_ref(), sample_config).map_err(FolderPrintError::Io)?;
        Ok(())
    }

    /// Get configuration reference
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get output formatter reference
    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    /// Check if shutdown has been requested
    pub fn is_running(&self) -> bool {
        self.shutdown.is_running()
    }

    /// Request graceful shutdown
    pub fn request_shutdown(&self) {
        self.shutdown.request_shutdown();
    }

    /// Handle error with user-friendly output
    pub fn handle_error(&self, error: &FolderPrintError) {
        self.output_formatter.print_user_friendly_error(error);
    }
}

/// Convenience function to build a folder report with minimal setup
pub async fn report_folder_simple(root: &Path, verbose: bool) -> Result<TraversalOutcome> {
    let folderprint = FolderPrint::new(
        Config::default(),
        OutputMode::Human,
        if verbose { 1 } else { 0 },
        false,
    )?;

    folderprint.run_report(root).await
}
