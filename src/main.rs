use clap::{CommandFactory, Parser};
use folderprint::{
    Cli, FolderPrint, FolderPrintError, OutputFormatter, OutputMode, TraversalOutcome,
    UserFriendlyError,
};
use folderprint::cli::Command;
use std::path::Path;
use std::process;

#[tokio::main]
async fn main() {
    let exit_code = run().await;
    process::exit(exit_code);
}

async fn run() -> i32 {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Handle special commands first
    if cli.generate_config {
        return handle_generate_config(&cli);
    }

    // Create FolderPrint instance
    let folderprint = match FolderPrint::from_cli(&cli) {
        Ok(folderprint) => folderprint,
        Err(e) => {
            print_startup_error(&e);
            return exit_code_for(&e);
        }
    };

    match cli.command {
        Some(Command::Report(ref args)) => {
            if args.dry_run {
                return handle_dry_run(&folderprint, &args.directory);
            }

            match folderprint.run_report(&args.directory).await {
                Ok(TraversalOutcome::Completed(summary)) if summary.read_errors > 0 => {
                    2 // Completed, with read errors recorded in the report
                }
                Ok(_) => 0,
                Err(e) => {
                    folderprint.handle_error(&e);
                    exit_code_for(&e)
                }
            }
        }
        Some(Command::Unlock(ref args)) => {
            match folderprint
                .unlock_document(&args.file, &args.password, args.output.as_deref())
                .await
            {
                Ok(_) => 0,
                Err(e) => {
                    folderprint.handle_error(&e);
                    exit_code_for(&e)
                }
            }
        }
        None => {
            let mut command = Cli::command();
            let _ = command.print_help();
            2
        }
    }
}

fn exit_code_for(error: &FolderPrintError) -> i32 {
    match error {
        FolderPrintError::Interrupted => 130, // Interrupted (SIGINT)
        FolderPrintError::InvalidPath { .. } => 3,
        FolderPrintError::UnsupportedFormat { .. } => 4,
        FolderPrintError::NotProtected { .. } => 5,
        FolderPrintError::IncorrectPassword { .. } => 6,
        FolderPrintError::UnsupportedEncryption { .. } => 7,
        _ => 1, // General error
    }
}

fn handle_generate_config(cli: &Cli) -> i32 {
    let config_path = cli
        .config
        .as_ref()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| "folderprint.toml".to_string());

    match FolderPrint::generate_sample_config(&config_path) {
        Ok(()) => {
            println!("Generated sample configuration file: {}", config_path);
            println!("\nTo use this configuration:");
            println!("  folderprint report <directory> --config {}", config_path);
            println!("\nEdit the file to customize settings for your needs.");
            0
        }
        Err(e) => {
            eprintln!(
                "Failed to generate configuration file: {}",
                e.user_message()
            );
            if let Some(suggestion) = e.suggestion() {
                eprintln!("Suggestion: {}", suggestion);
            }
            1
        }
    }
}

fn handle_dry_run(folderprint: &FolderPrint, directory: &Path) -> i32 {
    let formatter = folderprint.output_formatter();

    formatter.info("DRY RUN MODE - No report will be written");
    formatter.print_separator();

    let enumeration = match folderprint.preview_report(directory) {
        Ok(enumeration) => enumeration,
        Err(e) => {
            folderprint.handle_error(&e);
            return exit_code_for(&e);
        }
    };

    if enumeration.is_empty() {
        formatter.status(&format!("No files found in {}", directory.display()));
        return 0;
    }

    formatter.info("Files that would be processed:");
    for path in &enumeration.files {
        println!("  {}", path.display());
    }

    if !enumeration.walk_errors.is_empty() {
        formatter.warning(&format!(
            "{} entries could not be scanned",
            enumeration.walk_errors.len()
        ));
    }

    let target = directory.join(&folderprint.config().report.output_filename);

    formatter.print_separator();
    println!("  Files: {}", enumeration.len());
    println!("  Report target: {}", target.display());

    formatter.success("Dry run completed successfully");
    formatter.info("Run without --dry-run to write the report");

    0
}

fn print_startup_error(error: &FolderPrintError) {
    // Create a basic formatter for startup errors
    let formatter = OutputFormatter::new(OutputMode::Human, 0, false);
    formatter.print_user_friendly_error(error);
}
