use crate::config::{CliOverrides, Config};
use crate::error::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "folderprint")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Concatenate a folder's files into a single report, or unlock protected documents")]
#[command(
    long_about = "FolderPrint walks a folder recursively and concatenates every file's text \
                       content into a single report artifact, streaming progress while it works. \
                       It can also remove password protection from individual PDF, DOCX, XLSX, \
                       and XML documents."
)]
#[command(before_help = "📁 FolderPrint - Folder Report & Document Unlock Tool")]
#[command(after_help = "EXAMPLES:\n  \
    folderprint report ./my-project\n  \
    folderprint report /var/logs --output contents.txt --verbose\n  \
    folderprint unlock invoice.pdf --password hunter2\n  \
    folderprint unlock sheet.xlsx --password hunter2 --output sheet_plain.xlsx\n\n\
    For more information, visit: https://github.com/user/folderprint")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Configuration file path
    #[arg(short, long, global = true, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Output format for results
    #[arg(long, value_enum, global = true, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Verbose output level (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Generate sample configuration file
    #[arg(long, help = "Generate a sample configuration file")]
    pub generate_config: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Walk a directory and write every file's content into one report
    Report(ReportArgs),
    /// Remove password protection from a PDF, DOCX, XLSX, or XML document
    Unlock(UnlockArgs),
}

#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Root directory to traverse
    pub directory: PathBuf,

    /// Report filename, written inside the root directory (defaults to output.txt)
    #[arg(short, long, value_parser = validate_output_filename)]
    pub output: Option<String>,

    /// Dry run (show what would be done without executing)
    #[arg(long, help = "Show what would be processed without writing the report")]
    pub dry_run: bool,
}

#[derive(Args, Debug)]
pub struct UnlockArgs {
    /// Document to unlock (pdf, docx, xlsx, or xml)
    pub file: PathBuf,

    /// Password protecting the document
    #[arg(short, long, env = "FOLDERPRINT_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Destination for the unlocked copy (defaults to <name>_unlocked.<ext> beside the source)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Force overwrite of an existing destination file
    #[arg(long, help = "Overwrite the destination if it already exists")]
    pub force: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON formatted output
    Json,
    /// Plain text output
    Plain,
}

impl Cli {
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_with_defaults(self.config.as_ref())?;

        let overrides = self.create_cli_overrides();
        config.merge_with_cli_args(&overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn create_cli_overrides(&self) -> CliOverrides {
        let mut overrides = CliOverrides::new();

        match &self.command {
            Some(Command::Report(args)) => {
                overrides = overrides.with_output_filename(args.output.clone());
            }
            Some(Command::Unlock(args)) => {
                if args.force {
                    overrides = overrides.with_overwrite(Some(true));
                }
            }
            None => {}
        }

        overrides
    }

    pub fn should_use_colors(&self) -> bool {
        !self.quiet && console::Term::stdout().features().colors_supported()
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose > 0 && !self.quiet
    }

    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }
}

pub fn validate_output_filename(s: &str) -> std::result::Result<String, String> {
    let name = s.trim();

    if name.is_empty() {
        return Err("Report filename must not be empty".to_string());
    }

    if name.contains('/') || name.contains('\\') {
        return Err("Report filename must be a bare filename, not a path".to_string());
    }

    if name == "." || name == ".." {
        return Err("Report filename must not be a directory reference".to_string());
    }

    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_output_filenames() {
        let valid_names = ["output.txt", "report.log", "all-contents.md"];

        for name in &valid_names {
            assert!(
                validate_output_filename(name).is_ok(),
                "Should accept: {}",
                name
            );
        }
    }

    #[test]
    fn test_invalid_output_filenames() {
        let invalid_names = ["", "   ", "sub/dir.txt", "..\\up.txt", ".", ".."];

        for name in &invalid_names {
            assert!(
                validate_output_filename(name).is_err(),
                "Should reject: {}",
                name
            );
        }
    }

    #[test]
    fn test_parse_report_command() {
        let cli = Cli::try_parse_from(["folderprint", "report", "/tmp/data"]).unwrap();

        match cli.command {
            Some(Command::Report(args)) => {
                assert_eq!(args.directory, PathBuf::from("/tmp/data"));
                assert!(args.output.is_none());
                assert!(!args.dry_run);
            }
            _ => panic!("Expected report command"),
        }
    }

    #[test]
    fn test_parse_unlock_command() {
        let cli = Cli::try_parse_from([
            "folderprint",
            "unlock",
            "doc.pdf",
            "--password",
            "secret",
            "--force",
        ])
        .unwrap();

        match cli.command {
            Some(Command::Unlock(args)) => {
                assert_eq!(args.file, PathBuf::from("doc.pdf"));
                assert_eq!(args.password, "secret");
                assert!(args.force);
                assert!(args.output.is_none());
            }
            _ => panic!("Expected unlock command"),
        }
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from(["folderprint", "report", ".", "-q", "-v"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_verbosity_level() {
        let cli = Cli::try_parse_from(["folderprint", "report", ".", "-vv"]).unwrap();
        assert_eq!(cli.verbosity_level(), 2);
        assert!(cli.is_verbose());

        let cli = Cli::try_parse_from(["folderprint", "report", ".", "-q"]).unwrap();
        assert_eq!(cli.verbosity_level(), 0);
        assert!(!cli.is_verbose());
    }

    #[test]
    fn test_report_output_override() {
        let cli = Cli::try_parse_from([
            "folderprint",
            "report",
            "/tmp/data",
            "--output",
            "contents.txt",
        ])
        .unwrap();

        let overrides = cli.create_cli_overrides();
        assert_eq!(overrides.output_filename.as_deref(), Some("contents.txt"));
        assert!(overrides.overwrite.is_none());
    }

    #[test]
    fn test_unlock_force_override() {
        let cli = Cli::try_parse_from([
            "folderprint",
            "unlock",
            "doc.pdf",
            "--password",
            "pw",
            "--force",
        ])
        .unwrap();

        let overrides = cli.create_cli_overrides();
        assert_eq!(overrides.overwrite, Some(true));
    }
}
