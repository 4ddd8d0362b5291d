use crate::error::{FolderPrintError, Result};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::Path;

// Searched in order when no --config path is given.
const CONFIG_SEARCH_PATHS: &[&str] = &[
    "folderprint.toml",
    "folderprint.config.toml",
    ".folderprint.toml",
];

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub unlock: UnlockConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReportConfig {
    /// Filename of the report artifact, created inside the traversal root.
    #[serde(default = "default_output_filename")]
    pub output_filename: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UnlockConfig {
    /// Appended to the source stem when naming the unlocked copy.
    #[serde(default = "default_unlock_suffix")]
    pub suffix: String,
    #[serde(default)]
    pub overwrite: bool,
}

fn default_output_filename() -> String {
    "output.txt".to_string()
}

fn default_unlock_suffix() -> String {
    "_unlocked".to_string()
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_filename: default_output_filename(),
        }
    }
}

impl Default for UnlockConfig {
    fn default() -> Self {
        Self {
            suffix: default_unlock_suffix(),
            overwrite: false,
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| FolderPrintError::Config {
            message: if e.kind() == ErrorKind::NotFound {
                format!("Configuration file not found: {}", path.display())
            } else {
                format!("Failed to read config file {}: {}", path.display(), e)
            },
        })?;

        toml::from_str(&content).map_err(|e| FolderPrintError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })
    }

    /// Explicit path if given; otherwise the first discovered search path,
    /// falling back to built-in defaults when no file exists.
    pub fn load_with_defaults<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        match CONFIG_SEARCH_PATHS.iter().find(|p| Path::new(p).exists()) {
            Some(found) => Self::load_from_file(found),
            None => Ok(Self::default()),
        }
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        if let Some(name) = cli_args.output_filename.as_deref() {
            self.report.output_filename = name.to_string();
        }

        if let Some(overwrite) = cli_args.overwrite {
            self.unlock.overwrite = overwrite;
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        let content = toml::to_string_pretty(self).map_err(|e| FolderPrintError::Config {
            message: format!("Failed to serialize config: {}", e),
        })?;

        std::fs::write(path, content).map_err(|e| FolderPrintError::Config {
            message: format!("Failed to write config file {}: {}", path.display(), e),
        })
    }

    pub fn validate(&self) -> Result<()> {
        let filename = &self.report.output_filename;
        if filename.trim().is_empty() {
            return Err(FolderPrintError::Config {
                message: "Report output filename must not be empty".to_string(),
            });
        }
        if filename.contains('/') || filename.contains('\\') {
            return Err(FolderPrintError::Config {
                message: "Report output filename must be a bare filename, not a path".to_string(),
            });
        }

        let suffix = &self.unlock.suffix;
        if suffix.trim().is_empty() {
            return Err(FolderPrintError::Config {
                message: "Unlock suffix must not be empty".to_string(),
            });
        }
        if suffix.contains('/') || suffix.contains('\\') {
            return Err(FolderPrintError::Config {
                message: "Unlock suffix must not contain path separators".to_string(),
            });
        }

        Ok(())
    }

    pub fn create_sample_config() -> String {
        concat!(
            "# folderprint configuration\n",
            "\n",
            "[report]\n",
            "# Filename of the report artifact, written inside the traversal root.\n",
            "output_filename = \"output.txt\"\n",
            "\n",
            "[unlock]\n",
            "# Appended to the source file's stem when naming the unlocked copy.\n",
            "suffix = \"_unlocked\"\n",
            "# Overwrite an existing destination file.\n",
            "overwrite = false\n",
        )
        .to_string()
    }
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub output_filename: Option<String>,
    pub overwrite: Option<bool>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_output_filename(mut self, output_filename: Option<String>) -> Self {
        self.output_filename = output_filename;
        self
    }

    pub fn with_overwrite(mut self, overwrite: Option<bool>) -> Self {
        self.overwrite = overwrite;
        self
    }
}
