use thiserror::Error;

#[derive(Error, Debug)]
pub enum FolderPrintError {
    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Path validation failed: {path}")]
    InvalidPath { path: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Operation was interrupted by user")]
    Interrupted,

    #[error("Unsupported document format: {extension} ({path})")]
    UnsupportedFormat { path: String, extension: String },

    #[error("Document is not password-protected: {path}")]
    NotProtected { path: String },

    #[error("Incorrect password for document: {path}")]
    IncorrectPassword { path: String },

    #[error("Unsupported encryption for document: {path} ({scheme})")]
    UnsupportedEncryption { path: String, scheme: String },

    #[error("Failed to unlock document {path}: {message}")]
    Unlock { path: String, message: String },

    #[error("Output file already exists: {path}")]
    OutputExists { path: String },
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for FolderPrintError {
    fn user_message(&self) -> String {
        match self {
            FolderPrintError::InvalidPath { path } => {
                format!("Invalid path: {}", path)
            }
            FolderPrintError::Config { message } => {
                format!("Configuration error: {}", message)
            }
            FolderPrintError::Interrupted => "Operation was interrupted by user".to_string(),
            FolderPrintError::UnsupportedFormat { path, extension } => {
                format!("Cannot unlock '{}': unsupported format '{}'", path, extension)
            }
            FolderPrintError::NotProtected { path } => {
                format!("No password protection found in: {}", path)
            }
            FolderPrintError::IncorrectPassword { path } => {
                format!("The supplied password does not unlock: {}", path)
            }
            FolderPrintError::UnsupportedEncryption { path, scheme } => {
                format!("Cannot unlock '{}': {} encryption is not supported", path, scheme)
            }
            FolderPrintError::Unlock { path, message } => {
                format!("Failed to unlock {}: {}", path, message)
            }
            FolderPrintError::OutputExists { path } => {
                format!("Output file already exists: {}", path)
            }
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            FolderPrintError::InvalidPath { .. } => Some(
                "Check that the path exists and points to the right kind of entry (a directory for 'report', a file for 'unlock').".to_string()
            ),
            FolderPrintError::Config { .. } => Some(
                "Check your configuration file syntax and ensure all fields have valid values.".to_string()
            ),
            FolderPrintError::UnsupportedFormat { .. } => Some(
                "Supported formats are: pdf, docx, xlsx, xml.".to_string()
            ),
            FolderPrintError::NotProtected { .. } => Some(
                "The document can be opened as-is; no unlock step is needed.".to_string()
            ),
            FolderPrintError::IncorrectPassword { .. } => Some(
                "Verify the password and try again. Passwords are case-sensitive.".to_string()
            ),
            FolderPrintError::UnsupportedEncryption { .. } => Some(
                "Open the document in its native application and save an unencrypted copy instead.".to_string()
            ),
            FolderPrintError::OutputExists { .. } => Some(
                "Remove the existing file, pick a different destination with --output, or pass --force to overwrite.".to_string()
            ),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for FolderPrintError {
    fn from(error: toml::de::Error) -> Self {
        FolderPrintError::Config {
            message: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FolderPrintError>;
