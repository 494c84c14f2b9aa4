//! Error types and handling for sheet2pdf

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for sheet2pdf operations
pub type Result<T> = std::result::Result<T, Sheet2PdfError>;

/// Main error type for sheet2pdf operations
#[derive(Debug, Error)]
pub enum Sheet2PdfError {
    /// I/O related errors
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Directory traversal errors
    #[error("Directory walk error: {0}")]
    WalkError(#[from] walkdir::Error),

    /// Configuration errors
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// Start was requested before a folder was chosen
    #[error("No folder selected")]
    NoFolderSelected,

    /// The chosen folder vanished or is not a directory
    #[error("Folder does not exist or is not a directory: {folder:?}")]
    FolderMissing { folder: PathBuf },

    /// The converter could not be launched or reported failure
    #[error("Conversion failed: {message} (file: {file:?})")]
    ConversionFailed {
        message: String,
        file: Option<PathBuf>,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    SerdeError(String),
}

impl Sheet2PdfError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create a new missing folder error
    pub fn folder_missing<P: Into<PathBuf>>(folder: P) -> Self {
        Self::FolderMissing {
            folder: folder.into(),
        }
    }

    /// Create a new conversion error
    pub fn conversion<S: Into<String>>(message: S, file: Option<PathBuf>) -> Self {
        Self::ConversionFailed {
            message: message.into(),
            file,
        }
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::IoError(e) => format!("File system error: {e}"),
            Self::NoFolderSelected => {
                "Select the folder that contains the .xlsx files first.".to_string()
            }
            Self::FolderMissing { folder } => {
                format!(
                    "The folder {} no longer exists. Select the folder that contains the .xlsx files.",
                    folder.display()
                )
            }
            Self::ConversionFailed { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

// Convert serde errors to our error type
impl From<toml::de::Error> for Sheet2PdfError {
    fn from(err: toml::de::Error) -> Self {
        Self::SerdeError(format!("TOML parsing error: {err}"))
    }
}

impl From<serde_yaml::Error> for Sheet2PdfError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::SerdeError(format!("YAML parsing error: {err}"))
    }
}

/// Error context extension for adding file path information
pub trait ErrorContext<T> {
    /// Add file context to an error
    fn with_file_context(self, file: PathBuf) -> Result<T>;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: Into<Sheet2PdfError>,
{
    fn with_file_context(self, file: PathBuf) -> Result<T> {
        self.map_err(|e| match Into::<Sheet2PdfError>::into(e) {
            Sheet2PdfError::ConversionFailed { message, file: None } => {
                Sheet2PdfError::ConversionFailed {
                    message,
                    file: Some(file),
                }
            }
            Sheet2PdfError::IoError(err) => Sheet2PdfError::ConversionFailed {
                message: err.to_string(),
                file: Some(file),
            },
            other => other,
        })
    }
}
