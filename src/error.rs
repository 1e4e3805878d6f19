use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, NupakError>;

#[derive(Error, Debug)]
pub enum NupakError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Archive not found: {path}")]
    ArchiveNotFound { path: PathBuf },

    #[error("Corrupt archive {path}: {reason}")]
    CorruptArchive { path: PathBuf, reason: String },

    #[error("Invalid package name: '{name}'")]
    InvalidIdentity { name: String },

    #[error("Invalid version format: '{version}'")]
    InvalidVersion { version: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Home directory not found")]
    HomeDirectoryNotFound,

    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },
}

impl NupakError {
    pub fn corrupt_archive<P: Into<PathBuf>, S: Into<String>>(path: P, reason: S) -> Self {
        NupakError::CorruptArchive {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn config_error<S: Into<String>>(message: S) -> Self {
        NupakError::ConfigError {
            message: message.into(),
        }
    }
}
