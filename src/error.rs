use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for bump-please operations
#[derive(Error, Debug)]
pub enum BumpError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Version error: {0}")]
    Version(String),

    #[error("Remote error: {0}")]
    Remote(String),

    #[error("Commit log error: {0}")]
    Log(String),

    #[error("Manifest error in {}: {message}", .path.display())]
    Manifest { path: PathBuf, message: String },

    #[error("{}", ValidationList(.0))]
    Validation(Vec<String>),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Convenience type alias for Results in bump-please
pub type Result<T> = std::result::Result<T, BumpError>;

impl BumpError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        BumpError::Config(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        BumpError::Version(msg.into())
    }

    /// Create a remote error with context
    pub fn remote(msg: impl Into<String>) -> Self {
        BumpError::Remote(msg.into())
    }

    /// Create a commit log error with context
    pub fn log(msg: impl Into<String>) -> Self {
        BumpError::Log(msg.into())
    }

    /// Create a manifest error for a specific file
    pub fn manifest(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        BumpError::Manifest {
            path: path.into(),
            message: msg.into(),
        }
    }

    /// Failures collected while validating release targets, if this is a validation error
    pub fn validation_failures(&self) -> Option<&[String]> {
        match self {
            BumpError::Validation(failures) => Some(failures),
            _ => None,
        }
    }
}

struct ValidationList<'a>(&'a [String]);

impl fmt::Display for ValidationList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validation errors:")?;
        for failure in self.0 {
            write!(f, "\n  - {}", failure)?;
        }
        Ok(())
    }
}
