// src/error.rs
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceMapError {
    #[error("I/O error: {source} (path: {path})")]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },

    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("No source files found under {0}")]
    NoSourceFiles(PathBuf),

    #[error("Too many files ({found}). Limit: {limit}")]
    TooManyFiles { found: usize, limit: usize },

    #[error("Config error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ServiceMapError {
    #[must_use]
    pub fn io(source: std::io::Error, path: impl Into<PathBuf>) -> Self {
        Self::Io {
            source,
            path: path.into(),
        }
    }

    /// True for errors caused by the input tree rather than the environment.
    #[must_use]
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::NotADirectory(_) | Self::NoSourceFiles(_) | Self::TooManyFiles { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ServiceMapError>;

// Allow `?` on std::io::Error by converting to ServiceMapError::Io with unknown path.
impl From<std::io::Error> for ServiceMapError {
    fn from(source: std::io::Error) -> Self {
        ServiceMapError::Io {
            source,
            path: PathBuf::from("<unknown>"),
        }
    }
}

impl From<toml::de::Error> for ServiceMapError {
    fn from(e: toml::de::Error) -> Self {
        ServiceMapError::Config(e.to_string())
    }
}

impl From<toml::ser::Error> for ServiceMapError {
    fn from(e: toml::ser::Error) -> Self {
        ServiceMapError::Config(e.to_string())
    }
}
