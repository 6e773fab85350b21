//! Error types for Tree of Science core

use std::path::PathBuf;
use tos_annotation::SyncError;

/// Configuration loading or validation failure
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for this schema
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Upload budget must be finite and positive
    #[error("invalid upload budget: {0} MiB")]
    InvalidBudget(f64),

    /// At least one keyword per band
    #[error("top_keywords must be at least 1")]
    InvalidTopKeywords,
}

/// Main core error type
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Star annotation sync failed
    #[error("annotation sync failed: {0}")]
    Sync(#[from] SyncError),
}

impl CoreError {
    /// The tree document does not exist
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Sync(err) if err.is_not_found())
    }
}
