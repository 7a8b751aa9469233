//! Settings load failures.

use std::path::PathBuf;

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, SettingsError>;

/// Why the settings file could not be loaded.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The file exists but could not be read.
    #[error("failed to read settings file {path}: {source}")]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file or merged document is not valid settings JSON.
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
}
