//! # Core Error Types
//!
//! Errors that can occur while setting up a simulation. Ticking itself is
//! infallible.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur in the simulation core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration values are out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration file is not valid TOML for [`crate::SimulationConfig`].
    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Configuration file could not be read.
    #[error("failed to read configuration {path}: {source}")]
    Io {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
