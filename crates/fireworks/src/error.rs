//! # Host Error Types

use std::path::PathBuf;

use fireworks_core::CoreError;
use thiserror::Error;

/// Errors that can occur while setting up or running a host.
#[derive(Error, Debug)]
pub enum HostError {
    /// The simulation rejected its configuration.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Host configuration file is not valid TOML.
    #[error("failed to parse host configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Host configuration file could not be read.
    #[error("failed to read host configuration {path}: {source}")]
    Io {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A browser API call failed.
    #[error("browser error: {0}")]
    Browser(String),
}

/// Result type for host operations.
pub type HostResult<T> = Result<T, HostError>;
