//! # Session Error Types
//!
//! Errors raised while setting up a session. Navigation itself never
//! fails: boundaries come back as [`crate::NavigationOutcome`] variants.

use std::path::PathBuf;

use delve_procedural::ProcgenError;
use thiserror::Error;

/// Errors that can occur while loading or starting a session.
#[derive(Error, Debug)]
pub enum DelveError {
    /// Generation rejected its input.
    #[error(transparent)]
    Procgen(#[from] ProcgenError),

    /// Configuration file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Configuration file is not valid TOML for [`crate::DelveConfig`].
    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Configuration parsed but cannot be used.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for session operations.
pub type DelveResult<T> = Result<T, DelveError>;
