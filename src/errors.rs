// src/errors.rs

//! Crate-wide error aliases and helpers.

use std::process::ExitStatus;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FileWatcherError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid glob pattern '{pattern}': {source}")]
    InvalidGlob {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Action exited with {status}: {stderr}")]
    ActionFailed { status: ExitStatus, stderr: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, FileWatcherError>;
