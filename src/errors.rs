// src/errors.rs

//! Crate-wide error aliases and helpers.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DevrunError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Usage error: {0}")]
    Usage(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Command not found: '{0}'")]
    CommandNotFound(String),

    #[error("Unknown task: {0}")]
    UnknownTask(String),

    #[error("task '{task}' needs a value for parameter '{param}' (no flag supplied and no default)")]
    MissingParameter { task: String, param: String },

    #[error("task '{task}' rejected flag '{flag}': {reason}")]
    InvalidFlag {
        task: String,
        flag: String,
        reason: String,
    },

    #[error("task '{task}' could not read {}: {reason}", .path.display())]
    DependencyRead {
        task: String,
        path: PathBuf,
        reason: String,
    },

    #[error("task '{task}' failed at action {index}: {reason}")]
    ActionFailed {
        task: String,
        index: usize,
        reason: String,
    },

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, DevrunError>;
