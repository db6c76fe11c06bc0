// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::{RawTaskFile, TaskFile};
use crate::errors::Result;

/// Load a task file from a given path and return the raw `RawTaskFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawTaskFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let file: RawTaskFile = toml::from_str(&contents)?;

    Ok(file)
}

/// Load a task file from path and validate every task in it.
///
/// Checks for:
/// - tasks without actions,
/// - duplicate parameter names or flags,
/// - placeholders that name no declared parameter.
///
/// Clashes with already registered (e.g. built-in) task names are detected
/// later, when the tasks are added to a [`Registry`](crate::tasks::Registry).
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<TaskFile> {
    let raw = load_from_path(&path)?;
    let file = TaskFile::try_from(raw)?;
    Ok(file)
}

/// Task file looked up when `--config` is not given.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Devtask.toml")
}
