// src/exec/session.rs

//! Per-execution log session.
//!
//! A session derives the log file identity from the command, creates the
//! file, and owns the subscriber that writes to it. Dropping the session
//! drops the last handle to the file, which closes it; this also happens on
//! every early-return path of the execution core.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, Local};
use tracing::Dispatch;

use crate::errors::{DevrunError, Result};
use crate::logging::{LogConfig, SharedWriter, session_dispatch};
use crate::types::ExecutionRequest;

const FILE_STAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";
const FILLER: char = '_';
const MAX_NAME_ATTEMPTS: usize = 1000;

pub struct LogSession {
    command_name: String,
    started_at: DateTime<Local>,
    path: PathBuf,
    dispatch: Dispatch,
    mirror: SharedWriter,
}

impl LogSession {
    /// Create the log directory (if needed) and a fresh log file for
    /// `request`, then build the console + file subscriber.
    pub fn open(config: &LogConfig, request: &ExecutionRequest) -> Result<Self> {
        let command_name = sanitize_command_name(&request.to_string());
        let started_at = Local::now();

        fs::create_dir_all(&config.logs_dir).with_context(|| {
            format!("creating logs directory {}", config.logs_dir.display())
        })?;

        let (path, file) = create_log_file(&config.logs_dir, &command_name, started_at)?;
        let dispatch = session_dispatch(config, SharedWriter::new(file));

        Ok(Self {
            command_name,
            started_at,
            path,
            dispatch,
            mirror: config.mirror.clone(),
        })
    }

    pub fn command_name(&self) -> &str {
        &self.command_name
    }

    pub fn started_at(&self) -> DateTime<Local> {
        self.started_at
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Absolute form of the log path, for display.
    pub fn resolved_path(&self) -> PathBuf {
        fs::canonicalize(&self.path).unwrap_or_else(|_| self.path.clone())
    }

    pub fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }

    pub fn mirror(&self) -> &SharedWriter {
        &self.mirror
    }
}

/// Replace every non-alphanumeric character of the first token of
/// `command` with `_`.
pub fn sanitize_command_name(command: &str) -> String {
    let first = command.split_whitespace().next().unwrap_or("command");
    first
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { FILLER })
        .collect()
}

/// `<name>_<YYYY-MM-DD_HH-MM-SS>` without extension.
pub fn log_file_stem(command_name: &str, at: DateTime<Local>) -> String {
    format!("{}_{}", command_name, at.format(FILE_STAMP_FORMAT))
}

/// Create a new log file, never reopening an existing one.
///
/// Two runs within the same second get `_1`, `_2`, ... suffixes.
fn create_log_file(
    dir: &Path,
    command_name: &str,
    at: DateTime<Local>,
) -> Result<(PathBuf, File)> {
    let stem = log_file_stem(command_name, at);

    for attempt in 0..MAX_NAME_ATTEMPTS {
        let file_name = if attempt == 0 {
            format!("{stem}.log")
        } else {
            format!("{stem}_{attempt}.log")
        };
        let path = dir.join(file_name);

        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((path, file)),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(e) => {
                return Err(anyhow::Error::new(e)
                    .context(format!("creating log file {}", path.display()))
                    .into());
            }
        }
    }

    Err(DevrunError::IoError(io::Error::new(
        io::ErrorKind::AlreadyExists,
        format!("no free log file name for {stem} in {}", dir.display()),
    )))
}
