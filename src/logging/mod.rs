// src/logging/mod.rs

//! Logging setup for `devrun` using `tracing` + `tracing-subscriber`.
//!
//! There are two kinds of subscribers:
//! - the per-execution session subscriber built by [`sinks`], which owns a
//!   console sink and a log file sink and is installed only around one
//!   wrapped command;
//! - a plain global stderr subscriber for `devtask`'s own diagnostics
//!   ([`init_logging`]).
//!
//! Priority for determining the console log level:
//! 1. `--log-level` CLI flag (if provided)
//! 2. `DEVRUN_LOG` environment variable (e.g. "info", "debug")
//! 3. default to `info`
//!
//! Priority for the logs directory:
//! 1. `--logs-dir` CLI flag
//! 2. `DEVRUN_LOGS_DIR` environment variable
//! 3. `logs` relative to the working directory

use std::fmt;
use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::Result;
use tracing_subscriber::fmt as tracing_fmt;

use crate::cli::LogLevel;

pub mod sinks;
pub mod writer;

pub use sinks::{console_dispatch, session_dispatch};
pub use writer::SharedWriter;

/// Target used for the wrapper's own status lines (banner, log path, result).
pub const STATUS_TARGET: &str = "runner";

/// Target used for every captured line of child output.
pub const CHILD_TARGET: &str = "child";

pub const LOG_LEVEL_ENV: &str = "DEVRUN_LOG";
pub const LOGS_DIR_ENV: &str = "DEVRUN_LOGS_DIR";
pub const DEFAULT_LOGS_DIR: &str = "logs";

/// Everything the execution core needs to build a log session.
#[derive(Clone)]
pub struct LogConfig {
    /// Directory that receives one log file per execution.
    pub logs_dir: PathBuf,
    /// Minimum level of status lines rendered on the console.
    pub console_level: tracing::Level,
    /// Whether the console sink uses ANSI colours.
    pub console_ansi: bool,
    /// Where status lines go (stderr in production).
    pub console: SharedWriter,
    /// Where captured child lines and separators are mirrored (stdout in
    /// production).
    pub mirror: SharedWriter,
}

impl LogConfig {
    pub fn new(logs_dir: impl Into<PathBuf>) -> Self {
        Self {
            logs_dir: logs_dir.into(),
            console_level: tracing::Level::INFO,
            console_ansi: std::io::stderr().is_terminal(),
            console: SharedWriter::stderr(),
            mirror: SharedWriter::stdout(),
        }
    }

    /// Resolve the config from CLI flags with environment fallbacks.
    pub fn from_cli(logs_dir: Option<PathBuf>, cli_level: Option<LogLevel>) -> Self {
        let logs_dir = logs_dir
            .or_else(|| std::env::var_os(LOGS_DIR_ENV).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOGS_DIR));

        Self::new(logs_dir).with_console_level(resolve_level(cli_level))
    }

    pub fn with_console_level(mut self, level: tracing::Level) -> Self {
        self.console_level = level;
        self
    }

    pub fn with_console_ansi(mut self, ansi: bool) -> Self {
        self.console_ansi = ansi;
        self
    }

    pub fn with_console(mut self, console: SharedWriter) -> Self {
        self.console = console;
        self
    }

    pub fn with_mirror(mut self, mirror: SharedWriter) -> Self {
        self.mirror = mirror;
        self
    }
}

impl fmt::Debug for LogConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogConfig")
            .field("logs_dir", &self.logs_dir)
            .field("console_level", &self.console_level)
            .field("console_ansi", &self.console_ansi)
            .finish_non_exhaustive()
    }
}

/// Initialise the global logging subscriber used by `devtask`.
///
/// Safe to call once at startup.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let level = resolve_level(cli_level);

    tracing_fmt()
        .with_max_level(level)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

/// Pick the console level from the CLI flag, then `DEVRUN_LOG`, then `info`.
pub fn resolve_level(cli_level: Option<LogLevel>) -> tracing::Level {
    match cli_level {
        Some(lvl) => level_from_log_level(lvl),
        None => std::env::var(LOG_LEVEL_ENV)
            .ok()
            .and_then(|s| parse_level_str(&s))
            .unwrap_or(tracing::Level::INFO),
    }
}

fn level_from_log_level(lvl: LogLevel) -> tracing::Level {
    match lvl {
        LogLevel::Error => tracing::Level::ERROR,
        LogLevel::Warn => tracing::Level::WARN,
        LogLevel::Info => tracing::Level::INFO,
        LogLevel::Debug => tracing::Level::DEBUG,
        LogLevel::Trace => tracing::Level::TRACE,
    }
}

pub fn parse_level_str(s: &str) -> Option<tracing::Level> {
    match s.trim().to_lowercase().as_str() {
        "error" => Some(tracing::Level::ERROR),
        "warn" | "warning" => Some(tracing::Level::WARN),
        "info" => Some(tracing::Level::INFO),
        "debug" => Some(tracing::Level::DEBUG),
        "trace" => Some(tracing::Level::TRACE),
        _ => None,
    }
}
