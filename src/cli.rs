// src/cli.rs

//! CLI argument parsing using `clap`.
//!
//! Two front-ends share this module:
//! - `run`: wrap a single command and tee its output into a log file.
//! - `devtask`: resolve and run a named task from the task table.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `run`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "run",
    version,
    about = "Run a command, streaming its output to the console and a timestamped log file.",
    long_about = None
)]
pub struct RunArgs {
    /// Directory that receives the log files.
    ///
    /// If omitted, `DEVRUN_LOGS_DIR` or `logs` is used.
    #[arg(long, value_name = "DIR")]
    pub logs_dir: Option<PathBuf>,

    /// Console logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `DEVRUN_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// The command to run, followed by its arguments.
    #[arg(
        value_name = "COMMAND",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub command: Vec<String>,
}

/// Command-line arguments for `devtask`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "devtask",
    version,
    about = "Run named development tasks (docker build/run/test wrappers).",
    long_about = None
)]
pub struct TaskArgs {
    /// Path to an extra task file (TOML).
    ///
    /// Default: `Devtask.toml` in the current working directory; it is
    /// skipped silently when it does not exist.
    #[arg(long, value_name = "PATH", default_value = "Devtask.toml")]
    pub config: PathBuf,

    /// List available tasks and exit.
    #[arg(long)]
    pub list: bool,

    /// Resolve the task and print its steps, but don't run anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Directory that receives the log files of task commands.
    #[arg(long, value_name = "DIR")]
    pub logs_dir: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Task name followed by task flags, e.g. `build_firmware --board PICO_W`.
    #[arg(
        value_name = "TASK",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub task: Vec<String>,
}

impl TaskArgs {
    /// Split the trailing arguments into the task name and its flags.
    pub fn task_and_flags(&self) -> (Option<&str>, &[String]) {
        match self.task.split_first() {
            Some((name, flags)) => (Some(name.as_str()), flags),
            None => (None, &[]),
        }
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `RunArgs::parse()`.
pub fn parse_run() -> RunArgs {
    RunArgs::parse()
}

/// Convenience wrapper around `TaskArgs::parse()`.
pub fn parse_tasks() -> TaskArgs {
    TaskArgs::parse()
}
