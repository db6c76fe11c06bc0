// src/exec/mod.rs

//! Process execution layer.
//!
//! This module is responsible for actually running commands, using
//! `tokio::process::Command`, and teeing their output into the console and a
//! per-execution log file.
//!
//! - [`runner`] owns [`Executor`], the end-to-end execute-and-report flow.
//! - [`session`] derives the log file name and builds the log subscriber.
//! - [`stream`] drains one child pipe line by line.
//! - [`backend`] provides the `ProcessLauncher` trait and the concrete
//!   `TokioLauncher` used in production, which tests can replace with a fake
//!   implementation.

pub mod backend;
pub mod runner;
pub mod session;
pub mod stream;

pub use backend::{LaunchedChild, ProcessLauncher, TokioLauncher};
pub use runner::{ExecutionReport, Executor};
pub use session::{LogSession, log_file_stem, sanitize_command_name};
