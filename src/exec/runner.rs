// src/exec/runner.rs

//! The process execution core.
//!
//! `Executor::execute` runs one command end to end:
//! open a log session, launch the child with piped output, drain both pipes
//! concurrently, collect the exit code, report, and hand the code back.

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, anyhow};
use tracing::instrument::WithSubscriber;
use tracing::{debug, error, info};

use crate::errors::{DevrunError, Result};
use crate::exec::backend::{ProcessLauncher, TokioLauncher};
use crate::exec::session::LogSession;
use crate::exec::stream::drain_lines;
use crate::logging::{LogConfig, STATUS_TARGET, console_dispatch};
use crate::types::{ExecutionRequest, ExecutionResult, Phase, StreamKind};

const SEPARATOR_WIDTH: usize = 80;

/// Outcome of one [`Executor::execute`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionReport {
    pub result: ExecutionResult,
    /// The log file written for this execution, if one could be created.
    pub log_file: Option<PathBuf>,
}

impl ExecutionReport {
    pub fn exit_code(&self) -> i32 {
        self.result.exit_code()
    }
}

/// Runs commands through a [`ProcessLauncher`], logging into a fresh
/// [`LogSession`] per call.
///
/// Nothing is shared between calls except the launcher and the config.
#[derive(Clone)]
pub struct Executor {
    launcher: Arc<dyn ProcessLauncher>,
    log_config: LogConfig,
}

impl fmt::Debug for Executor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Executor")
            .field("log_config", &self.log_config)
            .finish_non_exhaustive()
    }
}

impl Executor {
    pub fn new(launcher: impl ProcessLauncher + 'static, log_config: LogConfig) -> Self {
        Self {
            launcher: Arc::new(launcher),
            log_config,
        }
    }

    /// Executor backed by real OS processes.
    pub fn with_tokio(log_config: LogConfig) -> Self {
        Self::new(TokioLauncher, log_config)
    }

    /// Run `request` to completion and return its exit code (wrapped in a
    /// report that also names the log file).
    ///
    /// Never fails: wrapper faults become [`ExecutionResult::CommandNotFound`]
    /// (127) or [`ExecutionResult::InternalFailure`] (1) after a critical
    /// status line has been written.
    pub async fn execute(&self, request: &ExecutionRequest) -> ExecutionReport {
        let session = match LogSession::open(&self.log_config, request) {
            Ok(session) => session,
            Err(err) => {
                let dispatch = console_dispatch(&self.log_config);
                tracing::dispatcher::with_default(&dispatch, || {
                    error!(
                        target: STATUS_TARGET,
                        critical = true,
                        "An unexpected error occurred: {err:#}"
                    );
                });
                return ExecutionReport {
                    result: ExecutionResult::InternalFailure,
                    log_file: None,
                };
            }
        };

        let result = self
            .run_in_session(&session, request)
            .with_subscriber(session.dispatch().clone())
            .await;

        ExecutionReport {
            result,
            log_file: Some(session.path().to_path_buf()),
        }
    }

    async fn run_in_session(&self, session: &LogSession, request: &ExecutionRequest) -> ExecutionResult {
        let mut phase = PhaseTracker::new();
        phase.advance();

        info!(target: STATUS_TARGET, "Executing command: {request}");
        info!(
            target: STATUS_TARGET,
            "Full log file at: {}",
            session.resolved_path().display()
        );
        debug!(
            command_name = session.command_name(),
            started_at = %session.started_at().to_rfc3339(),
            "log session opened"
        );
        separator(session);

        let result = match self.stream_child(session, request, &mut phase).await {
            Ok(code) => {
                separator(session);
                if code == 0 {
                    info!(
                        target: STATUS_TARGET,
                        outcome = "success",
                        "Command finished successfully with exit code: {code}"
                    );
                } else {
                    error!(target: STATUS_TARGET, "Command failed with exit code: {code}");
                }
                ExecutionResult::Exited(code)
            }
            Err(DevrunError::CommandNotFound(program)) => {
                error!(target: STATUS_TARGET, critical = true, "Command not found: '{program}'");
                ExecutionResult::CommandNotFound
            }
            Err(err) => {
                error!(target: STATUS_TARGET, critical = true, "An unexpected error occurred: {err:#}");
                ExecutionResult::InternalFailure
            }
        };

        phase.finish();
        result
    }

    /// Launch the child, drain both pipes to end-of-stream, then wait for it.
    async fn stream_child(
        &self,
        session: &LogSession,
        request: &ExecutionRequest,
        phase: &mut PhaseTracker,
    ) -> Result<i32> {
        let child = self.launcher.launch(request).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                DevrunError::CommandNotFound(request.program().to_string())
            } else {
                anyhow::Error::new(e)
                    .context(format!("launching '{}'", request.program()))
                    .into()
            }
        })?;
        phase.advance();

        // Enter StreamingBothPipes before either reader can log a line.
        phase.advance();
        let dispatch = session.dispatch().clone();
        let stdout_reader = tokio::spawn(
            drain_lines(child.stdout, StreamKind::Stdout, session.mirror().clone())
                .with_subscriber(dispatch.clone()),
        );
        let stderr_reader = tokio::spawn(
            drain_lines(child.stderr, StreamKind::Stderr, session.mirror().clone())
                .with_subscriber(dispatch),
        );

        let (stdout_res, stderr_res) = tokio::join!(stdout_reader, stderr_reader);
        let stdout_lines = stdout_res
            .map_err(|e| anyhow!("stdout reader task failed: {e}"))?
            .context("reading child stdout")?;
        let stderr_lines = stderr_res
            .map_err(|e| anyhow!("stderr reader task failed: {e}"))?
            .context("reading child stderr")?;
        debug!(stdout_lines, stderr_lines, "both pipes drained");

        let code = child
            .exit
            .await
            .with_context(|| format!("waiting for '{}'", request.program()))?;
        phase.advance();

        Ok(code)
    }
}

fn separator(session: &LogSession) {
    // The separator is console decoration only; a failed write is not fatal.
    let _ = session.mirror().write_line(&"-".repeat(SEPARATOR_WIDTH));
}

/// Walks the [`Phase`] sequence of one execution.
///
/// `advance` only ever moves to the next phase; failure paths jump
/// straight to `Reported` via `finish`.
#[derive(Debug)]
struct PhaseTracker {
    current: Phase,
}

impl PhaseTracker {
    fn new() -> Self {
        Self {
            current: Phase::Idle,
        }
    }

    fn advance(&mut self) {
        if let Some(next) = self.current.next() {
            debug!(from = ?self.current, to = ?next, "execution phase");
            self.current = next;
        }
    }

    fn finish(&mut self) {
        if self.current < Phase::Reported {
            debug!(from = ?self.current, to = ?Phase::Reported, "execution phase");
            self.current = Phase::Reported;
        }
        self.advance();
    }
}
