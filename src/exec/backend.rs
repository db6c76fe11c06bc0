// src/exec/backend.rs

//! Pluggable process launcher abstraction.
//!
//! The execution core talks to a `ProcessLauncher` instead of calling
//! `tokio::process::Command` directly. This makes it easy to swap in a fake
//! launcher in tests while keeping the production implementation in
//! [`TokioLauncher`].
//!
//! - `TokioLauncher` spawns a real OS process with both output streams piped
//!   back to the parent.
//! - Tests can provide their own `ProcessLauncher` that, for example, serves
//!   canned stdout/stderr from memory and reports a fixed exit code.

use std::future::Future;
use std::io;
use std::pin::Pin;
use std::process::{ExitStatus, Stdio};

use tokio::io::AsyncRead;
use tokio::process::Command;

use crate::types::ExecutionRequest;

pub type BoxedReader = Box<dyn AsyncRead + Send + Unpin>;
pub type ExitFuture = Pin<Box<dyn Future<Output = io::Result<i32>> + Send>>;

/// A launched child: its two output pipes and a future resolving to its
/// exit code.
pub struct LaunchedChild {
    pub stdout: BoxedReader,
    pub stderr: BoxedReader,
    pub exit: ExitFuture,
}

/// Trait abstracting how an [`ExecutionRequest`] becomes a running process.
///
/// Production code uses [`TokioLauncher`]; tests can provide their own
/// implementation that doesn't spawn real processes.
pub trait ProcessLauncher: Send + Sync {
    /// Start the process described by `request`.
    ///
    /// An error of kind [`io::ErrorKind::NotFound`] means the executable does
    /// not exist; the execution core maps it to exit code 127.
    fn launch(&self, request: &ExecutionRequest) -> io::Result<LaunchedChild>;
}

/// Real launcher used in production.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioLauncher;

impl ProcessLauncher for TokioLauncher {
    fn launch(&self, request: &ExecutionRequest) -> io::Result<LaunchedChild> {
        let mut child = Command::new(request.program())
            .args(request.args())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| io::Error::other("child stdout was not captured"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| io::Error::other("child stderr was not captured"))?;

        let exit: ExitFuture = Box::pin(async move {
            let status = child.wait().await?;
            Ok(exit_code(status))
        });

        Ok(LaunchedChild {
            stdout: Box::new(stdout),
            stderr: Box::new(stderr),
            exit,
        })
    }
}

/// Convert an exit status into a shell-style exit code.
///
/// A child killed by a signal maps to `128 + signal`, the way POSIX shells
/// report it.
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    1
}
