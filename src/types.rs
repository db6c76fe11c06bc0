// src/types.rs

use std::fmt;

use crate::errors::{DevrunError, Result};

/// The resolved argument vector for one child process.
///
/// Built once per invocation and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionRequest {
    argv: Vec<String>,
}

impl ExecutionRequest {
    /// Build a request from a raw argument vector.
    ///
    /// Fails with [`DevrunError::Usage`] when `argv` is empty.
    pub fn new<I, S>(argv: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let argv: Vec<String> = argv.into_iter().map(Into::into).collect();
        if argv.is_empty() {
            return Err(DevrunError::Usage("no command given".to_string()));
        }
        Ok(Self { argv })
    }

    /// Wrap a shell command line so it runs through the platform shell.
    pub fn shell(command: &str) -> Self {
        let argv = if cfg!(windows) {
            vec!["cmd".to_string(), "/C".to_string(), command.to_string()]
        } else {
            vec!["sh".to_string(), "-c".to_string(), command.to_string()]
        };
        Self { argv }
    }

    pub fn program(&self) -> &str {
        &self.argv[0]
    }

    pub fn args(&self) -> &[String] {
        &self.argv[1..]
    }

    pub fn argv(&self) -> &[String] {
        &self.argv
    }
}

impl fmt::Display for ExecutionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.argv.join(" "))
    }
}

/// Terminal value of one wrapped execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionResult {
    /// The child ran and exited with this code (possibly non-zero).
    Exited(i32),
    /// The requested executable does not exist.
    CommandNotFound,
    /// Anything else went wrong inside the wrapper.
    InternalFailure,
}

impl ExecutionResult {
    pub const COMMAND_NOT_FOUND_CODE: i32 = 127;
    pub const INTERNAL_FAILURE_CODE: i32 = 1;

    /// Exit code to hand back to the invoking shell.
    pub fn exit_code(&self) -> i32 {
        match self {
            ExecutionResult::Exited(code) => *code,
            ExecutionResult::CommandNotFound => Self::COMMAND_NOT_FOUND_CODE,
            ExecutionResult::InternalFailure => Self::INTERNAL_FAILURE_CODE,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ExecutionResult::Exited(0))
    }
}

/// Which pipe of the child a line came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    Stdout,
    Stderr,
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamKind::Stdout => f.write_str("stdout"),
            StreamKind::Stderr => f.write_str("stderr"),
        }
    }
}

/// Lifecycle of a single wrapped execution.
///
/// `Idle -> LoggingConfigured -> Launched -> StreamingBothPipes ->
/// ChildExited -> Reported -> Done`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    Idle,
    LoggingConfigured,
    Launched,
    StreamingBothPipes,
    ChildExited,
    Reported,
    Done,
}

impl Phase {
    /// The phase that must follow this one on the normal path.
    pub fn next(self) -> Option<Phase> {
        match self {
            Phase::Idle => Some(Phase::LoggingConfigured),
            Phase::LoggingConfigured => Some(Phase::Launched),
            Phase::Launched => Some(Phase::StreamingBothPipes),
            Phase::StreamingBothPipes => Some(Phase::ChildExited),
            Phase::ChildExited => Some(Phase::Reported),
            Phase::Reported => Some(Phase::Done),
            Phase::Done => None,
        }
    }
}
