use std::collections::VecDeque;
use std::io::{self, Cursor};
use std::sync::{Arc, Mutex};

use devrun::exec::{LaunchedChild, ProcessLauncher};
use devrun::types::ExecutionRequest;

/// Scripted outcome of one fake launch.
#[derive(Debug, Clone, Default)]
pub struct FakeRun {
    pub stdout: Vec<String>,
    pub stderr: Vec<String>,
    pub exit_code: i32,
    pub not_found: bool,
}

impl FakeRun {
    pub fn exit(code: i32) -> Self {
        Self {
            exit_code: code,
            ..Self::default()
        }
    }

    pub fn not_found() -> Self {
        Self {
            not_found: true,
            ..Self::default()
        }
    }

    pub fn stdout<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stdout = lines.into_iter().map(Into::into).collect();
        self
    }

    pub fn stderr<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stderr = lines.into_iter().map(Into::into).collect();
        self
    }
}

/// A fake launcher that:
/// - records the argv of every launch
/// - serves scripted stdout/stderr from memory
/// - reports the scripted exit code (0 once the script runs out).
#[derive(Debug, Clone, Default)]
pub struct FakeLauncher {
    script: Arc<Mutex<VecDeque<FakeRun>>>,
    launches: Arc<Mutex<Vec<Vec<String>>>>,
}

impl FakeLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_runs(runs: impl IntoIterator<Item = FakeRun>) -> Self {
        let launcher = Self::new();
        launcher.script.lock().unwrap().extend(runs);
        launcher
    }

    /// Argument vectors of all launches so far, in order.
    pub fn launches(&self) -> Vec<Vec<String>> {
        self.launches.lock().unwrap().clone()
    }
}

impl ProcessLauncher for FakeLauncher {
    fn launch(&self, request: &ExecutionRequest) -> io::Result<LaunchedChild> {
        self.launches.lock().unwrap().push(request.argv().to_vec());

        let run = self.script.lock().unwrap().pop_front().unwrap_or_default();
        if run.not_found {
            return Err(io::Error::from(io::ErrorKind::NotFound));
        }

        let code = run.exit_code;
        Ok(LaunchedChild {
            stdout: Box::new(Cursor::new(join_lines(&run.stdout))),
            stderr: Box::new(Cursor::new(join_lines(&run.stderr))),
            exit: Box::pin(async move { Ok(code) }),
        })
    }
}

fn join_lines(lines: &[String]) -> Vec<u8> {
    let mut out = Vec::new();
    for line in lines {
        out.extend_from_slice(line.as_bytes());
        out.push(b'\n');
    }
    out
}
