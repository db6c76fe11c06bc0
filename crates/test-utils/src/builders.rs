#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use devrun::exec::{Executor, ProcessLauncher, TokioLauncher};
use devrun::logging::LogConfig;
use tempfile::TempDir;

use crate::capture::CaptureBuffer;

/// A `LogConfig` pointing at a scratch directory, with console and mirror
/// output captured in memory.
pub struct LogHarness {
    pub dir: TempDir,
    pub console: CaptureBuffer,
    pub mirror: CaptureBuffer,
}

impl LogHarness {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp logs dir"),
            console: CaptureBuffer::new(),
            mirror: CaptureBuffer::new(),
        }
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.dir.path().join("logs")
    }

    pub fn config(&self) -> LogConfig {
        LogConfig::new(self.logs_dir())
            .with_console_ansi(false)
            .with_console(self.console.writer())
            .with_mirror(self.mirror.writer())
    }

    pub fn executor(&self, launcher: impl ProcessLauncher + 'static) -> Executor {
        Executor::new(launcher, self.config())
    }

    pub fn real_executor(&self) -> Executor {
        Executor::new(TokioLauncher, self.config())
    }

    /// All log files written so far, sorted by name.
    pub fn log_files(&self) -> Vec<PathBuf> {
        let Ok(entries) = fs::read_dir(self.logs_dir()) else {
            return Vec::new();
        };
        let mut files: Vec<PathBuf> = entries.filter_map(|e| e.ok().map(|e| e.path())).collect();
        files.sort();
        files
    }
}

impl Default for LogHarness {
    fn default() -> Self {
        Self::new()
    }
}

pub fn read_log(path: &Path) -> String {
    fs::read_to_string(path).expect("read log file")
}

/// Messages of log lines at `level` (e.g. "INFO", "ERROR"), in file order.
///
/// Lines look like `2026-01-02 03:04:05.678  INFO message`.
pub fn messages_at(log: &str, level: &str) -> Vec<String> {
    let marker = format!(" {level} ");
    log.lines()
        .filter_map(|line| line.split_once(&marker).map(|(_, msg)| msg.to_string()))
        .collect()
}
