#![allow(dead_code)]

pub use devrun_test_utils::builders::{LogHarness, messages_at, read_log};
pub use devrun_test_utils::capture::CaptureBuffer;
pub use devrun_test_utils::fake_launcher::{FakeLauncher, FakeRun};
pub use devrun_test_utils::{init_tracing, with_timeout};

use devrun::tasks::{Registry, ResolvedTask};

/// Resolve `name` against the built-in table with the given task flags.
pub fn resolve_builtin(name: &str, flags: &[&str]) -> devrun::errors::Result<ResolvedTask> {
    let flags: Vec<String> = flags.iter().map(|s| s.to_string()).collect();
    Registry::builtin()?.resolve(name, &flags)
}
