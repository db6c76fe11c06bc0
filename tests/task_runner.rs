// tests/task_runner.rs

mod common;
use crate::common::{FakeLauncher, FakeRun, LogHarness, init_tracing, resolve_builtin};

use std::io::Write;

use anyhow::anyhow;
use clap::Parser;
use tempfile::NamedTempFile;

use devrun::cli::TaskArgs;

use devrun::errors::{DevrunError, Result};
use devrun::fs::RealFileSystem;
use devrun::fs::mock::MockFileSystem;
use devrun::tasks::{Action, ActionContext, CallbackFuture, Registry, Task, TaskRunner};
use devrun::types::ExecutionRequest;
use devrun::{run_tasks, task_list};

fn shell_argv(cmd: &str) -> Vec<String> {
    ExecutionRequest::shell(cmd).argv().to_vec()
}

fn refuse<'a>(_ctx: &'a ActionContext<'a>) -> CallbackFuture<'a> {
    Box::pin(async { Err::<(), DevrunError>(DevrunError::Other(anyhow!("refused to continue"))) })
}

fn greet<'a>(ctx: &'a ActionContext<'a>) -> CallbackFuture<'a> {
    Box::pin(greet_target(ctx))
}

async fn greet_target(ctx: &ActionContext<'_>) -> Result<()> {
    let target = ctx.params.require(ctx.task, "target")?;
    let report = ctx
        .executor
        .execute(&ExecutionRequest::new(["greet", target])?)
        .await;
    if report.result.is_success() {
        Ok(())
    } else {
        Err(anyhow!("greet exited with {}", report.exit_code()).into())
    }
}

#[tokio::test]
async fn steps_run_in_order_and_stop_at_first_failure() {
    init_tracing();
    let harness = LogHarness::new();
    let launcher =
        FakeLauncher::with_runs([FakeRun::exit(0), FakeRun::exit(3), FakeRun::exit(0)]);
    let executor = harness.executor(launcher.clone());

    let mut registry = Registry::new();
    registry
        .register(
            Task::new("chain", "three steps")
                .action(Action::shell("step one"))
                .action(Action::shell("step two"))
                .action(Action::shell("step three")),
        )
        .unwrap();
    let resolved = registry.resolve("chain", &[]).unwrap();

    let err = TaskRunner::new(&executor, &RealFileSystem)
        .run(&resolved)
        .await
        .unwrap_err();

    match err {
        DevrunError::ActionFailed { task, index, reason } => {
            assert_eq!(task, "chain");
            assert_eq!(index, 2);
            assert!(reason.contains("exited with code 3"), "{reason}");
        }
        other => panic!("expected ActionFailed, got {other:?}"),
    }
    assert_eq!(
        launcher.launches(),
        vec![shell_argv("step one"), shell_argv("step two")]
    );
}

#[tokio::test]
async fn callback_failure_halts_the_task() {
    init_tracing();
    let harness = LogHarness::new();
    let launcher = FakeLauncher::new();
    let executor = harness.executor(launcher.clone());

    let mut registry = Registry::new();
    registry
        .register(
            Task::new("guarded", "callback then command")
                .action(Action::callback(refuse))
                .action(Action::shell("never runs")),
        )
        .unwrap();
    let resolved = registry.resolve("guarded", &[]).unwrap();

    let err = TaskRunner::new(&executor, &RealFileSystem)
        .run(&resolved)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        DevrunError::ActionFailed { index: 1, ref reason, .. } if reason.contains("refused to continue")
    ));
    assert!(launcher.launches().is_empty());
}

#[tokio::test]
async fn callbacks_see_resolved_parameters_and_can_execute() {
    init_tracing();
    let harness = LogHarness::new();
    let launcher = FakeLauncher::new();
    let executor = harness.executor(launcher.clone());

    let mut registry = Registry::new();
    registry
        .register(
            Task::new("hello", "greet someone")
                .action(Action::callback(greet))
                .param(devrun::tasks::Param::new("target", "to").with_default("world")),
        )
        .unwrap();
    let resolved = registry
        .resolve("hello", &["--to".to_string(), "pico".to_string()])
        .unwrap();

    TaskRunner::new(&executor, &RealFileSystem)
        .run(&resolved)
        .await
        .unwrap();

    assert_eq!(
        launcher.launches(),
        vec![vec!["greet".to_string(), "pico".to_string()]]
    );
}

#[tokio::test]
async fn build_docker_without_key_fails_before_launching() {
    init_tracing();
    let harness = LogHarness::new();
    let launcher = FakeLauncher::new();
    let executor = harness.executor(launcher.clone());
    let fs = MockFileSystem::new();

    let resolved = resolve_builtin("build_docker", &["--ssh-key", "/keys/id_rsa.pub"]).unwrap();
    let err = TaskRunner::new(&executor, &fs).run(&resolved).await.unwrap_err();

    match err {
        DevrunError::DependencyRead { task, path, .. } => {
            assert_eq!(task, "build_docker");
            assert_eq!(path, std::path::PathBuf::from("/keys/id_rsa.pub"));
        }
        other => panic!("expected DependencyRead, got {other:?}"),
    }
    assert!(launcher.launches().is_empty());
}

#[tokio::test]
async fn build_docker_passes_trimmed_key_as_build_arg() {
    init_tracing();
    let harness = LogHarness::new();
    let launcher = FakeLauncher::new();
    let executor = harness.executor(launcher.clone());
    let fs = MockFileSystem::new();
    fs.add_file("/keys/id_rsa.pub", "ssh-rsa AAAAB3Nza dev@host\n");

    let resolved = resolve_builtin("build_docker", &["--ssh-key=/keys/id_rsa.pub"]).unwrap();
    TaskRunner::new(&executor, &fs).run(&resolved).await.unwrap();

    assert_eq!(
        launcher.launches(),
        vec![vec![
            "docker".to_string(),
            "build".to_string(),
            "--build-arg".to_string(),
            "SSH_PUBLIC_KEY=ssh-rsa AAAAB3Nza dev@host".to_string(),
            "-t".to_string(),
            "micropython-dev".to_string(),
            ".".to_string(),
        ]]
    );
}

#[tokio::test]
async fn failing_docker_build_fails_the_task() {
    init_tracing();
    let harness = LogHarness::new();
    let launcher = FakeLauncher::with_runs([FakeRun::exit(1).stderr(["no Dockerfile"])]);
    let executor = harness.executor(launcher);
    let fs = MockFileSystem::new();
    fs.add_file("/k.pub", "ssh-ed25519 KEY");

    let resolved = resolve_builtin("build_docker", &["--ssh-key", "/k.pub"]).unwrap();
    let err = TaskRunner::new(&executor, &fs).run(&resolved).await.unwrap_err();

    assert!(matches!(err, DevrunError::ActionFailed { index: 1, .. }));
}

#[tokio::test]
async fn unreadable_key_is_not_reported_as_missing() {
    init_tracing();
    let harness = LogHarness::new();
    let launcher = FakeLauncher::new();
    let executor = harness.executor(launcher.clone());
    let fs = MockFileSystem::new();
    fs.add_file("/keys/broken.pub", vec![0xff, 0xfe]);

    let resolved = resolve_builtin("build_docker", &["--ssh-key", "/keys/broken.pub"]).unwrap();
    let err = TaskRunner::new(&executor, &fs).run(&resolved).await.unwrap_err();

    match err {
        DevrunError::DependencyRead { reason, .. } => {
            assert!(reason.contains("UTF-8"), "{reason}");
            assert!(!reason.contains("not found"), "{reason}");
        }
        other => panic!("expected DependencyRead, got {other:?}"),
    }
    assert!(launcher.launches().is_empty());
}

#[tokio::test]
async fn missing_key_reason_says_not_found() {
    init_tracing();
    let harness = LogHarness::new();
    let executor = harness.executor(FakeLauncher::new());
    let fs = MockFileSystem::new();

    let resolved = resolve_builtin("build_docker", &["--ssh-key", "/nowhere.pub"]).unwrap();
    let err = TaskRunner::new(&executor, &fs).run(&resolved).await.unwrap_err();

    assert!(matches!(
        err,
        DevrunError::DependencyRead { ref reason, .. } if reason == "file not found"
    ));
}

/// A task file with no extra tasks, so only the built-in table is loaded.
fn empty_task_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "# no extra tasks").unwrap();
    file
}

fn task_args(config: &NamedTempFile, rest: &[&str]) -> TaskArgs {
    let config = config.path().to_string_lossy().into_owned();
    let mut argv = vec!["devtask".to_string(), "--config".to_string(), config];
    argv.extend(rest.iter().map(|s| s.to_string()));
    TaskArgs::parse_from(argv)
}

#[tokio::test]
async fn no_task_name_runs_about() {
    init_tracing();
    let file = empty_task_file();
    let args = task_args(&file, &[]);
    assert!(args.task.is_empty());

    run_tasks(args).await.unwrap();
}

#[tokio::test]
async fn list_does_not_run_anything() {
    init_tracing();
    let file = empty_task_file();

    run_tasks(task_args(&file, &["--list"])).await.unwrap();
}

#[tokio::test]
async fn unknown_task_name_fails_run_tasks() {
    init_tracing();
    let file = empty_task_file();

    let err = run_tasks(task_args(&file, &["deploy"])).await.unwrap_err();
    assert!(matches!(err, DevrunError::UnknownTask(name) if name == "deploy"));
}

#[test]
fn task_list_is_sorted_and_aligned() {
    let registry = Registry::builtin().unwrap();
    let listing = task_list(&registry);
    let lines: Vec<&str> = listing.lines().collect();

    let names: Vec<&str> = lines
        .iter()
        .map(|l| l.split_whitespace().next().unwrap())
        .collect();
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);
    assert_eq!(names.len(), 6);
    assert_eq!(names[0], "about");

    // Docs start in the same column: after the longest name plus two spaces.
    let column = "build_firmware".len() + 2;
    assert!(lines[0].starts_with("about "));
    assert_eq!(&lines[0][column..], "Prints a help message");
}
