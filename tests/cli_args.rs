// tests/cli_args.rs

use clap::Parser;

use devrun::cli::{LogLevel, RunArgs, TaskArgs};
use devrun::run_command;
use devrun::types::ExecutionResult;

#[test]
fn run_passes_command_flags_through() {
    let args = RunArgs::parse_from(["run", "--logs-dir", "out", "ls", "-la", "--color=never"]);
    assert_eq!(args.logs_dir.as_deref(), Some(std::path::Path::new("out")));
    assert_eq!(args.command, vec!["ls", "-la", "--color=never"]);
}

#[test]
fn run_without_command_leaves_it_empty() {
    let args = RunArgs::parse_from(["run"]);
    assert!(args.command.is_empty());
    assert!(args.log_level.is_none());
}

#[test]
fn devtask_splits_task_name_from_task_flags() {
    let args = TaskArgs::parse_from([
        "devtask",
        "--log-level",
        "debug",
        "build_firmware",
        "--board",
        "RPI_PICO_W",
    ]);
    assert!(matches!(args.log_level, Some(LogLevel::Debug)));

    let (name, flags) = args.task_and_flags();
    assert_eq!(name, Some("build_firmware"));
    assert_eq!(flags, ["--board".to_string(), "RPI_PICO_W".to_string()]);
}

#[test]
fn devtask_defaults() {
    let args = TaskArgs::parse_from(["devtask"]);
    assert_eq!(args.config, std::path::PathBuf::from("Devtask.toml"));
    assert!(!args.list);
    assert!(!args.dry_run);
    assert_eq!(args.task_and_flags(), (None, &[][..]));
}

#[tokio::test]
async fn run_without_command_is_a_usage_error() {
    let code = run_command(RunArgs::parse_from(["run"])).await;
    assert_eq!(code, ExecutionResult::INTERNAL_FAILURE_CODE);
    assert_eq!(code, 1);
}
