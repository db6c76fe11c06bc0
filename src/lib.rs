// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod tasks;
pub mod types;

use std::path::Path;

use tracing::{debug, info};

use crate::cli::{RunArgs, TaskArgs};
use crate::config::{default_config_path, load_and_validate};
use crate::errors::Result;
use crate::exec::Executor;
use crate::fs::RealFileSystem;
use crate::logging::LogConfig;
use crate::tasks::{DEFAULT_TASK, Registry, ResolvedTask, TaskRunner};
use crate::types::{ExecutionRequest, ExecutionResult};

pub const RUN_USAGE: &str = "Usage: run <command> [args...]";

/// Entry point of the `run` binary.
///
/// Runs `args.command` through the execution core and returns the exit code
/// to hand back to the shell. An empty command prints [`RUN_USAGE`] to
/// stderr and returns 1.
pub async fn run_command(args: RunArgs) -> i32 {
    let Ok(request) = ExecutionRequest::new(args.command) else {
        eprintln!("{RUN_USAGE}");
        return ExecutionResult::INTERNAL_FAILURE_CODE;
    };

    let log_config = LogConfig::from_cli(args.logs_dir, args.log_level);
    let executor = Executor::with_tokio(log_config);
    executor.execute(&request).await.exit_code()
}

/// Entry point of the `devtask` binary.
///
/// This wires together:
/// - the built-in task table plus an optional task file
/// - task resolution (name + flags, defaulting to `about`)
/// - `--list` / `--dry-run` short-circuits
/// - sequential execution through the execution core
pub async fn run_tasks(args: TaskArgs) -> Result<()> {
    let registry = load_registry(&args.config)?;

    if args.list {
        print_task_list(&registry);
        return Ok(());
    }

    let (name, flags) = args.task_and_flags();
    let name = name.unwrap_or(DEFAULT_TASK);
    let resolved = registry.resolve(name, flags)?;

    if args.dry_run {
        print_dry_run(&resolved);
        return Ok(());
    }

    let log_config = LogConfig::from_cli(args.logs_dir.clone(), args.log_level);
    let executor = Executor::with_tokio(log_config);
    let fs = RealFileSystem;

    info!(task = %resolved.name, "running task");
    TaskRunner::new(&executor, &fs).run(&resolved).await
}

/// Built-in tasks plus those from `config_path`.
///
/// A missing file is fine when it is the default path; an explicitly named
/// file must exist.
pub fn load_registry(config_path: &Path) -> Result<Registry> {
    let mut registry = Registry::builtin()?;

    if config_path.exists() {
        let file = load_and_validate(config_path)?;
        info!(path = %config_path.display(), tasks = file.tasks().len(), "loaded task file");
        registry.extend_from_file(file)?;
    } else if config_path != default_config_path() {
        return Err(errors::DevrunError::ConfigError(format!(
            "task file {} does not exist",
            config_path.display()
        )));
    } else {
        debug!(path = %config_path.display(), "no task file; using built-in tasks only");
    }

    Ok(registry)
}

/// Print task names and docs, sorted by name.
pub fn print_task_list(registry: &Registry) {
    print!("{}", task_list(registry));
}

/// One `name  doc` line per task, sorted by name, names padded to align.
pub fn task_list(registry: &Registry) -> String {
    let width = registry.tasks().map(|t| t.name.len()).max().unwrap_or(0);
    registry
        .tasks()
        .map(|task| format!("{:<width$}  {}\n", task.name, task.doc, width = width))
        .collect()
}

/// Simple dry-run output: print the task, its parameters and its steps.
fn print_dry_run(task: &ResolvedTask) {
    println!("devtask dry-run");
    println!("  task: {}", task.name);
    for (name, value) in task.params.iter() {
        println!("  param {name} = {value}");
    }
    println!();

    println!("steps ({}):", task.steps.len());
    for (i, step) in task.steps.iter().enumerate() {
        println!("  {}. {}", i + 1, step);
    }

    debug!("dry-run complete (no execution)");
}
