// src/tasks/builtin.rs

//! The default task table: build, run and test the MicroPython dev
//! container.

use std::path::PathBuf;

use crate::errors::{DevrunError, Result};
use crate::types::ExecutionRequest;

use super::{Action, ActionContext, CallbackFuture, Param, Registry, Task};

pub const IMAGE_NAME: &str = "micropython-dev";
pub const CONTAINER_NAME: &str = "micropython-dev-container";
pub const DEFAULT_SSH_KEY: &str = "~/.ssh/id_rsa.pub";
pub const DEFAULT_BOARD: &str = "RPI_PICO";

const FIRMWARE_DIR: &str = "/micropython/ports/rp2";
const TESTS_DIR: &str = "/micropython/tests";
const EMULATOR: &str =
    "qemu-system-arm -machine pico -nographic -kernel ../ports/rp2/build-RPI_PICO/firmware.elf";

impl Registry {
    /// Registry pre-populated with [`builtin_tasks`].
    pub fn builtin() -> Result<Self> {
        let mut registry = Registry::new();
        for task in builtin_tasks() {
            registry.register(task)?;
        }
        Ok(registry)
    }
}

fn run_container() -> String {
    format!("docker run -d -p 2222:22 --name {CONTAINER_NAME} {IMAGE_NAME}")
}

fn stop_container() -> String {
    format!("docker stop {CONTAINER_NAME} && docker rm {CONTAINER_NAME}")
}

/// Run `script` with bash inside the dev container.
fn in_container(script: &str) -> String {
    format!(r#"docker exec {CONTAINER_NAME} /bin/bash -c "{script}""#)
}

pub fn builtin_tasks() -> Vec<Task> {
    vec![
        Task::new("about", "Prints a help message").action(Action::callback(about)),
        Task::new(
            "build_docker",
            "Builds the Docker image. Use --ssh-key to specify the path to your public SSH key.",
        )
        .action(Action::callback(build_docker))
        .param(Param::new("ssh_key", "ssh-key").with_default(DEFAULT_SSH_KEY))
        .file_dep("Dockerfile"),
        Task::new("run_container", "Runs the Docker container").action(Action::shell(run_container())),
        Task::new("stop_container", "Stops and removes the Docker container")
            .action(Action::shell(stop_container())),
        Task::new(
            "build_firmware",
            "Builds the firmware for a given board. Use --board to specify the board.",
        )
        .action(Action::shell(in_container(&format!(
            "cd {FIRMWARE_DIR} && make BOARD=%(board)s"
        ))))
        .param(Param::new("board", "board").with_default(DEFAULT_BOARD)),
        Task::new("test", "Runs the test suite for the RPI_PICO board").action(Action::shell(
            in_container(&format!(
                r#"cd {TESTS_DIR} && ./run-tests.py -t execpty:\"{EMULATOR}\""#
            )),
        )),
    ]
}

fn about<'a>(_ctx: &'a ActionContext<'a>) -> CallbackFuture<'a> {
    Box::pin(print_about())
}

async fn print_about() -> Result<()> {
    println!("Please use `devtask --list` to see available tasks.");
    Ok(())
}

fn build_docker<'a>(ctx: &'a ActionContext<'a>) -> CallbackFuture<'a> {
    Box::pin(build_image(ctx))
}

/// Read the SSH public key and pass it to `docker build` as a build arg.
///
/// A missing or unreadable key is reported on stderr and fails the task
/// before anything is launched.
async fn build_image(ctx: &ActionContext<'_>) -> Result<()> {
    let key_path = expand_home(ctx.params.require(ctx.task, "ssh_key")?);

    if !ctx.fs.is_file(&key_path) {
        eprintln!("Error: SSH key file not found at {}", key_path.display());
        return Err(DevrunError::DependencyRead {
            task: ctx.task.to_string(),
            path: key_path,
            reason: "file not found".to_string(),
        });
    }

    let key = match ctx.fs.read_to_string(&key_path) {
        Ok(key) => key,
        Err(err) => {
            eprintln!("Error: could not read SSH key file {}: {err:#}", key_path.display());
            return Err(DevrunError::DependencyRead {
                task: ctx.task.to_string(),
                path: key_path,
                reason: format!("{err:#}"),
            });
        }
    };

    let build_arg = format!("SSH_PUBLIC_KEY={}", key.trim_end());
    let request = ExecutionRequest::new([
        "docker",
        "build",
        "--build-arg",
        build_arg.as_str(),
        "-t",
        IMAGE_NAME,
        ".",
    ])?;

    let report = ctx.executor.execute(&request).await;
    if report.result.is_success() {
        Ok(())
    } else {
        Err(anyhow::anyhow!("docker build exited with code {}", report.exit_code()).into())
    }
}

/// Expand a leading `~` to `$HOME`.
pub fn expand_home(path: &str) -> PathBuf {
    expand_home_in(path, std::env::var_os("HOME").map(PathBuf::from))
}

fn expand_home_in(path: &str, home: Option<PathBuf>) -> PathBuf {
    match (path, home) {
        ("~", Some(home)) => home,
        (p, Some(home)) if p.starts_with("~/") => home.join(&p[2..]),
        (p, _) => PathBuf::from(p),
    }
}
