// src/tasks/runner.rs

//! Sequential execution of a resolved task.

use tracing::{error, info};

use crate::errors::{DevrunError, Result};
use crate::exec::Executor;
use crate::fs::FileSystem;
use crate::types::ExecutionRequest;

use super::{ActionContext, ResolvedTask, Step};

/// Runs the steps of a [`ResolvedTask`] strictly in order.
///
/// The first failing step (non-zero exit, or a callback error) stops the
/// task; earlier steps are not rolled back. Callback failures that carry
/// only a reason are reported as [`DevrunError::ActionFailed`].
#[derive(Debug)]
pub struct TaskRunner<'a> {
    executor: &'a Executor,
    fs: &'a dyn FileSystem,
}

impl<'a> TaskRunner<'a> {
    pub fn new(executor: &'a Executor, fs: &'a dyn FileSystem) -> Self {
        Self { executor, fs }
    }

    pub async fn run(&self, task: &ResolvedTask) -> Result<()> {
        let total = task.steps.len();

        for (i, step) in task.steps.iter().enumerate() {
            let index = i + 1;
            info!(task = %task.name, step = index, total, "running step: {step}");

            if let Err(err) = self.run_step(task, index, step).await {
                error!(task = %task.name, step = index, error = %err, "step failed; stopping task");
                return Err(err);
            }
        }

        info!(task = %task.name, "task finished");
        Ok(())
    }

    async fn run_step(&self, task: &ResolvedTask, index: usize, step: &Step) -> Result<()> {
        match step {
            Step::Command(cmd) => {
                let report = self.executor.execute(&ExecutionRequest::shell(cmd)).await;
                if report.result.is_success() {
                    Ok(())
                } else {
                    Err(DevrunError::ActionFailed {
                        task: task.name.clone(),
                        index,
                        reason: format!("`{cmd}` exited with code {}", report.exit_code()),
                    })
                }
            }
            Step::Callback(callback) => {
                let ctx = ActionContext {
                    task: &task.name,
                    params: &task.params,
                    executor: self.executor,
                    fs: self.fs,
                };
                (**callback)(&ctx).await.map_err(|err| match err {
                    DevrunError::Other(reason) => DevrunError::ActionFailed {
                        task: task.name.clone(),
                        index,
                        reason: format!("{reason:#}"),
                    },
                    other => other,
                })
            }
        }
    }
}
