// src/tasks/registry.rs

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::config::TaskFile;
use crate::config::validate::validate_task;
use crate::errors::{DevrunError, Result};

use super::flags::parse_flags;
use super::template::render;
use super::{Action, CallbackFn, ParamValues, Task};

/// Task run when no name is given.
pub const DEFAULT_TASK: &str = "about";

/// The task table, keyed by task name.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    tasks: BTreeMap<String, Task>,
}

/// A task with its parameters bound and templates rendered.
#[derive(Debug, Clone)]
pub struct ResolvedTask {
    pub name: String,
    pub params: ParamValues,
    pub steps: Vec<Step>,
}

/// A concrete, ready-to-run action.
#[derive(Clone)]
pub enum Step {
    /// A fully substituted shell command line.
    Command(String),
    /// A callback to invoke with the resolved parameters.
    Callback(Arc<CallbackFn>),
}

impl fmt::Debug for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Command(cmd) => f.debug_tuple("Command").field(cmd).finish(),
            Step::Callback(_) => f.write_str("Callback(..)"),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Command(cmd) => f.write_str(cmd),
            Step::Callback(_) => f.write_str("<callback>"),
        }
    }
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a task. Fails if the name is taken or the task is malformed.
    pub fn register(&mut self, task: Task) -> Result<()> {
        validate_task(&task)?;
        if self.tasks.contains_key(&task.name) {
            return Err(DevrunError::ConfigError(format!(
                "task '{}' is already registered",
                task.name
            )));
        }
        self.tasks.insert(task.name.clone(), task);
        Ok(())
    }

    /// Add every task of a validated task file.
    pub fn extend_from_file(&mut self, file: TaskFile) -> Result<()> {
        for task in file.into_tasks() {
            self.register(task)?;
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Task> {
        self.tasks.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tasks.contains_key(name)
    }

    /// All tasks, sorted by name.
    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.values()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Bind `flags` to the parameters of task `name` and render its actions.
    ///
    /// Errors:
    /// - [`DevrunError::UnknownTask`] if `name` is not registered,
    /// - [`DevrunError::InvalidFlag`] for undeclared or value-less flags,
    /// - [`DevrunError::MissingParameter`] if a template references a
    ///   parameter with neither a supplied value nor a default.
    pub fn resolve(&self, name: &str, flags: &[String]) -> Result<ResolvedTask> {
        let task = self
            .get(name)
            .ok_or_else(|| DevrunError::UnknownTask(name.to_string()))?;

        let mut supplied = parse_flags(task, flags)?;

        let mut params = ParamValues::new();
        for param in &task.params {
            if let Some(value) = supplied.remove(&param.name).or_else(|| param.default.clone()) {
                params.insert(param.name.clone(), value);
            }
        }

        let mut steps = Vec::with_capacity(task.actions.len());
        for action in &task.actions {
            let step = match action {
                Action::Shell(template) => {
                    let cmd = render(template, &params, &task.file_dep).map_err(|param| {
                        DevrunError::MissingParameter {
                            task: task.name.clone(),
                            param,
                        }
                    })?;
                    Step::Command(cmd)
                }
                Action::Callback(cb) => Step::Callback(Arc::clone(cb)),
            };
            steps.push(step);
        }

        debug!(task = %task.name, steps = steps.len(), ?params, "resolved task");

        Ok(ResolvedTask {
            name: task.name.clone(),
            params,
            steps,
        })
    }
}
