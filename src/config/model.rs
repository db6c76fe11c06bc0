// src/config/model.rs

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;

use crate::tasks::{Action, Param, Task};

/// Raw task file as read from TOML (no semantic validation yet).
///
/// ```toml
/// [task.lint]
/// doc = "Run the linter"
/// actions = ["ruff check %(path)s"]
/// file_dep = ["pyproject.toml"]
///
/// [[task.lint.params]]
/// name = "path"
/// long = "path"
/// type = "str"
/// default = "."
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTaskFile {
    /// All tasks from `[task.<name>]`.
    ///
    /// Keys are the *task names* used on the command line.
    #[serde(default)]
    pub task: BTreeMap<String, TaskConfig>,
}

/// `[task.<name>]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaskConfig {
    /// Human-readable description shown by `--list`.
    #[serde(default)]
    pub doc: String,

    /// Shell command templates, run in order.
    pub actions: Vec<String>,

    /// Declared parameters, settable with `--<long> VALUE`.
    #[serde(default)]
    pub params: Vec<Param>,

    /// Files this task depends on. Informational only.
    #[serde(default)]
    pub file_dep: Vec<PathBuf>,
}

impl TaskConfig {
    pub fn to_task(&self, name: &str) -> Task {
        Task {
            name: name.to_string(),
            doc: self.doc.clone(),
            actions: self.actions.iter().cloned().map(Action::Shell).collect(),
            params: self.params.clone(),
            file_dep: self.file_dep.clone(),
        }
    }
}

/// A validated task file.
///
/// Only constructed through `TryFrom<RawTaskFile>`, which checks every task.
#[derive(Debug, Clone)]
pub struct TaskFile {
    tasks: Vec<Task>,
}

impl TaskFile {
    pub(crate) fn new_unchecked(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn into_tasks(self) -> Vec<Task> {
        self.tasks
    }
}
