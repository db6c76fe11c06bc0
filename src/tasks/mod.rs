// src/tasks/mod.rs

//! Named, parameterized tasks.
//!
//! - [`registry`] holds the task table and resolves a task name plus CLI
//!   flags into concrete steps.
//! - [`template`] substitutes `%(param)s` placeholders.
//! - [`flags`] parses `--long VALUE` / `--long=VALUE` task flags.
//! - [`runner`] executes resolved steps in order, stopping at the first
//!   failure.
//! - [`builtin`] defines the default task table (docker build/run/test).

use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;

use crate::errors::{DevrunError, Result};
use crate::exec::Executor;
use crate::fs::FileSystem;

pub mod builtin;
pub mod flags;
pub mod registry;
pub mod runner;
pub mod template;

pub use registry::{DEFAULT_TASK, Registry, ResolvedTask, Step};
pub use runner::TaskRunner;

/// Future returned by a callback action.
pub type CallbackFuture<'a> = Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;

/// Signature of a callback action.
pub type CallbackFn = dyn for<'a> Fn(&'a ActionContext<'a>) -> CallbackFuture<'a> + Send + Sync;

/// What a callback gets to work with.
pub struct ActionContext<'a> {
    pub task: &'a str,
    pub params: &'a ParamValues,
    pub executor: &'a Executor,
    pub fs: &'a dyn FileSystem,
}

/// One step of a task definition.
#[derive(Clone)]
pub enum Action {
    /// A shell command line with `%(param)s` placeholders.
    Shell(String),
    /// Code that does its own I/O and reports success or a failure reason.
    Callback(Arc<CallbackFn>),
}

impl Action {
    pub fn shell(template: impl Into<String>) -> Self {
        Action::Shell(template.into())
    }

    pub fn callback<F>(f: F) -> Self
    where
        F: for<'a> Fn(&'a ActionContext<'a>) -> CallbackFuture<'a> + Send + Sync + 'static,
    {
        Action::Callback(Arc::new(f))
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Shell(template) => f.debug_tuple("Shell").field(template).finish(),
            Action::Callback(_) => f.write_str("Callback(..)"),
        }
    }
}

/// Value type of a task parameter. Strings are the only type in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum ParamType {
    #[default]
    #[serde(rename = "str", alias = "string")]
    Str,
}

/// A declared task parameter, settable with `--<long> VALUE`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Param {
    pub name: String,
    pub long: String,
    #[serde(default, rename = "type")]
    pub kind: ParamType,
    #[serde(default)]
    pub default: Option<String>,
}

impl Param {
    pub fn new(name: impl Into<String>, long: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            long: long.into(),
            kind: ParamType::Str,
            default: None,
        }
    }

    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default = Some(value.into());
        self
    }
}

/// A named task: ordered actions, declared parameters and file dependencies.
///
/// `file_dep` is metadata only; nothing checks it for staleness.
#[derive(Debug, Clone)]
pub struct Task {
    pub name: String,
    pub doc: String,
    pub actions: Vec<Action>,
    pub params: Vec<Param>,
    pub file_dep: Vec<PathBuf>,
}

impl Task {
    pub fn new(name: impl Into<String>, doc: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc: doc.into(),
            actions: Vec::new(),
            params: Vec::new(),
            file_dep: Vec::new(),
        }
    }

    pub fn action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    pub fn param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    pub fn file_dep(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_dep.push(path.into());
        self
    }

    pub fn param_by_long(&self, long: &str) -> Option<&Param> {
        self.params.iter().find(|p| p.long == long)
    }
}

/// Resolved parameter values of one task invocation, keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamValues {
    values: BTreeMap<String, String>,
}

impl ParamValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Like [`get`](Self::get), but a missing value is a
    /// [`DevrunError::MissingParameter`] for `task`.
    pub fn require(&self, task: &str, name: &str) -> Result<&str> {
        self.get(name).ok_or_else(|| DevrunError::MissingParameter {
            task: task.to_string(),
            param: name.to_string(),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
