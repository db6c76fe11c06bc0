// src/config/validate.rs

use std::collections::HashSet;

use crate::config::model::{RawTaskFile, TaskFile};
use crate::errors::{DevrunError, Result};
use crate::tasks::template::{DEPENDENCIES_PLACEHOLDER, placeholders};
use crate::tasks::{Action, Task};

impl TryFrom<RawTaskFile> for TaskFile {
    type Error = crate::errors::DevrunError;

    fn try_from(raw: RawTaskFile) -> std::result::Result<Self, Self::Error> {
        let tasks: Vec<Task> = raw
            .task
            .iter()
            .map(|(name, cfg)| cfg.to_task(name))
            .collect();

        for task in &tasks {
            validate_task(task)?;
        }

        Ok(TaskFile::new_unchecked(tasks))
    }
}

/// Check one task definition for structural problems.
pub fn validate_task(task: &Task) -> Result<()> {
    ensure_named(task)?;
    ensure_has_actions(task)?;
    validate_params(task)?;
    validate_placeholders(task)?;
    Ok(())
}

fn ensure_named(task: &Task) -> Result<()> {
    if task.name.trim().is_empty() || task.name.starts_with('-') {
        return Err(DevrunError::ConfigError(format!(
            "invalid task name '{}'",
            task.name
        )));
    }
    Ok(())
}

fn ensure_has_actions(task: &Task) -> Result<()> {
    if task.actions.is_empty() {
        return Err(DevrunError::ConfigError(format!(
            "task '{}' must have at least one action",
            task.name
        )));
    }
    Ok(())
}

fn validate_params(task: &Task) -> Result<()> {
    let mut names = HashSet::new();
    let mut longs = HashSet::new();

    for param in &task.params {
        if param.name.is_empty() || param.long.is_empty() || param.long.starts_with('-') {
            return Err(DevrunError::ConfigError(format!(
                "task '{}' has a parameter with an empty name or a malformed long flag '{}'",
                task.name, param.long
            )));
        }
        if !names.insert(param.name.as_str()) {
            return Err(DevrunError::ConfigError(format!(
                "task '{}' declares parameter '{}' more than once",
                task.name, param.name
            )));
        }
        if !longs.insert(param.long.as_str()) {
            return Err(DevrunError::ConfigError(format!(
                "task '{}' declares flag '--{}' more than once",
                task.name, param.long
            )));
        }
    }
    Ok(())
}

fn validate_placeholders(task: &Task) -> Result<()> {
    for action in &task.actions {
        let Action::Shell(template) = action else {
            continue;
        };
        for name in placeholders(template) {
            let declared = task.params.iter().any(|p| p.name == name);
            if !declared && name != DEPENDENCIES_PLACEHOLDER {
                return Err(DevrunError::ConfigError(format!(
                    "task '{}' uses undeclared parameter '%({})s' in `{}`",
                    task.name, name, template
                )));
            }
        }
    }
    Ok(())
}
