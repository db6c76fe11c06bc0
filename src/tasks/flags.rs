// src/tasks/flags.rs

//! Parsing of task flags (`--long VALUE` or `--long=VALUE`).

use std::collections::BTreeMap;

use crate::errors::{DevrunError, Result};

use super::Task;

/// Map supplied flags onto the task's declared parameters.
///
/// Returns parameter values keyed by parameter *name*. A flag given twice
/// keeps the last value.
pub fn parse_flags(task: &Task, args: &[String]) -> Result<BTreeMap<String, String>> {
    let mut supplied = BTreeMap::new();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        let Some(body) = arg.strip_prefix("--") else {
            return Err(invalid(task, arg, "expected a `--flag`"));
        };

        let (long, inline_value) = match body.split_once('=') {
            Some((long, value)) => (long, Some(value.to_string())),
            None => (body, None),
        };

        let param = task
            .param_by_long(long)
            .ok_or_else(|| invalid(task, arg, "not declared by this task"))?;

        let value = match inline_value {
            Some(value) => value,
            None => iter
                .next()
                .cloned()
                .ok_or_else(|| invalid(task, arg, "expects a value"))?,
        };

        supplied.insert(param.name.clone(), value);
    }

    Ok(supplied)
}

fn invalid(task: &Task, flag: &str, reason: &str) -> DevrunError {
    DevrunError::InvalidFlag {
        task: task.name.clone(),
        flag: flag.to_string(),
        reason: reason.to_string(),
    }
}
