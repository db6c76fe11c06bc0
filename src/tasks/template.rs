// src/tasks/template.rs

//! `%(name)s` placeholder substitution for shell actions.
//!
//! - `%(name)s` is replaced by the value of parameter `name`.
//! - `%%` is a literal `%`.
//! - `%(dependencies)s` expands to the task's `file_dep` joined by spaces,
//!   unless a parameter of that name is declared.
//! - Any other `%` is left untouched.

use std::path::PathBuf;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::ParamValues;

pub const DEPENDENCIES_PLACEHOLDER: &str = "dependencies";

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"%%|%\(([A-Za-z_][A-Za-z0-9_]*)\)s").expect("placeholder regex is valid")
});

/// Substitute all placeholders in `template`.
///
/// On failure returns the name of the first placeholder that has no value.
pub fn render(
    template: &str,
    values: &ParamValues,
    file_dep: &[PathBuf],
) -> std::result::Result<String, String> {
    let mut out = String::with_capacity(template.len());
    let mut last = 0;

    for caps in PLACEHOLDER.captures_iter(template) {
        let Some(whole) = caps.get(0) else { continue };
        out.push_str(&template[last..whole.start()]);
        out.push_str(&replacement(&caps, values, file_dep)?);
        last = whole.end();
    }

    out.push_str(&template[last..]);
    Ok(out)
}

fn replacement(
    caps: &Captures<'_>,
    values: &ParamValues,
    file_dep: &[PathBuf],
) -> std::result::Result<String, String> {
    let Some(name) = caps.get(1).map(|m| m.as_str()) else {
        return Ok("%".to_string());
    };

    if let Some(value) = values.get(name) {
        return Ok(value.to_string());
    }

    if name == DEPENDENCIES_PLACEHOLDER {
        let joined: Vec<String> = file_dep
            .iter()
            .map(|p| p.to_string_lossy().into_owned())
            .collect();
        return Ok(joined.join(" "));
    }

    Err(name.to_string())
}

/// Names of all `%(name)s` placeholders in `template`, in order of
/// appearance (duplicates included).
pub fn placeholders(template: &str) -> Vec<String> {
    PLACEHOLDER
        .captures_iter(template)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
        .collect()
}
