// src/config/mod.rs

//! Task file loading and validation for devtask.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a task file from disk (`loader.rs`).
//! - Validate task definitions (`validate.rs`), shared with the built-in
//!   table.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path};
pub use model::{RawTaskFile, TaskConfig, TaskFile};
pub use validate::validate_task;
