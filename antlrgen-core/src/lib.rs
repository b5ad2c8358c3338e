//! Core utilities and types for antlrgen.
//!
//! This crate provides the small, dependency-light building blocks shared by
//! the manifest, pipeline and CLI crates.

mod command;
mod file;
mod version;

// Subprocess descriptions
pub use command::{CommandOutput, CommandSpec};
// Filesystem operations
pub use file::{copy_file, ensure_dir, remove_dir_if_exists};
pub use version::ToolVersion;
