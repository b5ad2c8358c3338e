//! Configuration for an antlrgen run.
//!
//! A run is described by three pieces, all read once at startup:
//!
//! - [`Workspace`]: the checked-out project root,
//! - [`Inputs`]: the four step inputs (language, output, grammar files, entry grammar),
//! - [`Settings`]: optional tool and JDK settings from `antlrgen.toml`.
//!
//! [`Config`] combines them and derives every path the pipeline touches.

// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

mod config;
mod error;
mod inputs;
mod settings;
mod workspace;

pub use config::{Config, staging_dir_for, work_dir_for};
pub use error::{Error, Result, SourceContext};
pub use inputs::{Inputs, parse_file_list};
pub use settings::{
    GeneratorSettings, JdkSettings, SETTINGS_FILE, Settings, SettingsFile, ToolSettings,
};
pub use workspace::{WORKSPACE_ENV, Workspace};
