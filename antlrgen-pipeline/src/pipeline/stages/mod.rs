//! Built-in pipeline stages.
//!
//! This module provides the stages that run in every pipeline, in order:
//!
//! - [`ProvisionStage`] - installs and probes the Java runtime
//! - [`FetchStage`] - downloads the tool archive
//! - [`StagingStage`] - creates a fresh staging directory
//! - [`CollectStage`] - copies the grammar files into staging
//! - [`GenerateStage`] - runs the tool against the entry grammar
//! - [`CleanStage`] - removes the staging directory

mod clean;
mod collect;
mod fetch;
mod generate;
mod provision;
mod staging;

pub use clean::CleanStage;
pub use collect::CollectStage;
pub use fetch::{FetchStage, write_archive};
pub use generate::GenerateStage;
pub use provision::ProvisionStage;
pub use staging::StagingStage;
