//! Stage pipeline.
//!
//! This module provides a [`Pipeline`] orchestrator that runs the six
//! stages in order. The pipeline provides:
//!
//! - Strict sequencing: a stage starts only after the previous one succeeded
//! - Plugin hooks around each stage (before, after, failed)
//! - Diagnostics collection for non-fatal findings
//! - Guaranteed staging cleanup via [`StagingDir`](crate::StagingDir)
//!
//! # Example
//!
//! ```ignore
//! use antlrgen_pipeline::{HttpFetcher, Pipeline, SystemRunner};
//!
//! let timing = TimingPlugin::new();
//! let pipeline = Pipeline::new().plugin(timing.clone());
//! let outcome = pipeline.run(&config, &SystemRunner, &HttpFetcher::new())?;
//!
//! println!("output={}", outcome.output_dir.display());
//! ```

mod context;
mod diagnostic;
mod plugin;
mod runner;
mod stage;
pub mod stages;
mod timing;

pub use context::RunContext;
pub use diagnostic::{Diagnostic, Severity};
pub use plugin::Plugin;
pub use runner::{Pipeline, RunOutcome};
pub use stage::{Stage, StageInfo};
pub use timing::{StageRecord, StageStatus, TimingPlugin};
