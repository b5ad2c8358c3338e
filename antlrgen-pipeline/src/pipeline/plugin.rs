//! Pipeline plugin trait for observing stages.

use super::RunContext;
use crate::{Error, Result};

/// A plugin that hooks into the pipeline.
///
/// Plugins are called before and after each stage, and when a stage fails.
///
/// # Example
///
/// ```ignore
/// struct LogPlugin;
///
/// impl Plugin for LogPlugin {
///     fn name(&self) -> &'static str { "log" }
///
///     fn on_before_stage(&self, stage: &str, _ctx: &mut RunContext<'_>) -> Result<()> {
///         eprintln!("starting {stage}");
///         Ok(())
///     }
/// }
/// ```
pub trait Plugin: Send + Sync {
    /// The name of this plugin (for debugging and logging).
    fn name(&self) -> &'static str;

    /// Called before a stage runs.
    ///
    /// # Errors
    ///
    /// Return an error to abort the pipeline; the stage will not run.
    #[allow(unused_variables)]
    fn on_before_stage(&self, stage: &str, ctx: &mut RunContext<'_>) -> Result<()> {
        Ok(())
    }

    /// Called after a stage completes successfully.
    ///
    /// # Errors
    ///
    /// Return an error to abort the pipeline.
    #[allow(unused_variables)]
    fn on_after_stage(&self, stage: &str, ctx: &mut RunContext<'_>) -> Result<()> {
        Ok(())
    }

    /// Called when a stage fails, before the error propagates.
    #[allow(unused_variables)]
    fn on_stage_failed(&self, stage: &str, error: &Error) {}
}
