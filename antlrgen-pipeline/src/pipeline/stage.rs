//! Pipeline stage trait.

use super::RunContext;
use crate::Result;

/// Information about a pipeline stage.
#[derive(Debug, Clone)]
pub struct StageInfo {
    /// The stage name.
    pub name: &'static str,
    /// A human-readable description.
    pub description: &'static str,
}

/// A stage in the pipeline.
///
/// Stages run in a fixed order. Each one reads the run configuration from
/// the context and leaves its results (staging guard, archive path, staged
/// files) there for the stages after it.
pub trait Stage: Send + Sync {
    /// The name of this stage (used in logs, reports and plugin hooks).
    fn name(&self) -> &'static str;

    /// A human-readable description of what this stage does.
    fn description(&self) -> &'static str;

    /// Run this stage.
    ///
    /// # Errors
    ///
    /// Any error is fatal and stops the pipeline. Non-fatal findings should
    /// be recorded as diagnostics instead.
    fn run(&self, ctx: &mut RunContext<'_>) -> Result<()>;

    /// Get information about this stage.
    fn info(&self) -> StageInfo {
        StageInfo {
            name: self.name(),
            description: self.description(),
        }
    }
}
