//! Clean stage - removes the staging directory.

use crate::{
    Result,
    pipeline::{RunContext, Stage},
};

/// Stage that removes the staging directory after a successful generation.
///
/// The tool archive stays in the work directory. On failure paths the
/// staging guard removes the directory when the context is dropped.
pub struct CleanStage;

impl Stage for CleanStage {
    fn name(&self) -> &'static str {
        "clean"
    }

    fn description(&self) -> &'static str {
        "Remove the staging directory"
    }

    fn run(&self, ctx: &mut RunContext<'_>) -> Result<()> {
        match ctx.staging.take() {
            Some(staging) => staging.close(),
            None => Ok(()),
        }
    }
}
