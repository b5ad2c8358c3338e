//! Stage stage - creates the staging directory.

use crate::{
    Result, StagingDir,
    pipeline::{RunContext, Stage},
};

/// Stage that creates an empty staging directory and hands its guard to
/// the context.
///
/// A directory left behind by an interrupted run is replaced, so reruns
/// never fail on leftovers. Anything else at the staging path stops the
/// run untouched.
pub struct StagingStage;

impl Stage for StagingStage {
    fn name(&self) -> &'static str {
        "stage"
    }

    fn description(&self) -> &'static str {
        "Create the staging directory"
    }

    fn run(&self, ctx: &mut RunContext<'_>) -> Result<()> {
        let staging = StagingDir::create(ctx.config.staging_dir())?;
        if staging.replaced_stale() {
            let message = format!(
                "replaced stale staging directory '{}'",
                staging.path().display()
            );
            ctx.add_info(self.name(), message);
        }
        ctx.staging = Some(staging);
        Ok(())
    }
}
