//! Collect stage - copies the grammar files into staging.

use std::io;

use antlrgen_core::copy_file;

use crate::{
    Error, Result,
    pipeline::{RunContext, Stage},
};

/// Stage that copies every listed grammar file into the staging directory
/// under its base name, in input order.
///
/// The first missing file fails the run. Files copied before it stay in
/// staging until the guard removes the directory.
pub struct CollectStage;

impl Stage for CollectStage {
    fn name(&self) -> &'static str {
        "collect"
    }

    fn description(&self) -> &'static str {
        "Copy grammar files into staging"
    }

    fn run(&self, ctx: &mut RunContext<'_>) -> Result<()> {
        if ctx.staging.is_none() {
            return Err(Error::NotPrepared {
                stage: self.name(),
                missing: "a staging directory",
            });
        }

        for (src, dst) in ctx.config.staged_sources() {
            match copy_file(&src, &dst) {
                Ok(bytes) => tracing::debug!(src = %src.display(), bytes, "staged"),
                Err(source) if source.kind() == io::ErrorKind::NotFound => {
                    return Err(Error::MissingSource { path: src, source });
                }
                Err(source) => {
                    return Err(Error::Io {
                        action: "failed to stage",
                        path: src,
                        source,
                    });
                }
            }
            ctx.staged.push(dst);
        }
        Ok(())
    }
}
