//! Pipeline orchestrator.

use std::path::PathBuf;

use antlrgen_manifest::Config;

use super::{
    Diagnostic, Plugin, RunContext, Stage, StageInfo,
    stages::{CleanStage, CollectStage, FetchStage, GenerateStage, ProvisionStage, StagingStage},
};
use crate::{CommandRunner, Fetcher, Result};

/// What a successful run produced.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// Absolute path of the directory holding the generated sources.
    pub output_dir: PathBuf,
    /// Non-fatal diagnostics collected along the way.
    pub diagnostics: Vec<Diagnostic>,
}

/// The pipeline orchestrator.
///
/// Runs the built-in stages (provision, fetch, stage, collect, generate,
/// clean) in order, calling plugin hooks before and after each one. The
/// first error stops the run; later stages never start.
///
/// # Example
///
/// ```ignore
/// let pipeline = Pipeline::new().plugin(TimingPlugin::new());
/// let outcome = pipeline.run(&config, &SystemRunner, &HttpFetcher::new())?;
/// ```
pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
    plugins: Vec<Box<dyn Plugin>>,
}

impl Pipeline {
    /// Create a pipeline with the built-in stages.
    pub fn new() -> Self {
        Self {
            stages: vec![
                Box::new(ProvisionStage),
                Box::new(FetchStage),
                Box::new(StagingStage),
                Box::new(CollectStage),
                Box::new(GenerateStage),
                Box::new(CleanStage),
            ],
            plugins: Vec::new(),
        }
    }

    /// Add a plugin to receive stage lifecycle hooks.
    pub fn plugin(mut self, plugin: impl Plugin + 'static) -> Self {
        self.plugins.push(Box::new(plugin));
        self
    }

    /// The stages in execution order.
    pub fn stages(&self) -> Vec<StageInfo> {
        self.stages.iter().map(|s| s.info()).collect()
    }

    /// Run every stage against `config`.
    ///
    /// # Errors
    ///
    /// Returns the first stage (or plugin) error. The staging directory is
    /// removed before this returns, whatever the outcome.
    pub fn run(
        &self,
        config: &Config,
        runner: &dyn CommandRunner,
        fetcher: &dyn Fetcher,
    ) -> Result<RunOutcome> {
        let mut ctx = RunContext::new(config, runner, fetcher);

        for stage in &self.stages {
            self.run_stage(stage.as_ref(), &mut ctx)?;
        }

        Ok(RunOutcome {
            output_dir: ctx.generated.take().unwrap_or_else(|| config.output_dir()),
            diagnostics: std::mem::take(&mut ctx.diagnostics),
        })
    }

    /// Run a single stage with plugin hooks.
    fn run_stage(&self, stage: &dyn Stage, ctx: &mut RunContext<'_>) -> Result<()> {
        let stage_name = stage.name();
        let result = self.run_hooked(stage, ctx);
        if let Err(e) = &result {
            tracing::debug!(stage = stage_name, "stage failed: {e}");
            for plugin in &self.plugins {
                plugin.on_stage_failed(stage_name, e);
            }
        }
        result
    }

    fn run_hooked(&self, stage: &dyn Stage, ctx: &mut RunContext<'_>) -> Result<()> {
        let stage_name = stage.name();

        // Call before hooks
        for plugin in &self.plugins {
            plugin.on_before_stage(stage_name, ctx)?;
        }

        tracing::info!(stage = stage_name, "{}", stage.description());
        stage.run(ctx)?;

        // Call after hooks
        for plugin in &self.plugins {
            plugin.on_after_stage(stage_name, ctx)?;
        }

        Ok(())
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}
