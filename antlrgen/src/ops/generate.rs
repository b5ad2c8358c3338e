//! Generate operation - run the pipeline end to end.

use antlrgen_manifest::Config;
use antlrgen_pipeline::{
    CommandRunner, Fetcher, Pipeline,
    pipeline::{StageStatus, TimingPlugin},
};
use eyre::{Result, WrapErr};

use crate::reports::GenerateReport;

/// Execute the generate operation.
///
/// On failure the error names the stage that stopped the run.
pub fn generate(
    config: &Config,
    runner: &dyn CommandRunner,
    fetcher: &dyn Fetcher,
) -> Result<GenerateReport> {
    let timing = TimingPlugin::new();
    let pipeline = Pipeline::new().plugin(timing.clone());

    let result = pipeline.run(config, runner, fetcher);
    let stages = timing.records();

    let failed_stage = stages
        .iter()
        .rev()
        .find(|r| r.status == StageStatus::Failed)
        .map(|r| r.name.clone());
    let outcome = result.wrap_err_with(|| match &failed_stage {
        Some(stage) => format!("Stage '{stage}' failed"),
        None => "Pipeline failed".to_string(),
    })?;

    Ok(GenerateReport {
        output_dir: outcome.output_dir,
        stages,
        diagnostics: outcome.diagnostics,
    })
}
