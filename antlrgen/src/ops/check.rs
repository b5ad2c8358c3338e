//! Check operation - resolve everything a run would do without doing it.

use std::path::PathBuf;

use antlrgen_manifest::Config;
use antlrgen_pipeline::{Pipeline, Plan};

use crate::reports::CheckReport;

/// Execute the check operation.
///
/// Nothing is installed, downloaded or written. Grammar files that do not
/// exist yet are listed in the report so the caller can fail early.
pub fn check(config: &Config, settings_path: Option<PathBuf>) -> CheckReport {
    let plan = Plan::new(config);
    let missing_sources = plan
        .sources
        .iter()
        .map(|(src, _)| src)
        .filter(|src| !src.is_file())
        .cloned()
        .collect();

    CheckReport {
        stages: Pipeline::new().stages(),
        settings_path,
        missing_sources,
        plan,
    }
}
