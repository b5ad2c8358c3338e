//! Check command report data structures.

use std::path::PathBuf;

use antlrgen_pipeline::{Plan, pipeline::StageInfo};

use super::output::{Output, Report};

/// Report data from resolving a run without executing it.
#[derive(Debug)]
pub struct CheckReport {
    /// Everything the run would do.
    pub plan: Plan,
    /// Path of the settings file, `None` for built-in defaults.
    pub settings_path: Option<PathBuf>,
    /// The stages in execution order.
    pub stages: Vec<StageInfo>,
    /// Grammar files that do not exist.
    pub missing_sources: Vec<PathBuf>,
}

impl CheckReport {
    /// Whether a run would fail in the collect stage.
    pub fn has_missing_sources(&self) -> bool {
        !self.missing_sources.is_empty()
    }
}

impl Report for CheckReport {
    fn render(&self, out: &mut dyn Output) {
        for path in &self.missing_sources {
            out.warning(&format!("grammar file not found: {}", path.display()));
        }

        let plan = &self.plan;
        out.title("Plan");
        out.key_value("workspace", &plan.workspace.display().to_string());
        out.key_value(
            "settings",
            &self
                .settings_path
                .as_ref()
                .map_or_else(|| "built-in defaults".to_string(), |p| p.display().to_string()),
        );
        out.key_value("tool", &plan.tool_url);
        out.key_value("archive", &plan.tool_archive.display().to_string());
        out.key_value("staging", &plan.staging_dir.display().to_string());
        out.key_value("output", &plan.output_dir.display().to_string());

        out.newline();
        out.section("Sources");
        for (src, dst) in &plan.sources {
            out.added_item(&format!("{} -> {}", src.display(), dst.display()));
        }

        out.newline();
        out.section("Stages");
        for (i, stage) in self.stages.iter().enumerate() {
            out.numbered_item(i + 1, &format!("{} - {}", stage.name, stage.description));
        }

        out.newline();
        out.section("Commands");
        let commands = plan
            .provision
            .iter()
            .chain([&plan.probe, &plan.generate]);
        for (i, command) in commands.enumerate() {
            out.numbered_item(i + 1, &command.to_string());
        }

        if !self.has_missing_sources() {
            out.newline();
            out.preformatted("✓ ready to generate");
        }
    }
}
