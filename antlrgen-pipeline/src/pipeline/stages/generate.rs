//! Generate stage - runs the tool against the entry grammar.

use antlrgen_core::ensure_dir;

use crate::{
    Error, Result,
    pipeline::{RunContext, Stage},
    plan::generator_command,
};

/// Stage that invokes the tool on the staged entry grammar.
///
/// Imported grammars resolve against the staging directory because every
/// listed file sits next to the entry grammar there. Output lands in the
/// configured output directory, which is created if needed.
///
/// Any stderr output fails the run unless `generator.strict_stderr` is
/// off, in which case it becomes a warning.
pub struct GenerateStage;

impl Stage for GenerateStage {
    fn name(&self) -> &'static str {
        "generate"
    }

    fn description(&self) -> &'static str {
        "Run the parser generator"
    }

    fn run(&self, ctx: &mut RunContext<'_>) -> Result<()> {
        let config = ctx.config;

        let entry = config.entry_grammar();
        if !ctx.staged.contains(&entry) || !entry.is_file() {
            return Err(Error::MissingEntryGrammar { path: entry });
        }
        let archive = ctx.archive.clone().ok_or(Error::NotPrepared {
            stage: self.name(),
            missing: "the tool archive",
        })?;

        let output_dir = config.output_dir();
        ensure_dir(&output_dir)
            .map_err(Error::io("failed to create output directory", &output_dir))?;

        let command = generator_command(config, &archive);
        let output = ctx.run_command(&command)?;

        let has_stderr = !output.stderr.trim().is_empty();
        if !output.success() || (has_stderr && config.settings.generator.strict_stderr) {
            let reason = if output.success() {
                "wrote to stderr".to_string()
            } else {
                format!("exited with {}", output.status_text())
            };
            return Err(Error::Generator {
                command: command.to_string(),
                reason,
                stdout: output.stdout,
                stderr: output.stderr,
            });
        }
        if has_stderr {
            ctx.add_warning(self.name(), output.stderr.trim_end());
        }

        ctx.generated = Some(output_dir);
        Ok(())
    }
}
