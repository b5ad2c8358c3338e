//! Generate command report data structures.

use std::{path::PathBuf, time::Duration};

use antlrgen_pipeline::pipeline::{Diagnostic, StageRecord};

use super::output::{Output, Report};

/// Report data from a successful run.
#[derive(Debug)]
pub struct GenerateReport {
    /// Absolute directory holding the generated sources.
    pub output_dir: PathBuf,
    /// Timing of each stage, in execution order.
    pub stages: Vec<StageRecord>,
    /// Diagnostics collected by the pipeline.
    pub diagnostics: Vec<Diagnostic>,
}

fn format_elapsed(elapsed: Duration) -> String {
    if elapsed < Duration::from_secs(1) {
        format!("{}ms", elapsed.as_millis())
    } else {
        format!("{:.2}s", elapsed.as_secs_f64())
    }
}

impl Report for GenerateReport {
    fn render(&self, out: &mut dyn Output) {
        for diag in self.diagnostics.iter().filter(|d| d.severity.is_warning()) {
            out.warning(&format!("[{}] {}", diag.stage, diag.message));
        }

        out.section("Stages");
        for (i, record) in self.stages.iter().enumerate() {
            out.numbered_item(
                i + 1,
                &format!("{:<10} {}", record.name, format_elapsed(record.elapsed)),
            );
        }

        let notes: Vec<&Diagnostic> = self
            .diagnostics
            .iter()
            .filter(|d| !d.severity.is_warning())
            .collect();
        if !notes.is_empty() {
            out.newline();
            out.section("Notes");
            for diag in notes {
                out.list_item(&format!("[{}] {}", diag.stage, diag.message));
            }
        }

        // Consumers read the last line.
        out.newline();
        out.preformatted(&format!("output={}", self.output_dir.display()));
    }
}

#[cfg(test)]
mod tests {
    use antlrgen_pipeline::pipeline::StageStatus;

    use super::*;
    use crate::reports::output::render_to_string;

    fn record(name: &str, millis: u64) -> StageRecord {
        StageRecord {
            name: name.to_string(),
            status: StageStatus::Completed,
            elapsed: Duration::from_millis(millis),
        }
    }

    #[test]
    fn test_render_generate_report() {
        let report = GenerateReport {
            output_dir: PathBuf::from("/work/gen"),
            stages: vec![
                record("provision", 120),
                record("fetch", 1500),
                record("stage", 2),
                record("collect", 1),
                record("generate", 3200),
                record("clean", 0),
            ],
            diagnostics: vec![
                Diagnostic::info("provision", "using openjdk version \"1.8.0_292\""),
                Diagnostic::warning(
                    "generate",
                    "warning(125): A.g4:3:4: implicit definition of token X",
                ),
            ],
        };

        insta::assert_snapshot!(render_to_string(&report), @r#"
        warning: [generate] warning(125): A.g4:3:4: implicit definition of token X
        Stages:
          1. provision  120ms
          2. fetch      1.50s
          3. stage      2ms
          4. collect    1ms
          5. generate   3.20s
          6. clean      0ms

        Notes:
          - [provision] using openjdk version "1.8.0_292"

        output=/work/gen
        "#);
    }

    #[test]
    fn test_output_line_is_last() {
        let report = GenerateReport {
            output_dir: PathBuf::from("/work/out dir"),
            stages: Vec::new(),
            diagnostics: Vec::new(),
        };

        let rendered = render_to_string(&report);

        assert_eq!(rendered.lines().last(), Some("output=/work/out dir"));
    }
}
