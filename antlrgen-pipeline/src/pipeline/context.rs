//! Run context passed through pipeline stages.

use std::path::PathBuf;

use antlrgen_core::{CommandOutput, CommandSpec};
use antlrgen_manifest::Config;

use super::diagnostic::Diagnostic;
use crate::{CommandRunner, Error, Fetcher, Result, StagingDir};

/// Context passed through all pipeline stages.
///
/// Holds the immutable configuration, the host seams, and the results each
/// stage leaves for the next. Dropping the context drops the staging guard.
pub struct RunContext<'a> {
    /// The configuration of this run.
    pub config: &'a Config,
    runner: &'a dyn CommandRunner,
    fetcher: &'a dyn Fetcher,
    /// The downloaded tool archive (set by the fetch stage).
    pub archive: Option<PathBuf>,
    /// The staging directory guard (set by the stage stage, taken by clean).
    pub staging: Option<StagingDir>,
    /// Staged grammar files, in input order (set by the collect stage).
    pub staged: Vec<PathBuf>,
    /// Directory holding the generated sources (set by the generate stage).
    pub generated: Option<PathBuf>,
    /// Diagnostics collected during the run.
    pub diagnostics: Vec<Diagnostic>,
}

impl<'a> RunContext<'a> {
    /// Create a new context for `config`.
    pub fn new(
        config: &'a Config,
        runner: &'a dyn CommandRunner,
        fetcher: &'a dyn Fetcher,
    ) -> Self {
        Self {
            config,
            runner,
            fetcher,
            archive: None,
            staging: None,
            staged: Vec::new(),
            generated: None,
            diagnostics: Vec::new(),
        }
    }

    /// Run a command to completion.
    ///
    /// Only failure to start the process is an error here; callers decide
    /// what exit status and output mean.
    pub fn run_command(&self, command: &CommandSpec) -> Result<CommandOutput> {
        tracing::debug!(%command, "running");
        let output = self.runner.run(command).map_err(|source| Error::Spawn {
            command: command.to_string(),
            source,
        })?;
        tracing::debug!(%command, status = %output.status_text(), "finished");
        Ok(output)
    }

    pub fn fetcher(&self) -> &dyn Fetcher {
        self.fetcher
    }

    /// Add a warning diagnostic.
    pub fn add_warning(&mut self, stage: &str, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic::warning(stage, message));
    }

    /// Add an info diagnostic.
    pub fn add_info(&mut self, stage: &str, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic::info(stage, message));
    }

    /// Check if any warning diagnostics have been recorded.
    pub fn has_warnings(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity.is_warning())
    }
}
