use std::{io, path::PathBuf};

use thiserror::Error;

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Why a run failed.
///
/// Every error is terminal: nothing in the pipeline retries or recovers.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to start `{command}`")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("provisioning the Java runtime failed: `{command}` {reason}{}", render_output(.stdout, .stderr))]
    Provision {
        command: String,
        reason: String,
        stdout: String,
        stderr: String,
    },

    #[error("failed to download {url}: {reason}")]
    Download { url: String, reason: String },

    #[error("{action} '{path}'")]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("refusing to replace '{path}': it holds files antlrgen did not stage")]
    UnownedStaging { path: PathBuf },

    #[error("grammar file not found: '{path}'")]
    MissingSource {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("entry grammar '{path}' was not staged")]
    MissingEntryGrammar { path: PathBuf },

    #[error("code generation failed: `{command}` {reason}{}", render_output(.stdout, .stderr))]
    Generator {
        command: String,
        reason: String,
        stdout: String,
        stderr: String,
    },

    #[error("stage '{stage}' needs {missing}, which no earlier stage produced")]
    NotPrepared {
        stage: &'static str,
        missing: &'static str,
    },

    #[error("plugin '{plugin}' aborted the run at stage '{stage}': {message}")]
    Plugin {
        plugin: &'static str,
        stage: String,
        message: String,
    },
}

impl Error {
    /// Build a mapper from an [`io::Error`] for use with `map_err`.
    pub fn io(action: &'static str, path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| Error::Io {
            action,
            path,
            source,
        }
    }

    /// Short name of the error class, used in reports.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Spawn { .. } => "spawn",
            Error::Provision { .. } => "provision",
            Error::Download { .. } => "download",
            Error::Io { .. } => "io",
            Error::UnownedStaging { .. } => "unowned-staging",
            Error::MissingSource { .. } => "missing-source",
            Error::MissingEntryGrammar { .. } => "missing-entry-grammar",
            Error::Generator { .. } => "generator",
            Error::NotPrepared { .. } => "not-prepared",
            Error::Plugin { .. } => "plugin",
        }
    }
}

/// Subprocess output, verbatim, for error messages.
fn render_output(stdout: &str, stderr: &str) -> String {
    let mut out = String::new();
    if !stdout.trim().is_empty() {
        out.push_str("\n--- stdout ---\n");
        out.push_str(stdout.trim_end());
    }
    if !stderr.trim().is_empty() {
        out.push_str("\n--- stderr ---\n");
        out.push_str(stderr.trim_end());
    }
    out
}
