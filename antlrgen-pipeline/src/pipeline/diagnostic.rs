//! Non-fatal findings collected while the pipeline runs.
//!
//! Fatal problems are [`Error`](crate::Error)s and stop the run; diagnostics
//! are what is worth telling the user about a run that still succeeds.

use serde::Serialize;

/// Severity level for a diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Severity {
    /// Something the user should look at, e.g. tool warnings in relaxed mode.
    Warning,
    /// Informational message about the run.
    Info,
}

impl Severity {
    /// Returns true if this is a warning severity.
    pub fn is_warning(&self) -> bool {
        matches!(self, Severity::Warning)
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// A diagnostic message from a stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    /// The stage that produced this diagnostic.
    pub stage: String,
    pub message: String,
}

impl Diagnostic {
    /// Create a new warning diagnostic.
    pub fn warning(stage: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            stage: stage.into(),
            message: message.into(),
        }
    }

    /// Create a new info diagnostic.
    pub fn info(stage: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            stage: stage.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}]: {}", self.severity, self.stage, self.message)
    }
}
