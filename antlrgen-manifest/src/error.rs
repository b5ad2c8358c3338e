use std::path::PathBuf;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Result type for configuration loading (boxed to reduce size on stack)
pub type Result<T> = std::result::Result<T, Box<Error>>;

/// Source context for error reporting.
///
/// Encapsulates the content and filename of a settings file so validation
/// code can point at the offending key.
///
/// # Example
///
/// ```ignore
/// let ctx = SourceContext::new(content, "antlrgen.toml");
/// ctx.validation_error_at("max_heap must look like '500M'", span);
/// ```
#[derive(Debug, Clone)]
pub struct SourceContext {
    src: String,
    filename: String,
}

impl SourceContext {
    /// Create a new source context.
    pub fn new(src: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            filename: filename.into(),
        }
    }

    /// Create a NamedSource for miette error reporting.
    pub fn named_source(&self) -> NamedSource<String> {
        NamedSource::new(&self.filename, self.src.clone())
    }

    /// Create a parse error from a toml error.
    pub fn parse_error(&self, source: toml::de::Error) -> Box<Error> {
        let span = source.span().map(SourceSpan::from);
        Box::new(Error::Parse {
            src: self.named_source(),
            span,
            source,
        })
    }

    /// Create a validation error, pointing at `span` when known.
    pub fn validation_error_at(
        &self,
        message: impl Into<String>,
        span: Option<SourceSpan>,
    ) -> Box<Error> {
        Box::new(Error::Validation {
            src: self.named_source(),
            span,
            message: message.into(),
        })
    }

    /// Find the span of the value assigned to `key`.
    ///
    /// Only looks at `key = value` lines; good enough to underline the
    /// offending setting in a hand-written file.
    pub fn find_value_span(&self, key: &str) -> Option<SourceSpan> {
        let mut offset = 0;
        for line in self.src.split_inclusive('\n') {
            let trimmed = line.trim_start();
            if let Some(rest) = trimmed.strip_prefix(key) {
                let after_key = rest.trim_start();
                if let Some(value) = after_key.strip_prefix('=') {
                    let leading = value.len() - value.trim_start().len();
                    let start = offset + (line.len() - value.len()) + leading;
                    return Some(SourceSpan::from((start, value.trim().len())));
                }
            }
            offset += line.len();
        }
        None
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("failed to read '{path}'")]
    #[diagnostic(help("pass --config <path> pointing at an existing antlrgen.toml"))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse antlrgen.toml")]
    #[diagnostic(code(antlrgen::parse_error))]
    Parse {
        #[source_code]
        src: NamedSource<String>,
        #[label("parse error here")]
        span: Option<SourceSpan>,
        #[source]
        source: toml::de::Error,
    },

    #[error("{message}")]
    #[diagnostic(code(antlrgen::validation_error))]
    Validation {
        #[source_code]
        src: NamedSource<String>,
        #[label("{message}")]
        span: Option<SourceSpan>,
        message: String,
    },

    #[error("workspace root is not set")]
    #[diagnostic(
        code(antlrgen::missing_workspace),
        help("set the {var} environment variable or pass --workspace <dir>")
    )]
    MissingWorkspace { var: &'static str },

    #[error("workspace root '{path}' is not a directory")]
    #[diagnostic(code(antlrgen::invalid_workspace))]
    InvalidWorkspace {
        path: PathBuf,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("invalid input '{input}': {message}")]
    #[diagnostic(code(antlrgen::invalid_input))]
    InvalidInput {
        input: &'static str,
        message: String,
        #[help]
        help: Option<String>,
    },
}

impl Error {
    /// Create an invalid input error
    pub fn invalid_input(input: &'static str, message: impl Into<String>) -> Box<Self> {
        Box::new(Error::InvalidInput {
            input,
            message: message.into(),
            help: None,
        })
    }

    /// Create an invalid input error with a hint
    pub fn invalid_input_with_help(
        input: &'static str,
        message: impl Into<String>,
        help: impl Into<String>,
    ) -> Box<Self> {
        Box::new(Error::InvalidInput {
            input,
            message: message.into(),
            help: Some(help.into()),
        })
    }
}
