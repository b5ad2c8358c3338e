//! The four step inputs.

use std::{
    collections::HashSet,
    ffi::OsStr,
    path::{Component, Path, PathBuf},
};

use serde::Serialize;

use crate::{Error, Result};

/// Inputs of one run, validated and immutable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Inputs {
    /// Target language, passed verbatim to the tool as `-Dlanguage=`.
    pub language: String,
    /// Workspace-relative output directory.
    pub output: PathBuf,
    /// Workspace-relative grammar files, in staging order.
    pub grammar_files: Vec<PathBuf>,
    /// Workspace-relative entry grammar.
    pub main_grammar: PathBuf,
}

impl Inputs {
    /// Build inputs from their raw string forms.
    ///
    /// `grammar_files` is the comma-separated list the CI platform hands over.
    pub fn new(
        language: &str,
        output: &str,
        grammar_files: &str,
        main_grammar: &str,
    ) -> Result<Self> {
        Self::from_parts(
            language,
            PathBuf::from(output.trim()),
            parse_file_list(grammar_files)?,
            PathBuf::from(main_grammar.trim()),
        )
    }

    /// Build inputs from already split values.
    pub fn from_parts(
        language: impl Into<String>,
        output: PathBuf,
        grammar_files: Vec<PathBuf>,
        main_grammar: PathBuf,
    ) -> Result<Self> {
        let language = language.into().trim().to_string();
        if language.is_empty() {
            return Err(Error::invalid_input_with_help(
                "language",
                "must not be empty",
                "use one of the ANTLR targets, e.g. Java, Go, Python3, Cpp, CSharp",
            ));
        }

        check_relative("output", &output)?;

        if grammar_files.is_empty() {
            return Err(Error::invalid_input(
                "grammar-files",
                "at least one grammar file is required",
            ));
        }
        let mut seen = HashSet::new();
        for file in &grammar_files {
            check_relative("grammar-files", file)?;
            let Some(name) = file.file_name() else {
                return Err(Error::invalid_input(
                    "grammar-files",
                    format!("'{}' does not name a file", file.display()),
                ));
            };
            if !seen.insert(name.to_os_string()) {
                return Err(Error::invalid_input_with_help(
                    "grammar-files",
                    format!(
                        "'{}' appears more than once",
                        Path::new(name).display()
                    ),
                    "grammar files are staged by file name, so names must be unique",
                ));
            }
        }

        check_relative("main-grammar", &main_grammar)?;
        let staged = main_grammar
            .file_name()
            .is_some_and(|name| seen.contains(name));
        if !staged {
            return Err(Error::invalid_input_with_help(
                "main-grammar",
                format!(
                    "'{}' is not one of the grammar files",
                    main_grammar.display()
                ),
                "add the entry grammar to grammar-files",
            ));
        }

        Ok(Self {
            language,
            output,
            grammar_files,
            main_grammar,
        })
    }

    /// File name of the entry grammar once staged.
    pub fn entry_file_name(&self) -> &OsStr {
        // from_parts guarantees a file name
        self.main_grammar
            .file_name()
            .unwrap_or(self.main_grammar.as_os_str())
    }
}

/// Split a comma (or newline) separated list of paths.
///
/// Entries are trimmed; empty entries are rejected rather than silently
/// skipped so a stray comma doesn't hide a typo.
pub fn parse_file_list(list: &str) -> Result<Vec<PathBuf>> {
    if list.trim().is_empty() {
        return Err(Error::invalid_input(
            "grammar-files",
            "at least one grammar file is required",
        ));
    }
    list.split([',', '\n'])
        .map(str::trim)
        .enumerate()
        .map(|(i, entry)| {
            if entry.is_empty() {
                Err(Error::invalid_input(
                    "grammar-files",
                    format!("entry {} is empty", i + 1),
                ))
            } else {
                Ok(PathBuf::from(entry))
            }
        })
        .collect()
}

/// Reject paths that would escape the workspace.
fn check_relative(input: &'static str, path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(Error::invalid_input(input, "must not be empty"));
    }
    let escapes = path.components().any(|c| {
        matches!(
            c,
            Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    });
    if escapes {
        return Err(Error::invalid_input_with_help(
            input,
            format!("'{}' is not inside the workspace", path.display()),
            "paths are relative to the workspace root and may not contain '..'",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input_name(err: &Error) -> &'static str {
        match err {
            Error::InvalidInput { input, .. } => *input,
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_new_scenario_inputs() {
        let inputs = Inputs::new("Go", "gen", "g/A.g4,g/B.g4", "g/A.g4").unwrap();

        assert_eq!(inputs.language, "Go");
        assert_eq!(inputs.output, PathBuf::from("gen"));
        assert_eq!(
            inputs.grammar_files,
            vec![PathBuf::from("g/A.g4"), PathBuf::from("g/B.g4")]
        );
        assert_eq!(inputs.entry_file_name(), "A.g4");
    }

    #[test]
    fn test_file_list_trims_and_keeps_order() {
        let files = parse_file_list(" g/Lexer.g4 ,\ng/Parser.g4").unwrap();
        assert_eq!(
            files,
            vec![PathBuf::from("g/Lexer.g4"), PathBuf::from("g/Parser.g4")]
        );
    }

    #[test]
    fn test_file_list_rejects_empty_entries() {
        let err = parse_file_list("g/A.g4,,g/B.g4").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid input 'grammar-files': entry 2 is empty"
        );
        assert!(parse_file_list("   ").is_err());
    }

    #[test]
    fn test_empty_language_rejected() {
        let err = Inputs::new(" ", "gen", "A.g4", "A.g4").unwrap_err();
        assert_eq!(input_name(&err), "language");
    }

    #[test]
    fn test_main_grammar_must_be_staged() {
        let err = Inputs::new("Go", "gen", "g/A.g4,g/B.g4", "g/C.g4").unwrap_err();
        assert_eq!(input_name(&err), "main-grammar");
    }

    #[test]
    fn test_main_grammar_matched_by_file_name() {
        let inputs = Inputs::new("Java", "gen", "grammars/Expr.g4", "Expr.g4").unwrap();
        assert_eq!(inputs.entry_file_name(), "Expr.g4");
    }

    #[test]
    fn test_duplicate_file_names_rejected() {
        let err = Inputs::new("Go", "gen", "a/X.g4,b/X.g4", "a/X.g4").unwrap_err();
        assert_eq!(input_name(&err), "grammar-files");
    }

    #[test]
    fn test_paths_must_stay_in_workspace() {
        let err = Inputs::new("Go", "../gen", "A.g4", "A.g4").unwrap_err();
        assert_eq!(input_name(&err), "output");

        let err = Inputs::new("Go", "gen", "/etc/A.g4", "A.g4").unwrap_err();
        assert_eq!(input_name(&err), "grammar-files");

        let err = Inputs::new("Go", "", "A.g4", "A.g4").unwrap_err();
        assert_eq!(input_name(&err), "output");
    }
}
