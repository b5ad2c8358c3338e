//! The immutable configuration of one run.

use std::path::{Component, Path, PathBuf};

use crate::{Error, Inputs, Result, Settings, Workspace};

/// Name of the staging directory inside the work directory.
const STAGING_DIR: &str = "source";

/// The work directory of `settings` inside `workspace`.
pub fn work_dir_for(workspace: &Workspace, settings: &Settings) -> PathBuf {
    workspace.join(&settings.work_dir)
}

/// The staging directory of `settings` inside `workspace`.
///
/// Needs no inputs, so a stale directory can be found without knowing
/// which grammars the interrupted run was given.
pub fn staging_dir_for(workspace: &Workspace, settings: &Settings) -> PathBuf {
    work_dir_for(workspace, settings).join(STAGING_DIR)
}

/// Everything a run needs, constructed once at the entry point and passed by
/// reference to every stage.
#[derive(Debug, Clone)]
pub struct Config {
    pub workspace: Workspace,
    pub inputs: Inputs,
    pub settings: Settings,
}

impl Config {
    /// Combine the three parts of a run.
    ///
    /// Fails if the output directory overlaps the work directory: the
    /// staging directory inside it is deleted at the end of every run.
    pub fn new(workspace: Workspace, inputs: Inputs, settings: Settings) -> Result<Self> {
        let output = normalized(&inputs.output);
        let work_dir = normalized(&settings.work_dir);
        if output.starts_with(&work_dir) || work_dir.starts_with(&output) {
            return Err(Error::invalid_input_with_help(
                "output",
                format!(
                    "'{}' overlaps the work directory '{}'",
                    inputs.output.display(),
                    settings.work_dir.display()
                ),
                "generate into a directory outside the work directory, or move work_dir",
            ));
        }
        Ok(Self {
            workspace,
            inputs,
            settings,
        })
    }

    /// Directory holding the tool archive and the staging directory.
    pub fn work_dir(&self) -> PathBuf {
        work_dir_for(&self.workspace, &self.settings)
    }

    /// Where the downloaded tool archive is stored.
    pub fn tool_archive(&self) -> PathBuf {
        self.work_dir().join(self.settings.tool.version.archive_name())
    }

    /// URL the tool archive is downloaded from.
    pub fn tool_url(&self) -> String {
        self.settings.tool.url()
    }

    /// Transient directory the grammar files are copied into.
    pub fn staging_dir(&self) -> PathBuf {
        staging_dir_for(&self.workspace, &self.settings)
    }

    /// Absolute output directory for generated sources.
    pub fn output_dir(&self) -> PathBuf {
        self.workspace.join(&self.inputs.output)
    }

    /// Pairs of (workspace source, staged destination), in input order.
    pub fn staged_sources(&self) -> Vec<(PathBuf, PathBuf)> {
        let staging = self.staging_dir();
        self.inputs
            .grammar_files
            .iter()
            .filter_map(|file| {
                let name = file.file_name()?;
                Some((self.workspace.join(file), staging.join(name)))
            })
            .collect()
    }

    /// The staged copy of the entry grammar.
    pub fn entry_grammar(&self) -> PathBuf {
        self.staging_dir().join(self.inputs.entry_file_name())
    }
}

/// `path` without `.` components. Callers have already rejected `..`.
fn normalized(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| matches!(c, Component::Normal(_)))
        .collect()
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn config(temp: &TempDir) -> Config {
        Config::new(
            Workspace::new(temp.path()).unwrap(),
            Inputs::new("Go", "gen", "g/A.g4,g/B.g4", "g/A.g4").unwrap(),
            Settings::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_derived_paths() {
        let temp = TempDir::new().unwrap();
        let config = config(&temp);
        let root = config.workspace.root().to_path_buf();

        assert_eq!(config.work_dir(), root.join(".antlrgen"));
        assert_eq!(
            config.tool_archive(),
            root.join(".antlrgen").join("antlr-4.8-complete.jar")
        );
        assert_eq!(config.staging_dir(), root.join(".antlrgen").join("source"));
        assert_eq!(config.output_dir(), root.join("gen"));
        assert_eq!(
            config.entry_grammar(),
            root.join(".antlrgen").join("source").join("A.g4")
        );
    }

    #[test]
    fn test_staged_sources_follow_input_order() {
        let temp = TempDir::new().unwrap();
        let config = config(&temp);
        let root = config.workspace.root().to_path_buf();
        let staging = config.staging_dir();

        assert_eq!(
            config.staged_sources(),
            vec![
                (root.join("g/A.g4"), staging.join("A.g4")),
                (root.join("g/B.g4"), staging.join("B.g4")),
            ]
        );
    }

    fn overlapping(output: &str, work_dir: &str) -> bool {
        let temp = TempDir::new().unwrap();
        let settings = Settings {
            work_dir: PathBuf::from(work_dir),
            ..Settings::default()
        };
        let result = Config::new(
            Workspace::new(temp.path()).unwrap(),
            Inputs::new("Go", output, "g/A.g4", "g/A.g4").unwrap(),
            settings,
        );
        match result {
            Ok(_) => false,
            Err(err) => {
                assert!(matches!(*err, Error::InvalidInput { input: "output", .. }));
                true
            }
        }
    }

    #[test]
    fn test_output_must_not_overlap_work_dir() {
        assert!(overlapping(".antlrgen/source/gen", ".antlrgen"));
        assert!(overlapping(".antlrgen/source", ".antlrgen"));
        assert!(overlapping("./.antlrgen/", ".antlrgen"));
        assert!(overlapping(".antlrgen", ".antlrgen"));
        assert!(overlapping("build", "build/antlr"));
        assert!(overlapping(".", ".antlrgen"));
        // A work directory at the workspace root overlaps everything.
        assert!(overlapping("gen", "."));

        assert!(!overlapping("gen", ".antlrgen"));
        assert!(!overlapping(".antlrgen-out", ".antlrgen"));
        assert!(!overlapping("build/gen", "build/antlr"));
    }

    #[test]
    fn test_staging_dir_without_inputs() {
        let temp = TempDir::new().unwrap();
        let workspace = Workspace::new(temp.path()).unwrap();
        let settings = Settings {
            work_dir: PathBuf::from("build/antlr"),
            ..Settings::default()
        };

        assert_eq!(
            staging_dir_for(&workspace, &settings),
            workspace.root().join("build/antlr/source")
        );
    }
}
