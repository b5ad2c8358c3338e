mod check;
mod clean;
mod completions;
mod generate;

use std::path::{Path, PathBuf};

use antlrgen_core::ToolVersion;
use antlrgen_manifest::{Config, Inputs, SETTINGS_FILE, Settings, SettingsFile, Workspace};
use check::CheckCommand;
use clap::{ArgAction, Args, Parser, Subcommand};
use clean::CleanCommand;
use completions::CompletionsCommand;
use eyre::Result;
use generate::GenerateCommand;

/// Extension trait for exiting on manifest errors with pretty formatting
pub(crate) trait UnwrapOrExit<T> {
    fn unwrap_or_exit(self) -> T;
}

impl<T> UnwrapOrExit<T> for antlrgen_manifest::Result<T> {
    fn unwrap_or_exit(self) -> T {
        match self {
            Ok(v) => v,
            Err(e) => {
                eprintln!("{:?}", miette::Report::new(*e));
                std::process::exit(1);
            }
        }
    }
}

#[derive(Parser)]
#[command(name = "antlrgen")]
#[command(version)]
#[command(about = "Generate parsers from ANTLR grammars in CI")]
pub(crate) struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.global.verbose
    }

    pub fn run(&self) -> Result<()> {
        match &self.command {
            Commands::Generate(cmd) => cmd.run(&self.global),
            Commands::Check(cmd) => cmd.run(&self.global),
            Commands::Clean(cmd) => cmd.run(&self.global),
            Commands::Completions(cmd) => cmd.run(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Install Java, fetch ANTLR and generate sources from the grammars
    Generate(GenerateCommand),

    /// Validate inputs and settings and show what generate would do
    Check(CheckCommand),

    /// Remove a staging directory left behind by an interrupted run
    Clean(CleanCommand),

    /// Generate shell completions
    Completions(CompletionsCommand),
}

/// Options shared by every subcommand.
#[derive(Args, Debug)]
pub(crate) struct GlobalArgs {
    /// Increase log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Workspace root (defaults to $GITHUB_WORKSPACE)
    #[arg(long, global = true, value_name = "DIR")]
    pub workspace: Option<PathBuf>,

    /// Path to antlrgen.toml (defaults to <workspace>/antlrgen.toml)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl GlobalArgs {
    /// Resolve the workspace root from `--workspace` or the environment.
    pub fn workspace(&self) -> antlrgen_manifest::Result<Workspace> {
        Workspace::discover(self.workspace.as_deref())
    }

    /// Load settings for `workspace`.
    pub fn settings(&self, workspace: &Workspace) -> antlrgen_manifest::Result<SettingsFile> {
        SettingsFile::load(self.config.as_deref(), &workspace.join(SETTINGS_FILE))
    }
}

/// The four run inputs, with the environment names a CI runner sets.
#[derive(Args, Debug)]
pub(crate) struct InputArgs {
    /// Target language passed to ANTLR as -Dlanguage (e.g. Java, Go, Python3)
    #[arg(short, long, env = "INPUT_LANGUAGE")]
    pub language: String,

    /// Output directory for generated sources, relative to the workspace
    #[arg(short, long, env = "INPUT_OUTPUT")]
    pub output: String,

    /// Comma-separated grammar files, relative to the workspace
    #[arg(short, long, env = "INPUT_GRAMMAR-FILES", value_name = "FILES")]
    pub grammar_files: String,

    /// The grammar to generate from; must be one of the grammar files
    #[arg(short, long, env = "INPUT_MAIN-GRAMMAR", value_name = "FILE")]
    pub main_grammar: String,

    /// ANTLR version to download (overrides antlrgen.toml)
    #[arg(long, value_name = "VERSION")]
    pub tool_version: Option<ToolVersion>,

    /// URL to download the ANTLR archive from (overrides antlrgen.toml)
    #[arg(long, value_name = "URL", value_parser = parse_url)]
    pub tool_url: Option<String>,

    /// Skip the package manager and only check that java runs
    #[arg(long)]
    pub skip_jdk_install: bool,
}

impl InputArgs {
    pub fn inputs(&self) -> antlrgen_manifest::Result<Inputs> {
        Inputs::new(
            &self.language,
            &self.output,
            &self.grammar_files,
            &self.main_grammar,
        )
    }

    /// Apply command-line overrides on top of file settings.
    pub fn apply_overrides(&self, settings: &mut Settings) {
        if let Some(version) = &self.tool_version {
            settings.tool.version = version.clone();
        }
        if let Some(url) = &self.tool_url {
            settings.tool.url = Some(url.clone());
        }
        if self.skip_jdk_install {
            settings.jdk.install = false;
        }
    }
}

fn parse_url(value: &str) -> std::result::Result<String, String> {
    if value.starts_with("https://") || value.starts_with("http://") {
        Ok(value.to_string())
    } else {
        Err(format!("'{value}' is not an http(s) URL"))
    }
}

/// Resolve the run configuration, exiting with a diagnostic on bad input.
///
/// Returns the settings file path alongside, `None` for built-in defaults.
pub(crate) fn load_config(global: &GlobalArgs, args: &InputArgs) -> (Config, Option<PathBuf>) {
    let workspace = global.workspace().unwrap_or_exit();
    let settings_file = global.settings(&workspace).unwrap_or_exit();
    let inputs = args.inputs().unwrap_or_exit();

    let source = settings_file.path().map(Path::to_path_buf);
    let mut settings = settings_file.into_settings();
    args.apply_overrides(&mut settings);

    tracing::debug!(
        workspace = %workspace.root().display(),
        settings = ?source,
        "resolved configuration"
    );
    (Config::new(workspace, inputs, settings).unwrap_or_exit(), source)
}
