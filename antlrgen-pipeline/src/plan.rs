//! Command construction.
//!
//! Every external command is built here as an argument vector, so the
//! stages and the `check` report agree on exactly what will run.

use std::path::{Path, PathBuf};

use antlrgen_core::CommandSpec;
use antlrgen_manifest::{Config, JdkSettings};
use serde::Serialize;

/// Commands that install the Java runtime, in execution order.
///
/// Empty when installation is disabled.
pub fn provision_commands(jdk: &JdkSettings) -> Vec<CommandSpec> {
    if !jdk.install {
        return Vec::new();
    }

    let mut commands = Vec::new();
    if jdk.remove_stale_hooks && !jdk.stale_hooks.is_empty() {
        commands.push(
            CommandSpec::new("rm")
                .arg("-f")
                .args(&jdk.stale_hooks)
                .sudo(jdk.sudo),
        );
    }
    commands.push(CommandSpec::new("apt-get").arg("update").sudo(jdk.sudo));
    commands.push(
        CommandSpec::new("apt-get")
            .args(["install", "-y", "--no-install-recommends"])
            .arg(jdk.package())
            .sudo(jdk.sudo),
    );
    commands
}

/// Checks that the `java` launcher runs.
pub fn java_probe(jdk: &JdkSettings) -> CommandSpec {
    CommandSpec::new(&jdk.java).arg("-version")
}

/// The tool invocation for `config`, using the archive at `archive`.
pub fn generator_command(config: &Config, archive: &Path) -> CommandSpec {
    let settings = &config.settings;
    let generator = &settings.generator;

    let mut command = CommandSpec::new(&settings.jdk.java)
        .arg(format!("-Xmx{}", generator.max_heap))
        .arg("-cp")
        .arg(archive)
        .arg(&settings.tool.main_class)
        .arg(format!("-Dlanguage={}", config.inputs.language));
    if let Some(package) = &generator.package {
        command = command.args(["-package", package.as_str()]);
    }
    if generator.visitor {
        command = command.arg("-visitor");
    }
    if !generator.listener {
        command = command.arg("-no-listener");
    }
    command
        .arg("-o")
        .arg(config.output_dir())
        .arg(config.entry_grammar())
}

/// Everything a run would do, resolved without doing it.
#[derive(Debug, Clone, Serialize)]
pub struct Plan {
    pub workspace: PathBuf,
    pub tool_url: String,
    pub tool_archive: PathBuf,
    pub staging_dir: PathBuf,
    pub output_dir: PathBuf,
    /// (workspace source, staged copy) pairs.
    pub sources: Vec<(PathBuf, PathBuf)>,
    pub provision: Vec<CommandSpec>,
    pub probe: CommandSpec,
    pub generate: CommandSpec,
}

impl Plan {
    pub fn new(config: &Config) -> Self {
        let jdk = &config.settings.jdk;
        let tool_archive = config.tool_archive();
        Self {
            workspace: config.workspace.root().to_path_buf(),
            tool_url: config.tool_url(),
            generate: generator_command(config, &tool_archive),
            tool_archive,
            staging_dir: config.staging_dir(),
            output_dir: config.output_dir(),
            sources: config.staged_sources(),
            provision: provision_commands(jdk),
            probe: java_probe(jdk),
        }
    }
}

#[cfg(test)]
mod tests {
    use antlrgen_manifest::{Inputs, Settings, Workspace};
    use tempfile::TempDir;

    use super::*;

    fn config(temp: &TempDir, settings: Settings) -> Config {
        Config::new(
            Workspace::new(temp.path()).unwrap(),
            Inputs::new("Go", "gen", "g/A.g4,g/B.g4", "g/A.g4").unwrap(),
            settings,
        )
        .unwrap()
    }

    /// Render with the temp root replaced so snapshots are stable.
    fn render(command: &CommandSpec, config: &Config) -> String {
        command
            .to_string()
            .replace(&config.workspace.root().display().to_string(), "$WS")
    }

    #[test]
    fn test_default_provision_commands() {
        let rendered: Vec<String> = provision_commands(&JdkSettings::default())
            .iter()
            .map(ToString::to_string)
            .collect();

        assert_eq!(
            rendered,
            vec![
                "sudo rm -f /etc/apt/apt.conf.d/50command-not-found",
                "sudo apt-get update",
                "sudo apt-get install -y --no-install-recommends openjdk-8-jre-headless",
            ]
        );
    }

    #[test]
    fn test_provision_without_workaround_or_sudo() {
        let jdk = JdkSettings {
            sudo: false,
            remove_stale_hooks: false,
            major: 17,
            ..JdkSettings::default()
        };
        let rendered: Vec<String> = provision_commands(&jdk)
            .iter()
            .map(ToString::to_string)
            .collect();

        assert_eq!(
            rendered,
            vec![
                "apt-get update",
                "apt-get install -y --no-install-recommends openjdk-17-jre-headless",
            ]
        );
    }

    #[test]
    fn test_provision_disabled() {
        let jdk = JdkSettings {
            install: false,
            ..JdkSettings::default()
        };
        assert!(provision_commands(&jdk).is_empty());
        assert_eq!(java_probe(&jdk).to_string(), "java -version");
    }

    #[test]
    fn test_generator_command() {
        let temp = TempDir::new().unwrap();
        let config = config(&temp, Settings::default());
        let command = generator_command(&config, &config.tool_archive());

        insta::assert_snapshot!(render(&command, &config), @"java -Xmx500M -cp $WS/.antlrgen/antlr-4.8-complete.jar org.antlr.v4.Tool -Dlanguage=Go -o $WS/gen $WS/.antlrgen/source/A.g4");
    }

    #[test]
    fn test_generator_command_with_options() {
        let temp = TempDir::new().unwrap();
        let mut settings = Settings::default();
        settings.generator.package = Some("calc".to_string());
        settings.generator.visitor = true;
        settings.generator.listener = false;
        settings.generator.max_heap = "1G".to_string();
        let config = config(&temp, settings);
        let command = generator_command(&config, &config.tool_archive());

        insta::assert_snapshot!(render(&command, &config), @"java -Xmx1G -cp $WS/.antlrgen/antlr-4.8-complete.jar org.antlr.v4.Tool -Dlanguage=Go -package calc -visitor -no-listener -o $WS/gen $WS/.antlrgen/source/A.g4");
    }

    #[test]
    fn test_plan_matches_config() {
        let temp = TempDir::new().unwrap();
        let config = config(&temp, Settings::default());
        let plan = Plan::new(&config);

        assert_eq!(plan.tool_archive, config.tool_archive());
        assert_eq!(plan.sources.len(), 2);
        assert_eq!(plan.provision.len(), 3);
        assert_eq!(plan.generate, generator_command(&config, &config.tool_archive()));
    }
}
