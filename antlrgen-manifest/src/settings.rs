//! Tool, JDK and generator settings read from `antlrgen.toml`.

use std::{
    path::{Component, Path, PathBuf},
    str::FromStr,
};

use antlrgen_core::ToolVersion;
use serde::{Deserialize, Serialize};

use crate::{Error, Result, SourceContext};

/// Default settings file name, looked up in the workspace root.
pub const SETTINGS_FILE: &str = "antlrgen.toml";

/// Root of `antlrgen.toml`. Every field has a default, so an empty file (or
/// no file at all) is valid.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Workspace-relative directory holding the tool archive and staging area.
    pub work_dir: PathBuf,
    pub tool: ToolSettings,
    pub jdk: JdkSettings,
    pub generator: GeneratorSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            work_dir: PathBuf::from(".antlrgen"),
            tool: ToolSettings::default(),
            jdk: JdkSettings::default(),
            generator: GeneratorSettings::default(),
        }
    }
}

/// `[tool]`: which ANTLR archive to fetch and how to start it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolSettings {
    pub version: ToolVersion,
    /// Overrides the URL derived from `version`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub main_class: String,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            version: ToolVersion::default(),
            url: None,
            main_class: "org.antlr.v4.Tool".to_string(),
        }
    }
}

impl ToolSettings {
    /// The URL the archive is downloaded from.
    pub fn url(&self) -> String {
        self.url
            .clone()
            .unwrap_or_else(|| self.version.download_url())
    }
}

/// `[jdk]`: how the Java runtime is provisioned.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct JdkSettings {
    /// Install the runtime with the system package manager. When false the
    /// runtime is only probed.
    pub install: bool,
    pub major: u32,
    /// Overrides the package derived from `major`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
    pub sudo: bool,
    /// The `java` launcher used for probing and generation.
    pub java: PathBuf,
    /// Delete `stale_hooks` before refreshing the package index.
    pub remove_stale_hooks: bool,
    pub stale_hooks: Vec<PathBuf>,
}

impl Default for JdkSettings {
    fn default() -> Self {
        Self {
            install: true,
            major: 8,
            package: None,
            sudo: true,
            java: PathBuf::from("java"),
            remove_stale_hooks: true,
            // Its Post-Invoke hook makes `apt-get update` fail on some runner images.
            stale_hooks: vec![PathBuf::from("/etc/apt/apt.conf.d/50command-not-found")],
        }
    }
}

impl JdkSettings {
    /// The headless runtime package to install.
    pub fn package(&self) -> String {
        self.package
            .clone()
            .unwrap_or_else(|| format!("openjdk-{}-jre-headless", self.major))
    }
}

/// `[generator]`: arguments for the tool invocation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorSettings {
    /// JVM heap ceiling, as accepted by `-Xmx` (e.g. `500M`).
    pub max_heap: String,
    /// Treat any stderr output from the tool as a failure.
    pub strict_stderr: bool,
    /// Package/namespace for generated code (`-package`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
    /// Generate a parse tree visitor (`-visitor`).
    pub visitor: bool,
    /// Generate a parse tree listener; `-no-listener` when false.
    pub listener: bool,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            max_heap: "500M".to_string(),
            strict_stderr: true,
            package: None,
            visitor: false,
            listener: true,
        }
    }
}

impl FromStr for Settings {
    type Err = Box<Error>;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_str_with_filename(s, SETTINGS_FILE)
    }
}

impl Settings {
    /// Parse settings from a file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Box::new(Error::Io {
                path: path.to_path_buf(),
                source: e,
            })
        })?;
        Self::from_str_with_filename(&content, &path.display().to_string())
    }

    /// Parse settings from a string with a custom filename for error reporting.
    pub fn from_str_with_filename(content: &str, filename: &str) -> Result<Self> {
        let source_ctx = SourceContext::new(content, filename);
        let settings: Self = toml::from_str(content).map_err(|e| source_ctx.parse_error(e))?;
        settings.validate(&source_ctx)?;
        Ok(settings)
    }

    fn validate(&self, ctx: &SourceContext) -> Result<()> {
        let escapes = self
            .work_dir
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(ctx.validation_error_at(
                "work_dir must be a relative path inside the workspace",
                ctx.find_value_span("work_dir"),
            ));
        }
        // Empty or only `.` components: the workspace root itself.
        let is_root = !self
            .work_dir
            .components()
            .any(|c| matches!(c, Component::Normal(_)));
        if is_root {
            return Err(ctx.validation_error_at(
                "work_dir must name a directory below the workspace root",
                ctx.find_value_span("work_dir"),
            ));
        }

        if let Some(url) = &self.tool.url {
            if !(url.starts_with("https://") || url.starts_with("http://")) {
                return Err(ctx.validation_error_at(
                    "tool.url must be an http(s) URL",
                    ctx.find_value_span("url"),
                ));
            }
        }

        if self.tool.main_class.trim().is_empty() {
            return Err(ctx.validation_error_at(
                "tool.main_class must not be empty",
                ctx.find_value_span("main_class"),
            ));
        }

        if self.jdk.major == 0 {
            return Err(ctx.validation_error_at(
                "jdk.major must be a Java major version such as 8 or 17",
                ctx.find_value_span("major"),
            ));
        }

        if !is_heap_size(&self.generator.max_heap) {
            return Err(ctx.validation_error_at(
                "generator.max_heap must look like '500M', '2G' or '524288k'",
                ctx.find_value_span("max_heap"),
            ));
        }

        Ok(())
    }
}

/// `-Xmx` accepts a byte count with an optional k/m/g suffix.
fn is_heap_size(value: &str) -> bool {
    let digits = value.trim_end_matches(['k', 'K', 'm', 'M', 'g', 'G']);
    let suffix_len = value.len() - digits.len();
    !digits.is_empty() && suffix_len <= 1 && digits.chars().all(|c| c.is_ascii_digit())
}

/// A settings file that may or may not exist on disk.
#[derive(Debug, Clone)]
pub struct SettingsFile {
    path: Option<PathBuf>,
    settings: Settings,
}

impl SettingsFile {
    /// Load settings.
    ///
    /// An `explicit` path must exist. Without one, `default_path` is used if
    /// present and built-in defaults otherwise.
    pub fn load(explicit: Option<&Path>, default_path: &Path) -> Result<Self> {
        let path = match explicit {
            Some(path) => path,
            None if default_path.is_file() => default_path,
            None => {
                return Ok(Self {
                    path: None,
                    settings: Settings::default(),
                });
            }
        };
        Ok(Self {
            path: Some(path.to_path_buf()),
            settings: Settings::from_file(path)?,
        })
    }

    /// The file the settings came from, `None` for built-in defaults.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn into_settings(self) -> Settings {
        self.settings
    }
}
