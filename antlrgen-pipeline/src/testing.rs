//! Test doubles for the pipeline's host seams.
//!
//! This module is only available when the `testing` feature is enabled
//! or during tests.

use std::{
    ffi::OsStr,
    fs,
    io::{self, Cursor, Read},
    path::{Path, PathBuf},
    sync::{Arc, Mutex, PoisonError},
};

use antlrgen_core::{CommandOutput, CommandSpec};

use crate::{
    CommandRunner, Download, Error, Fetcher, Result,
    pipeline::{Plugin, RunContext},
};

/// What the fake `java -version` prints on stderr.
pub const JAVA_VERSION_BANNER: &str = "openjdk version \"1.8.0_292\"\nOpenJDK Runtime Environment (build 1.8.0_292-8u292-b10-0ubuntu1~20.04-b10)\n";

/// Write `(relative path, contents)` pairs under `root`, creating parents.
pub fn write_workspace_files(root: &Path, files: &[(&str, &str)]) {
    for (relative, contents) in files {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("failed to create fixture directory");
        }
        fs::write(&path, contents).expect("failed to write fixture file");
    }
}

/// Sorted `(file name, contents)` of every file directly in `dir`.
pub fn read_dir_sorted(dir: &Path) -> Vec<(String, String)> {
    let mut entries: Vec<(String, String)> = fs::read_dir(dir)
        .expect("failed to read directory")
        .map(|entry| {
            let path = entry.expect("failed to read directory entry").path();
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let contents = fs::read_to_string(&path).unwrap_or_default();
            (name, contents)
        })
        .collect();
    entries.sort();
    entries
}

/// A [`CommandRunner`] that records calls instead of spawning processes.
///
/// By default every command succeeds silently, `-version` probes print a
/// JDK banner, and a tool invocation (anything with `-o`) writes a lexer
/// and a parser for the entry grammar into the output directory. The
/// generated contents depend only on the grammar bytes and the target
/// language, so reruns are byte-identical.
#[derive(Debug, Default)]
pub struct FakeRunner {
    calls: Mutex<Vec<CommandSpec>>,
    responses: Vec<(String, CommandOutput)>,
    unavailable: Vec<String>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer with `output` for any command whose rendering contains
    /// `needle`.
    ///
    /// A successful response to a tool invocation still writes the
    /// generated files; a failing one writes nothing.
    pub fn respond_when(mut self, needle: impl Into<String>, output: CommandOutput) -> Self {
        self.responses.push((needle.into(), output));
        self
    }

    /// Shorthand for a failing response.
    pub fn fail_when(self, needle: impl Into<String>, output: CommandOutput) -> Self {
        self.respond_when(needle, output)
    }

    /// Fail to spawn any command whose rendering contains `needle`.
    pub fn unavailable(mut self, needle: impl Into<String>) -> Self {
        self.unavailable.push(needle.into());
        self
    }

    /// Every command run so far, in order.
    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// [`FakeRunner::calls`] rendered as shell-like strings.
    pub fn rendered_calls(&self) -> Vec<String> {
        self.calls().iter().map(ToString::to_string).collect()
    }

    fn response_for(&self, rendered: &str) -> Option<CommandOutput> {
        self.responses
            .iter()
            .find(|(needle, _)| rendered.contains(needle.as_str()))
            .map(|(_, output)| output.clone())
    }
}

impl CommandRunner for FakeRunner {
    fn run(&self, command: &CommandSpec) -> io::Result<CommandOutput> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(command.clone());

        let rendered = command.to_string();
        if self.unavailable.iter().any(|n| rendered.contains(n.as_str())) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                "No such file or directory (os error 2)",
            ));
        }

        let response = self.response_for(&rendered);
        if let Some(output) = &response {
            if !output.success() {
                return Ok(output.clone());
            }
        }

        let args = command.get_args();
        if args.iter().any(|a| a == "-version") {
            return Ok(response.unwrap_or_else(|| CommandOutput {
                code: Some(0),
                stdout: String::new(),
                stderr: JAVA_VERSION_BANNER.to_string(),
            }));
        }
        if args.iter().any(|a| a == "-o") {
            if let Err(output) = emulate_tool(args) {
                return Ok(output);
            }
        }
        Ok(response.unwrap_or_else(CommandOutput::ok))
    }
}

/// Write what the tool would for `args`, or the output of a failed run.
fn emulate_tool(args: &[std::ffi::OsString]) -> std::result::Result<(), CommandOutput> {
    let output_dir = args
        .iter()
        .position(|a| a == "-o")
        .and_then(|i| args.get(i + 1))
        .map(PathBuf::from)
        .ok_or_else(|| CommandOutput::failed(1, "error(1): missing output directory\n"))?;
    let grammar = args
        .last()
        .map(PathBuf::from)
        .ok_or_else(|| CommandOutput::failed(1, "error(1): missing grammar\n"))?;
    let language = args
        .iter()
        .filter_map(|a| a.to_str())
        .find_map(|a| a.strip_prefix("-Dlanguage="))
        .unwrap_or("Java");

    let source = fs::read_to_string(&grammar).map_err(|_| {
        CommandOutput::failed(
            1,
            format!("error(7): cannot find or open file {}\n", grammar.display()),
        )
    })?;
    let stem = grammar
        .file_stem()
        .and_then(OsStr::to_str)
        .unwrap_or("Grammar");
    let extension = extension_for(language);

    let write = |kind: &str| {
        let path = output_dir.join(format!("{stem}{kind}.{extension}"));
        let body = format!("// {kind} for {stem} ({language})\n{source}");
        fs::create_dir_all(&output_dir)
            .and_then(|()| fs::write(&path, body))
            .map_err(|e| CommandOutput::failed(1, format!("error(4): {e}\n")))
    };
    write("Lexer")?;
    write("Parser")?;
    Ok(())
}

fn extension_for(language: &str) -> String {
    match language {
        "Java" => "java".to_string(),
        "Python2" | "Python3" => "py".to_string(),
        "JavaScript" => "js".to_string(),
        "CSharp" => "cs".to_string(),
        other => other.to_lowercase(),
    }
}

#[derive(Debug, Clone)]
enum Behavior {
    Serve {
        body: Vec<u8>,
        content_length: Option<u64>,
    },
    Fail(String),
    BreakAfter(Vec<u8>),
}

/// A [`Fetcher`] that serves canned bodies.
#[derive(Debug)]
pub struct FakeFetcher {
    behavior: Behavior,
    urls: Mutex<Vec<String>>,
}

impl FakeFetcher {
    fn with(behavior: Behavior) -> Self {
        Self {
            behavior,
            urls: Mutex::new(Vec::new()),
        }
    }

    /// Serve `body` with a matching Content-Length.
    pub fn serving(body: Vec<u8>) -> Self {
        let content_length = Some(body.len() as u64);
        Self::with(Behavior::Serve {
            body,
            content_length,
        })
    }

    /// Announce `declared_len` bytes but serve only `body`.
    pub fn truncated(body: Vec<u8>, declared_len: u64) -> Self {
        Self::with(Behavior::Serve {
            body,
            content_length: Some(declared_len),
        })
    }

    /// Refuse every request with `reason`.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self::with(Behavior::Fail(reason.into()))
    }

    /// Serve `body`, then fail the read with a connection reset.
    pub fn breaking_after(body: Vec<u8>) -> Self {
        Self::with(Behavior::BreakAfter(body))
    }

    /// URLs requested so far.
    pub fn urls(&self) -> Vec<String> {
        self.urls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Fetcher for FakeFetcher {
    fn fetch(&self, url: &str) -> Result<Download> {
        self.urls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(url.to_string());

        match &self.behavior {
            Behavior::Serve {
                body,
                content_length,
            } => Ok(Download {
                reader: Box::new(Cursor::new(body.clone())),
                content_length: *content_length,
            }),
            Behavior::Fail(reason) => Err(Error::Download {
                url: url.to_string(),
                reason: reason.clone(),
            }),
            Behavior::BreakAfter(body) => Ok(Download {
                reader: Box::new(Cursor::new(body.clone()).chain(BrokenReader)),
                content_length: None,
            }),
        }
    }
}

struct BrokenReader;

impl Read for BrokenReader {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(
            io::ErrorKind::ConnectionReset,
            "connection reset by peer",
        ))
    }
}

/// A plugin that logs every hook call as `before:<stage>`,
/// `after:<stage>` or `failed:<stage>`.
#[derive(Debug, Clone, Default)]
pub struct RecordingPlugin {
    events: Arc<Mutex<Vec<String>>>,
}

impl RecordingPlugin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn push(&self, event: String) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

impl Plugin for RecordingPlugin {
    fn name(&self) -> &'static str {
        "recording"
    }

    fn on_before_stage(&self, stage: &str, _ctx: &mut RunContext<'_>) -> Result<()> {
        self.push(format!("before:{stage}"));
        Ok(())
    }

    fn on_after_stage(&self, stage: &str, _ctx: &mut RunContext<'_>) -> Result<()> {
        self.push(format!("after:{stage}"));
        Ok(())
    }

    fn on_stage_failed(&self, stage: &str, _error: &Error) {
        self.push(format!("failed:{stage}"));
    }
}
