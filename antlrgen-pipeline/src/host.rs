//! Seams to the outside world: subprocesses and the network.

use std::{
    io::{self, Read},
    process::{Command, Stdio},
};

use antlrgen_core::{CommandOutput, CommandSpec};

use crate::{Error, Result};

/// Runs a structured command to completion.
///
/// Implementations must not route the command through a shell.
pub trait CommandRunner {
    fn run(&self, command: &CommandSpec) -> io::Result<CommandOutput>;
}

/// Runs commands as real child processes, capturing stdout and stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, command: &CommandSpec) -> io::Result<CommandOutput> {
        Command::new(command.program())
            .args(command.get_args())
            .stdin(Stdio::null())
            .output()
            .map(CommandOutput::from)
    }
}

/// An open download body.
pub struct Download {
    pub reader: Box<dyn Read + Send>,
    /// The size the server announced, if any.
    pub content_length: Option<u64>,
}

impl std::fmt::Debug for Download {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Download")
            .field("content_length", &self.content_length)
            .finish_non_exhaustive()
    }
}

/// Opens a URL for reading.
pub trait Fetcher {
    fn fetch(&self, url: &str) -> Result<Download>;
}

/// HTTP(S) fetcher backed by a blocking `ureq` agent.
///
/// No timeout is configured; the transfer is bounded only by the
/// underlying socket behavior.
pub struct HttpFetcher {
    agent: ureq::Agent,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self {
            agent: ureq::AgentBuilder::new()
                .user_agent(concat!("antlrgen/", env!("CARGO_PKG_VERSION")))
                .build(),
        }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Download> {
        let response = match self.agent.get(url).call() {
            Ok(response) => response,
            Err(ureq::Error::Status(code, response)) => {
                return Err(Error::Download {
                    url: url.to_string(),
                    reason: format!("server answered {} {}", code, response.status_text()),
                });
            }
            Err(e) => {
                return Err(Error::Download {
                    url: url.to_string(),
                    reason: e.to_string(),
                });
            }
        };
        let content_length = response
            .header("Content-Length")
            .and_then(|v| v.trim().parse().ok());
        Ok(Download {
            reader: response.into_reader(),
            content_length,
        })
    }
}
