//! The antlrgen pipeline.
//!
//! Six stages run strictly in order against one immutable
//! [`Config`](antlrgen_manifest::Config):
//!
//! 1. `provision` - make sure a Java runtime is installed
//! 2. `fetch` - download the pinned ANTLR tool archive
//! 3. `stage` - create an empty staging directory
//! 4. `collect` - copy the grammar files into it
//! 5. `generate` - run the tool against the entry grammar
//! 6. `clean` - remove the staging directory
//!
//! The first failing stage stops the run. The staging directory is removed
//! on every exit path.
//!
//! The outside world is reached only through [`CommandRunner`] and
//! [`Fetcher`], so tests can swap in the fakes from `testing`.

mod error;
mod host;
pub mod pipeline;
mod plan;
mod staging_dir;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use error::{Error, Result};
pub use host::{CommandRunner, Download, Fetcher, HttpFetcher, SystemRunner};
pub use pipeline::{Pipeline, RunOutcome};
pub use plan::{Plan, generator_command, java_probe, provision_commands};
pub use staging_dir::{STAGING_MARKER, StagingDir, find_stale, remove_stale};
