//! Scoped ownership of the staging directory.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use antlrgen_core::{ensure_dir, remove_dir_if_exists};

use crate::{Error, Result};

/// Empty file written into every staging directory on creation.
///
/// Only a directory carrying it (or an empty one) is ever replaced, so a
/// work directory pointed at user files cannot lose them.
pub const STAGING_MARKER: &str = ".antlrgen-staging";

/// The staging directory for one run.
///
/// Dropping the guard removes the directory, so every exit path of the
/// pipeline (including errors and panics that unwind) cleans up. Use
/// [`StagingDir::close`] to remove it explicitly and observe failures.
#[derive(Debug)]
pub struct StagingDir {
    path: PathBuf,
    replaced_stale: bool,
    armed: bool,
}

impl StagingDir {
    /// Create an empty staging directory at `path`.
    ///
    /// A directory left behind by an interrupted run is discarded first.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::UnownedStaging`] if `path` holds files that no
    /// earlier run staged, and with [`Error::Io`] if it is not a directory.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let replaced_stale = remove_stale(&path)?;
        ensure_dir(&path).map_err(Error::io("failed to create staging directory", &path))?;
        fs::write(path.join(STAGING_MARKER), b"")
            .map_err(Error::io("failed to mark staging directory", &path))?;
        Ok(Self {
            path,
            replaced_stale,
            armed: true,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a stale directory from an earlier run was found and replaced.
    pub fn replaced_stale(&self) -> bool {
        self.replaced_stale
    }

    /// Remove the directory now, reporting any failure.
    pub fn close(mut self) -> Result<()> {
        self.armed = false;
        remove_dir_if_exists(&self.path)
            .map(|_| ())
            .map_err(Error::io("failed to remove staging directory", &self.path))
    }
}

impl Drop for StagingDir {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        match remove_dir_if_exists(&self.path) {
            Ok(_) => tracing::debug!(path = %self.path.display(), "removed staging directory"),
            // An error is already propagating; don't replace it.
            Err(e) => tracing::warn!(
                path = %self.path.display(),
                "failed to remove staging directory: {e}"
            ),
        }
    }
}

/// Whether a staging directory left by an earlier run exists at `path`.
///
/// # Errors
///
/// Fails if `path` exists but is not a directory antlrgen may replace.
pub fn find_stale(path: &Path) -> Result<bool> {
    let mut entries = match fs::read_dir(path) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(Error::io("failed to inspect staging directory", path)(e)),
    };
    let is_empty = entries.next().is_none();
    if is_empty || path.join(STAGING_MARKER).is_file() {
        Ok(true)
    } else {
        Err(Error::UnownedStaging {
            path: path.to_path_buf(),
        })
    }
}

/// Remove a staging directory left by an earlier run.
///
/// Returns `true` if one was removed.
pub fn remove_stale(path: &Path) -> Result<bool> {
    if !find_stale(path)? {
        return Ok(false);
    }
    tracing::warn!(
        path = %path.display(),
        "removing staging directory left by an earlier run"
    );
    remove_dir_if_exists(path)
        .map_err(Error::io("failed to remove stale staging directory", path))
}
