//! Workspace root resolution.

use std::{
    ffi::OsString,
    fs,
    path::{Path, PathBuf},
};

use crate::{Error, Result};

/// Environment variable the CI platform uses to publish the checkout directory.
pub const WORKSPACE_ENV: &str = "GITHUB_WORKSPACE";

/// The checked-out project every input path is relative to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    /// Use `root` as the workspace, which must be an existing directory.
    ///
    /// The path is canonicalized so derived paths are absolute.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let canonical = fs::canonicalize(&root).map_err(|e| {
            Box::new(Error::InvalidWorkspace {
                path: root.clone(),
                source: Some(e),
            })
        })?;
        if !canonical.is_dir() {
            return Err(Box::new(Error::InvalidWorkspace {
                path: root,
                source: None,
            }));
        }
        Ok(Self { root: canonical })
    }

    /// Resolve the workspace from an explicit path, falling back to the
    /// value of [`WORKSPACE_ENV`].
    pub fn locate(explicit: Option<&Path>, env_value: Option<OsString>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::new(path);
        }
        match env_value {
            Some(value) if !value.is_empty() => Self::new(PathBuf::from(value)),
            _ => Err(Box::new(Error::MissingWorkspace { var: WORKSPACE_ENV })),
        }
    }

    /// Like [`Workspace::locate`], reading the process environment.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        Self::locate(explicit, std::env::var_os(WORKSPACE_ENV))
    }

    /// The absolute workspace root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a workspace-relative path.
    pub fn join(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.root.join(relative)
    }
}
