//! Clean operation - remove leftovers of earlier runs.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use antlrgen_manifest::{Settings, Workspace, staging_dir_for, work_dir_for};
use antlrgen_pipeline::{find_stale, remove_stale};
use eyre::{Result, WrapErr};

use crate::reports::CleanReport;

/// Options for the clean operation.
pub struct CleanOptions {
    /// Also remove the tool archive, and the work directory once empty.
    pub all: bool,
    /// Whether to preview without deleting.
    pub dry_run: bool,
}

/// Execute the clean operation.
///
/// A killed run can leave its staging directory behind; the next run
/// replaces it anyway, but this removes it right away. Only files antlrgen
/// wrote are touched, so a work directory shared with other files keeps
/// them.
pub fn clean(
    workspace: &Workspace,
    settings: &Settings,
    opts: CleanOptions,
) -> Result<CleanReport> {
    let staging = staging_dir_for(workspace, settings);
    let mut removed: Vec<PathBuf> = Vec::new();

    if find_stale(&staging).wrap_err("Failed to clean the staging directory")? {
        if !opts.dry_run {
            remove_stale(&staging).wrap_err("Failed to clean the staging directory")?;
        }
        removed.push(staging);
    }

    if opts.all {
        let work_dir = work_dir_for(workspace, settings);
        let archive = work_dir.join(settings.tool.version.archive_name());
        if archive.is_file() {
            if !opts.dry_run {
                fs::remove_file(&archive)
                    .wrap_err_with(|| format!("Failed to remove {}", archive.display()))?;
            }
            removed.push(archive);
        }

        if only_holds(&work_dir, &removed)? {
            if !opts.dry_run {
                fs::remove_dir(&work_dir)
                    .wrap_err_with(|| format!("Failed to remove {}", work_dir.display()))?;
            }
            removed.push(work_dir);
        }
    }

    Ok(CleanReport {
        dry_run: opts.dry_run,
        removed,
    })
}

/// Whether `dir` exists and holds nothing but `entries`.
fn only_holds(dir: &Path, entries: &[PathBuf]) -> Result<bool> {
    let listing = match fs::read_dir(dir) {
        Ok(listing) => listing,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e).wrap_err_with(|| format!("Failed to read {}", dir.display())),
    };
    for entry in listing {
        let path = entry
            .wrap_err_with(|| format!("Failed to read {}", dir.display()))?
            .path();
        if !entries.contains(&path) {
            return Ok(false);
        }
    }
    Ok(true)
}
