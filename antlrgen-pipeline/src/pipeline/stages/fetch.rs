//! Fetch stage - downloads the tool archive.

use std::{
    io::{self, Write},
    path::Path,
};

use antlrgen_core::ensure_dir;
use tempfile::NamedTempFile;

use crate::{
    Download, Error, Result,
    pipeline::{RunContext, Stage},
};

/// Stage that downloads the pinned tool archive into the work directory.
///
/// The archive is fetched on every run and overwrites any previous copy.
/// It is only moved into place once the whole body has arrived, so a
/// failed transfer never leaves a partial archive behind.
pub struct FetchStage;

impl Stage for FetchStage {
    fn name(&self) -> &'static str {
        "fetch"
    }

    fn description(&self) -> &'static str {
        "Download the tool archive"
    }

    fn run(&self, ctx: &mut RunContext<'_>) -> Result<()> {
        let config = ctx.config;
        let url = config.tool_url();
        let archive = config.tool_archive();

        let work_dir = config.work_dir();
        ensure_dir(&work_dir).map_err(Error::io("failed to create work directory", &work_dir))?;

        tracing::debug!(%url, archive = %archive.display(), "downloading");
        let download = ctx.fetcher().fetch(&url)?;
        let bytes = write_archive(&url, download, &archive)?;
        tracing::debug!(bytes, "download complete");

        ctx.archive = Some(archive);
        Ok(())
    }
}

/// Stream `download` into `dest`, replacing it only on success.
///
/// Returns the number of bytes written.
///
/// # Errors
///
/// Fails if the body is empty, shorter than its announced length, or the
/// transfer breaks off. `dest` is left untouched in every case.
pub fn write_archive(url: &str, mut download: Download, dest: &Path) -> Result<u64> {
    let dir = dest.parent().unwrap_or_else(|| Path::new("."));
    let download_failed = |reason: String| Error::Download {
        url: url.to_string(),
        reason,
    };

    let mut temp =
        NamedTempFile::new_in(dir).map_err(Error::io("failed to create temporary file in", dir))?;
    let written = io::copy(&mut download.reader, &mut temp)
        .map_err(|e| download_failed(format!("transfer interrupted: {e}")))?;

    if written == 0 {
        return Err(download_failed("server sent an empty body".to_string()));
    }
    if let Some(expected) = download.content_length {
        if written < expected {
            return Err(download_failed(format!(
                "received {written} of {expected} bytes"
            )));
        }
    }

    temp.flush().map_err(Error::io("failed to write", dest))?;
    temp.as_file()
        .sync_all()
        .map_err(Error::io("failed to write", dest))?;
    temp.persist(dest)
        .map_err(|e| Error::io("failed to move archive into place at", dest)(e.error))?;
    Ok(written)
}
