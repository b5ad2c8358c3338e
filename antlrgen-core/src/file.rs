use std::{fs, io, path::Path};

/// Create a directory and all of its parents; a no-op if it already exists.
pub fn ensure_dir(path: &Path) -> io::Result<()> {
    fs::create_dir_all(path)
}

/// Remove a directory tree if it exists.
///
/// Returns `true` if something was removed.
pub fn remove_dir_if_exists(path: &Path) -> io::Result<bool> {
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

/// Copy a regular file byte-for-byte, returning the number of bytes copied.
///
/// Fails with [`io::ErrorKind::NotFound`] if `src` is missing or is not a
/// regular file.
pub fn copy_file(src: &Path, dst: &Path) -> io::Result<u64> {
    let metadata = fs::metadata(src)?;
    if !metadata.is_file() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("{} is not a regular file", src.display()),
        ));
    }
    fs::copy(src, dst)
}
