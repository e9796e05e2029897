//! Atomic file replacement: write a uniquely named hidden temp file beside
//! the destination, sync it, then rename it over the destination.
//!
//! Either the complete file appears at the destination or nothing does. The
//! temp file is created owner-only with `O_EXCL` under a random name, so it
//! never truncates an existing file, and it is removed if anything fails.

use std::ffi::OsString;
use std::io::Write;
use std::path::Path;

use tempfile::{Builder, NamedTempFile};

use crate::error::FileError;

/// Atomically write `data` to `dest`.
pub(crate) fn write(dest: &Path, data: &[u8]) -> Result<(), FileError> {
    let name = dest
        .file_name()
        .ok_or_else(|| FileError::NotAFile(dest.to_path_buf()))?;
    let dir = match dest.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut prefix = OsString::from(".");
    prefix.push(name);
    prefix.push(".");

    let mut tmp: NamedTempFile = Builder::new()
        .prefix(&prefix)
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(|source| FileError::io(dest, source))?;

    tmp.write_all(data)
        .and_then(|()| tmp.as_file().sync_all())
        .map_err(|source| FileError::io(dest, source))?;

    // On failure the returned error owns the temp file and deletes it.
    tmp.persist(dest)
        .map_err(|e| FileError::io(dest, e.error))?;
    Ok(())
}
