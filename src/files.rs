//! Filesystem helpers shared by the cache, image, and render stages.
//!
//! Absence is a normal state for most of what the generator reads (no cache
//! entry yet, no custom stylesheet), so reads report it as `Ok(None)` instead
//! of an error. Any other I/O failure propagates.

use std::fs;
use std::io;
use std::path::Path;

pub fn ensure_dir(path: &Path) -> io::Result<()> {
    fs::create_dir_all(path)
}

/// Read a UTF-8 file, returning `Ok(None)` when it does not exist.
pub fn read_text(path: &Path) -> io::Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

/// Write a UTF-8 file, creating parent directories as needed.
pub fn write_text(path: &Path, content: &str) -> io::Result<()> {
    write_bytes(path, content.as_bytes())
}

pub fn write_bytes(path: &Path, content: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    fs::write(path, content)
}

/// Copy `src` to `dst` verbatim if `src` exists. Returns whether a copy happened.
pub fn copy_if_present(src: &Path, dst: &Path) -> io::Result<bool> {
    if !src.is_file() {
        return Ok(false);
    }
    if let Some(parent) = dst.parent() {
        ensure_dir(parent)?;
    }
    fs::copy(src, dst)?;
    Ok(true)
}
