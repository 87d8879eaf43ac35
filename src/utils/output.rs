//! Output writes that leave unchanged files alone.
//!
//! Skipping identical writes keeps mtimes stable, so browser caches and
//! anything watching the output directory only see real changes.

use std::fs;
use std::io;
use std::path::Path;

/// Write `bytes` to `path` unless the file already holds exactly them.
///
/// Parent directories are created. Returns whether the file was written.
pub fn write_if_changed(path: &Path, bytes: &[u8]) -> io::Result<bool> {
    if is_unchanged(path, bytes) {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, bytes)?;
    Ok(true)
}

fn is_unchanged(path: &Path, bytes: &[u8]) -> bool {
    // Size check first, most changed files differ in length
    match fs::metadata(path) {
        Ok(meta) if meta.is_file() && meta.len() == bytes.len() as u64 => {}
        _ => return false,
    }
    fs::read(path).is_ok_and(|existing| existing == bytes)
}
