//! Disk I/O helpers: directory bootstrap, whole-file read and atomic write.
//!
//! The rename-over approach is close to atomic on most platforms. On NTFS
//! (Windows) it's reliable; on FAT32 or network shares there are no hard
//! guarantees. If that matters to you, keep backups or use a real database.

use crate::error::{Error, Result};
use std::path::Path;

/// Create `path`'s parent directory (recursively) if it does not exist yet.
pub fn ensure_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() && !dir.exists() => {
            log::debug!("Creating directory {}...", dir.display());
            std::fs::create_dir_all(dir).map_err(|e| Error::Io(e.to_string()))
        }
        _ => Ok(()),
    }
}

/// Read the whole file at `path`.
pub fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    log::debug!("Reading {}...", path.display());
    std::fs::read(path).map_err(|e| Error::Io(e.to_string()))
}

/// Write `bytes` to `<path>.tmp` and then rename over `path`. This avoids
/// leaving a half-written file if the process crashes mid-write.
pub fn atomic_write(path: &Path, bytes: &[u8]) -> Result<()> {
    log::debug!("Writing {} ({} bytes)...", path.display(), bytes.len());
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("db");
    let tmp = path.with_extension(format!("{ext}.tmp"));
    std::fs::write(&tmp, bytes).map_err(|e| Error::Io(e.to_string()))?;
    std::fs::rename(&tmp, path).map_err(|e| Error::Io(e.to_string()))?;
    Ok(())
}

/// Write `bytes` to `path` only if nothing is there yet. Returns `true` when
/// the file was created.
pub fn write_if_missing(path: &Path, bytes: &[u8]) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    atomic_write(path, bytes)?;
    Ok(true)
}
