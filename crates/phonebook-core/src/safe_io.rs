//! Atomic file replacement.
//!
//! [`atomic_write()`] writes to a sibling temporary file, fsyncs it and
//! renames it over the target, so a crash mid-write leaves either the old
//! contents or the new ones, never a truncated file.

use std::fs::{self, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Temporary path used while replacing `path`: `<name>.tmp` in the same
/// directory, so the final rename never crosses filesystems.
pub fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Atomically replace the contents of `path`.
///
/// # Errors
///
/// Returns an error if the temporary file cannot be created, written,
/// synced or renamed. On failure the temporary file is removed and the
/// target is left untouched.
pub fn atomic_write(path: &Path, contents: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    let tmp_path = tmp_path_for(path);
    let result = write_and_rename(&tmp_path, path, contents);
    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    result
}

fn write_and_rename(tmp_path: &Path, path: &Path, contents: &[u8]) -> io::Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(tmp_path)?;

    {
        let mut writer = BufWriter::new(&mut file);
        writer.write_all(contents)?;
        writer.flush()?;
    }

    // Sync to disk before rename
    file.sync_all()?;
    fs::rename(tmp_path, path)
}
