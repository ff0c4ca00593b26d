//! Atomic file replacement.
//!
//! Content goes to a temporary file in the target's directory, is synced, and
//! is then renamed over the target. The original is never opened for writing.

use crate::document::Document;
use crate::error::{Result, SpliceError};
use std::fs;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use tempfile::{NamedTempFile, PersistError};

/// Replace `path` with the content of `document`.
///
/// # Errors
/// * `WriteFailure` - the temporary file could not be created, written,
///   synced, or renamed. The original file is untouched and the temporary
///   file is removed.
pub fn persist(document: &Document, path: &Path) -> Result<()> {
    write_atomic(document, path, |temp, target| temp.persist(target).map(drop))
}

/// Write `document` next to `path` and hand the temp file to `promote`.
///
/// `promote` performs the final rename. It is a parameter so tests can fail
/// it after the temporary file is fully written.
pub(crate) fn write_atomic<F>(document: &Document, path: &Path, promote: F) -> Result<()>
where
    F: FnOnce(NamedTempFile, &Path) -> std::result::Result<(), PersistError>,
{
    let write_failure = |source| SpliceError::WriteFailure {
        path: path.to_path_buf(),
        source,
    };

    let target = resolve_target(path).map_err(write_failure)?;
    let dir = parent_dir(&target);

    let mut temp = tempfile::Builder::new()
        .prefix(".linesplice-")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(write_failure)?;
    log::debug!("Writing {} bytes to {}", document.len_bytes(), temp.path().display());

    document
        .write_to(BufWriter::new(temp.as_file_mut()))
        .map_err(write_failure)?;

    // NamedTempFile is created 0600; keep whatever mode the original had.
    if let Ok(metadata) = fs::metadata(&target) {
        temp.as_file()
            .set_permissions(metadata.permissions())
            .map_err(write_failure)?;
    }

    temp.as_file().sync_all().map_err(write_failure)?;

    if let Err(PersistError { error, file }) = promote(temp, &target) {
        let temp_path = file.path().to_path_buf();
        if let Err(cleanup_err) = file.close() {
            log::warn!(
                "Failed to remove temporary file {}: {}",
                temp_path.display(),
                cleanup_err
            );
        }
        return Err(write_failure(error));
    }

    // The rename is only durable once the directory entry is on disk.
    if let Err(err) = sync_dir(dir) {
        log::warn!("Failed to sync directory {}: {}", dir.display(), err);
    }

    log::debug!("Replaced {}", target.display());
    Ok(())
}

/// Follow a symlink so the link itself survives the rename.
///
/// A link that cannot be resolved is an error; renaming over the link path
/// would silently replace the link with a regular file.
fn resolve_target(path: &Path) -> io::Result<PathBuf> {
    let is_symlink = fs::symlink_metadata(path)
        .map(|m| m.file_type().is_symlink())
        .unwrap_or(false);
    if is_symlink {
        fs::canonicalize(path)
    } else {
        Ok(path.to_path_buf())
    }
}

#[cfg(unix)]
fn sync_dir(dir: &Path) -> io::Result<()> {
    fs::File::open(dir)?.sync_all()
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> io::Result<()> {
    Ok(())
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}
