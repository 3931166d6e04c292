//! Directory tree copy and move primitives.

use std::fs;
use std::io;
use std::path::Path;

use tracing::{debug, trace, warn};
use walkdir::WalkDir;

/// Recursively copy `src` to `dst`. `dst` must not exist yet.
///
/// Symlinks are followed, so the copy holds file contents rather than links.
pub fn copy_tree(src: &Path, dst: &Path) -> io::Result<()> {
    if !src.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("source is not a directory: {}", src.display()),
        ));
    }
    if dst.exists() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("target already exists: {}", dst.display()),
        ));
    }

    let mut files = 0usize;
    for entry in WalkDir::new(src).follow_links(true) {
        let entry = entry.map_err(io::Error::from)?;
        let rel = entry
            .path()
            .strip_prefix(src)
            .map_err(io::Error::other)?;
        let target = dst.join(rel);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            fs::copy(entry.path(), &target)?;
            files += 1;
        }
    }

    debug!(src = %src.display(), dst = %dst.display(), files, "Copied directory tree");
    Ok(())
}

/// Move `src` to `dst`. `dst` must not exist yet.
///
/// Tries a rename first and falls back to copy-then-remove when the rename
/// fails (typically across filesystems).
pub fn move_tree(src: &Path, dst: &Path) -> io::Result<()> {
    if dst.exists() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("target already exists: {}", dst.display()),
        ));
    }

    match fs::rename(src, dst) {
        Ok(()) => {
            trace!(src = %src.display(), dst = %dst.display(), "Renamed directory");
            Ok(())
        }
        Err(rename_err) => {
            if !src.exists() {
                return Err(rename_err);
            }
            debug!(error = %rename_err, "Rename failed, falling back to copy");
            if let Err(copy_err) = copy_tree(src, dst) {
                remove_partial(dst);
                return Err(copy_err);
            }
            fs::remove_dir_all(src)
        }
    }
}

/// Best-effort removal of a half-written target.
pub fn remove_partial(path: &Path) {
    if path.exists() {
        if let Err(e) = fs::remove_dir_all(path) {
            warn!(path = %path.display(), error = %e, "Failed to clean up partial directory");
        }
    }
}
