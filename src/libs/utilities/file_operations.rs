// Filesystem helpers for populating cache entries.

// The 'colored' crate helps us make our console output look pretty and readable.
use colored::Colorize;
// Our custom logging macro for detailed, debug-only output.
use crate::log_debug;
// For file system operations: creating directories, copying and removing files.
use std::fs;
// `std::io` for the error type every helper here returns.
use std::io;
// For working with file paths in an OS-agnostic way.
use std::path::Path;
// 'walkdir' walks a directory tree recursively, one entry at a time.
use walkdir::WalkDir;

/// Recursively copies the contents of `from` into `to` (created if needed),
/// keeping file permissions. Symlinks are copied as the files they point to.
///
/// # Arguments
/// * `from`: The tree to copy, e.g. a freshly extracted archive.
/// * `to`: The destination directory, e.g. a cache entry.
pub fn copy_dir_contents(from: &Path, to: &Path) -> io::Result<()> {
    log_debug!(
        "[Files] Copying {} into {}",
        from.to_string_lossy().yellow(),
        to.to_string_lossy().cyan()
    );
    fs::create_dir_all(to)?;

    // `min_depth(1)` skips `from` itself; only its contents are copied.
    for entry in WalkDir::new(from).min_depth(1).follow_links(true) {
        // A walk error (e.g. permission denied) aborts the whole copy.
        let entry = entry.map_err(io::Error::other)?;
        // Path of the entry below `from`, replayed below `to`.
        let relative = entry
            .path()
            .strip_prefix(from)
            .map_err(io::Error::other)?;
        let target = to.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            // `fs::copy` carries the permission bits along.
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

/// Removes a file or directory tree if it exists. A missing path is not an
/// error.
pub fn remove_if_exists(path: &Path) -> io::Result<()> {
    // `symlink_metadata` so a symlink is removed, not the tree it points to.
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => {
            log_debug!("[Files] Removing directory {}", path.to_string_lossy().red());
            fs::remove_dir_all(path)
        }
        Ok(_) => fs::remove_file(path),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn copies_nested_tree() {
        let src = TempDir::new().unwrap();
        fs::create_dir_all(src.path().join("lib/nested")).unwrap();
        fs::write(src.path().join("dcm"), b"bin").unwrap();
        fs::write(src.path().join("lib/nested/data.txt"), b"data").unwrap();
        let dest = TempDir::new().unwrap();
        let target = dest.path().join("entry");

        copy_dir_contents(src.path(), &target).unwrap();

        assert_eq!(fs::read(target.join("dcm")).unwrap(), b"bin");
        assert_eq!(fs::read(target.join("lib/nested/data.txt")).unwrap(), b"data");
    }

    #[test]
    fn remove_if_exists_handles_all_cases() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("marker");
        let tree = dir.path().join("tree");
        fs::write(&file, b"").unwrap();
        fs::create_dir_all(tree.join("inner")).unwrap();

        remove_if_exists(&file).unwrap();
        remove_if_exists(&tree).unwrap();
        remove_if_exists(&dir.path().join("never-existed")).unwrap();

        assert!(!file.exists());
        assert!(!tree.exists());
    }
}
