// Archive extraction. Release artifacts are plain `.zip` files, so only
// the zip format is handled here.

// The 'colored' crate helps us make our console output look pretty and readable.
use colored::Colorize;
// Our custom logging macro for detailed, debug-only output.
use crate::log_debug;
// For creating the target directory and opening the archive.
use std::fs::{self, File};
// `Path` for borrowed paths, `PathBuf` for the directory we hand back.
use std::path::{Path, PathBuf};
// The reader side of the 'zip' crate, plus its error-carrying result type.
use zip::ZipArchive;
use zip::result::ZipResult;

/// Extracts the zip archive at `src` into a new `extracted` directory inside
/// `dest` and returns that directory.
///
/// Entries whose names would escape the target directory are rejected by
/// the `zip` crate; stored Unix permissions are restored where present.
///
/// # Arguments
/// * `src`: The downloaded archive.
/// * `dest`: The staging directory; `extracted` is created inside it.
pub fn extract_zip(src: &Path, dest: &Path) -> ZipResult<PathBuf> {
    log_debug!(
        "[Extract] Extracting archive {} into {}",
        src.to_string_lossy().yellow(),
        dest.to_string_lossy().cyan()
    );

    // A dedicated sub-directory keeps the archive file itself out of the tree
    // that ends up in the cache.
    let extracted_path = dest.join("extracted");
    fs::create_dir_all(&extracted_path)?;

    // Opening fails fast on anything that is not a zip (e.g. an HTML error page).
    let mut archive = ZipArchive::new(File::open(src)?)?;
    log_debug!("[Extract] Archive holds {} entries", archive.len());
    archive.extract(&extracted_path)?;

    log_debug!(
        "[Extract] Extracted into {}",
        extracted_path.to_string_lossy().green()
    );
    Ok(extracted_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;
    use zip::write::FileOptions;

    fn write_zip(path: &Path, entries: &[(&str, &[u8])]) {
        let mut writer = zip::ZipWriter::new(File::create(path).unwrap());
        for (name, contents) in entries {
            writer.start_file(*name, FileOptions::default()).unwrap();
            writer.write_all(contents).unwrap();
        }
        writer.finish().unwrap();
    }

    #[test]
    fn extracts_entries_into_extracted_dir() {
        let dir = TempDir::new().unwrap();
        let archive = dir.path().join("dcm.zip");
        write_zip(&archive, &[("dcm", b"binary"), ("LICENSE", b"MIT")]);

        let extracted = extract_zip(&archive, dir.path()).unwrap();

        assert_eq!(extracted, dir.path().join("extracted"));
        assert_eq!(fs::read(extracted.join("dcm")).unwrap(), b"binary");
        assert_eq!(fs::read(extracted.join("LICENSE")).unwrap(), b"MIT");
    }

    #[test]
    fn corrupt_archive_fails() {
        let dir = TempDir::new().unwrap();
        let archive = dir.path().join("broken.zip");
        fs::write(&archive, b"<html>not a zip</html>").unwrap();

        assert!(extract_zip(&archive, dir.path()).is_err());
    }
}
