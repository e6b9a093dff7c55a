// Placement of the tool's executable: moving it into place and marking it
// executable.

// The 'colored' crate helps us make our console output look pretty and readable.
use colored::Colorize;
// Our custom logging macros for debug output and recoverable oddities.
use crate::{log_debug, log_warn};
// For file system operations: creating directories, renaming, copying.
use std::fs;
// `std::io` for the error type and `ErrorKind` matching below.
use std::io;
// For working with file paths in an OS-agnostic way.
use std::path::Path;
// Only compiled on Unix-like systems (macOS, Linux), where the executable
// bit is part of the file mode.
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// Moves a file from `from` to `to`, creating `to`'s parent directories.
///
/// `fs::rename` is tried first; when source and destination live on different
/// filesystems it falls back to copy-then-remove.
///
/// # Arguments
/// * `from`: The extracted executable, e.g. `<entry>/dcm`.
/// * `to`: Its final location, e.g. `<entry>/bin/dcm`.
pub fn move_and_rename_binary(from: &Path, to: &Path) -> io::Result<()> {
    log_debug!(
        "[Binary] Moving {} to {}",
        from.to_string_lossy().yellow(),
        to.to_string_lossy().cyan()
    );

    // Make sure the destination directory (e.g. `bin/`) exists.
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent)?;
    }

    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        // A rename cannot cross filesystems; copy the bytes and drop the source.
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            log_warn!(
                "[Binary] Cross-device move from {} to {}, copying instead: {}",
                from.to_string_lossy().yellow(),
                to.to_string_lossy().cyan(),
                e
            );
            fs::copy(from, to)?;
            fs::remove_file(from)?;
            Ok(())
        }
        Err(e) => Err(e),
    }
}

/// Sets mode 0o755 (rwxr-xr-x), the equivalent of `chmod 755`.
#[cfg(unix)]
pub fn make_executable(path: &Path) -> io::Result<()> {
    log_debug!(
        "[Binary] Making {} executable",
        path.to_string_lossy().green()
    );
    // Read the current permissions, then overwrite the mode bits.
    let mut perms = fs::metadata(path)?.permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms)
}

/// Windows has no executable bit; `.exe` files are runnable as they are.
#[cfg(not(unix))]
pub fn make_executable(_path: &Path) -> io::Result<()> {
    Ok(())
}
