// This module places a tool extracted from a GitHub release archive into its
// final layout, exposes it on the search path and checks that it runs.
//
// Layout after installation:
// - non-Windows: `<entry>/bin/<tool>`, mode 755, `<entry>/bin` on the path
// - Windows:     `<entry>/<tool>.exe`, `<entry>` on the path

// The runner receives the directory to put on the search path.
use crate::libs::runner::Runner;
// Moving the extracted executable into `bin/` and setting its mode.
use crate::libs::utilities::binary::{make_executable, move_and_rename_binary};
// Typed failures for the two halves of this module.
use crate::schemas::errors::{InstallError, VerificationError};
// Which layout to produce depends on the platform.
use crate::schemas::platform::Platform;
// Our custom logging macros.
use crate::{log_debug, log_info};
// The 'colored' crate helps us make our console output look pretty and readable.
use colored::Colorize;
// The search path handed to the smoke test is an OS string, not UTF-8.
use std::ffi::OsString;
// For working with file paths in an OS-agnostic way.
use std::path::{Path, PathBuf};
// To run the installed tool once (`<tool> --version`).
use std::process::Command;

/// Where the tool ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledLayout {
    /// The directory added to the search path.
    pub bin_dir: PathBuf,
    /// The invocable executable inside `bin_dir`.
    pub executable: PathBuf,
}

/// Arranges the executable inside the cache entry `directory` and adds its
/// directory to the runner's search path.
///
/// # Arguments
/// * `directory`: The cache entry returned by the artifact cache.
/// * `platform`: The host platform; selects the layout.
/// * `tool_name`: Name of the executable, without `.exe`.
/// * `runner`: Receives the directory to expose.
pub fn install(
    directory: &Path,
    platform: Platform,
    tool_name: &str,
    runner: &mut dyn Runner,
) -> Result<InstalledLayout, InstallError> {
    // Put the executable where the platform expects it.
    let layout = match platform {
        Platform::Windows => place_windows(directory, tool_name)?,
        _ => place_unix(directory, tool_name)?,
    };

    // Exactly one directory goes on the search path.
    runner
        .add_path(&layout.bin_dir)
        .map_err(|source| InstallError::SearchPath {
            path: layout.bin_dir.clone(),
            source,
        })?;

    log_info!(
        "[Install] {} installed at {}",
        tool_name.bold(),
        layout.executable.to_string_lossy().green()
    );
    Ok(layout)
}

/// Windows: the archive already holds `<tool>.exe` at its root, which is
/// exposed as it is.
fn place_windows(directory: &Path, tool_name: &str) -> Result<InstalledLayout, InstallError> {
    let executable = directory.join(Platform::Windows.executable_name(tool_name));
    if !executable.is_file() {
        return Err(InstallError::MissingExecutable(executable));
    }
    Ok(InstalledLayout {
        bin_dir: directory.to_path_buf(),
        executable,
    })
}

/// Everything else: `<entry>/<tool>` moves to `<entry>/bin/<tool>` and gets
/// mode 755.
fn place_unix(directory: &Path, tool_name: &str) -> Result<InstalledLayout, InstallError> {
    // Where the archive puts the tool, and where it has to end up.
    let extracted = directory.join(tool_name);
    let bin_dir = directory.join("bin");
    let executable = bin_dir.join(tool_name);

    if extracted.is_file() {
        // Fresh entry: move the extracted executable into `bin/`.
        move_and_rename_binary(&extracted, &executable).map_err(|source| InstallError::Move {
            from: extracted.clone(),
            to: executable.clone(),
            source,
        })?;
    } else if executable.is_file() {
        // Entry reused from a previous run, already in its final place.
        log_debug!(
            "[Install] {} is already in place",
            executable.to_string_lossy().cyan()
        );
    } else {
        return Err(InstallError::MissingExecutable(extracted));
    }

    // Applied on reuse too; permissions may have been lost in between.
    make_executable(&executable).map_err(|source| InstallError::Permissions {
        path: executable.clone(),
        source,
    })?;

    Ok(InstalledLayout {
        bin_dir,
        executable,
    })
}

/// Runs `<executable> --version` with `search_path` as `PATH`. Its output
/// goes straight to the job log.
pub fn verify(executable: &Path, search_path: OsString) -> Result<(), VerificationError> {
    log_debug!(
        "[Install] Running {} --version",
        executable.to_string_lossy().blue()
    );

    // stdout and stderr are inherited, so the version lands in the job log.
    let status = Command::new(executable)
        .arg("--version")
        .env("PATH", search_path)
        .status()
        .map_err(|source| VerificationError::Spawn {
            executable: executable.to_path_buf(),
            source,
        })?;

    if status.success() {
        Ok(())
    } else {
        Err(VerificationError::ExitStatus {
            executable: executable.to_path_buf(),
            status: status.to_string(),
        })
    }
}
