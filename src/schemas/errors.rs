// Error taxonomy. Every variant is terminal for the run: `main` prints it
// together with its chain of causes as one failure message.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failures talking to the release-listing API.
#[derive(Debug, Error)]
pub enum ReleaseSourceError {
    #[error("GitHub API request to {url} failed with HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("GitHub API request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("GitHub API returned an unexpected response: {0}")]
    InvalidResponse(String),
}

/// The version to install could not be determined.
#[derive(Debug, Error)]
pub enum ResolutionError {
    #[error("Failed to find the repository root.")]
    RootNotFound,

    #[error(
        "Failed to automatically detect the version. Global configuration file {} does not exist.",
        .0.display()
    )]
    ConfigMissing(PathBuf),

    #[error("Failed to read the global configuration file {}", .path.display())]
    ConfigUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(
        "Failed to automatically detect the version. Unable to parse the version range from the configuration file: {0}"
    )]
    RangeUnparsable(String),

    #[error(
        "Failed to automatically detect the version. A matching {tool} version could not be found for range '{range}'."
    )]
    NoMatch { tool: String, range: String },

    #[error("Failed to fetch the latest release: {0}")]
    NoRelease(String),

    #[error(transparent)]
    ReleaseSource(#[from] ReleaseSourceError),
}

/// The artifact could not be obtained or is unusable.
#[derive(Debug, Error)]
pub enum AcquisitionError {
    #[error("Version '{0}' cannot be used as a tool cache directory name")]
    UnsafeVersion(String),

    #[error("Failed to download {url}: {message}")]
    Download { url: String, message: String },

    #[error("Failed to extract {}: {message}", .archive.display())]
    Extract { archive: PathBuf, message: String },

    #[error("Failed to populate the tool cache at {}", .path.display())]
    Cache {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to prepare a staging directory")]
    Staging(#[source] io::Error),
}

/// Placing the executable or exposing it on the search path failed.
#[derive(Debug, Error)]
pub enum InstallError {
    #[error("Expected executable {} is missing", .0.display())]
    MissingExecutable(PathBuf),

    #[error("Failed to move {} to {}", .from.display(), .to.display())]
    Move {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to make {} executable", .path.display())]
    Permissions {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to add {} to the search path", .path.display())]
    SearchPath {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// The installed tool does not run.
#[derive(Debug, Error)]
pub enum VerificationError {
    #[error("Failed to run {}", .executable.display())]
    Spawn {
        executable: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} --version exited with {status}", .executable.display())]
    ExitStatus { executable: PathBuf, status: String },
}

/// Everything that can end a run.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("Input required and not supplied: {0}")]
    MissingInput(&'static str),

    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    Acquisition(#[from] AcquisitionError),

    #[error(transparent)]
    Install(#[from] InstallError),

    #[error(transparent)]
    Verification(#[from] VerificationError),

    #[error("Failed to set output {name}")]
    Output {
        name: String,
        #[source]
        source: io::Error,
    },
}
