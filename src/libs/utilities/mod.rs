// Small helpers shared by the pipeline steps.

// Streaming HTTP downloads.
pub mod assets;
// Moving the executable into place and setting its mode.
pub mod binary;
// Zip extraction.
pub mod compression;
pub mod file_operations;
// `~` and `$VAR` expansion for user supplied paths.
pub mod path_helpers;
pub mod platform;
// npm-style range parsing on top of `semver`.
pub mod version_range;
