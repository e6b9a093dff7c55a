// Components of the setup pipeline. Each file owns one step and talks to
// the outside world through a trait where a test needs to replace it.

// Builds the release download URL for a platform.
pub mod artifact_locator;
// Lists releases of the upstream repository.
pub mod release_source;
// Finds the enclosing repository for `auto`.
pub mod repo_root;
// Step outputs and search-path updates for the host runner.
pub mod runner;
// Versioned on-disk cache in front of download and extraction.
pub mod tool_cache;
pub mod utilities;
// Turns a version request into a concrete release tag.
pub mod version_resolver;
