// =========================================================================== //
//                          STANDARD LIBRARY DEPENDENCIES                      //
// =========================================================================== //

use std::env;
use std::path::{Path, PathBuf};

// =========================================================================== //
//                              INTERNAL IMPORTS                               //
// =========================================================================== //

use crate::libs::utilities::path_helpers::expand_path;
use crate::log_debug;

/// Directory name used under the user's cache dir when no runner cache exists.
const FALLBACK_CACHE_DIR_NAME: &str = "setup-dcm";

/// # PathResolver
///
/// Resolves the two directories the pipeline writes to:
/// 1. The **tool cache root** that holds one entry per `(tool, version, arch)`.
/// 2. The **staging directory** downloads and extraction happen in.
///
/// Resolution order for each:
/// 1. Explicit value (flag or `RUNNER_TOOL_CACHE` / `RUNNER_TEMP` via clap).
/// 2. A platform default (`dirs::cache_dir()`, `env::temp_dir()`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathResolver {
    cache_root: PathBuf,
    temp_root: PathBuf,
}

impl PathResolver {
    pub fn new(cache_dir: Option<&str>, temp_dir: Option<&str>) -> Self {
        let cache_root = Self::resolve_cache_root(cache_dir);
        let temp_root = Self::resolve_temp_root(temp_dir);

        log_debug!("[Paths] Tool cache root: {}", cache_root.display());
        log_debug!("[Paths] Staging root: {}", temp_root.display());

        PathResolver {
            cache_root,
            temp_root,
        }
    }

    pub fn cache_root(&self) -> &Path {
        &self.cache_root
    }

    pub fn temp_root(&self) -> &Path {
        &self.temp_root
    }

    fn resolve_cache_root(explicit: Option<&str>) -> PathBuf {
        if let Some(dir) = non_empty(explicit) {
            return expand_path(dir);
        }
        dirs::cache_dir()
            .unwrap_or_else(env::temp_dir)
            .join(FALLBACK_CACHE_DIR_NAME)
    }

    fn resolve_temp_root(explicit: Option<&str>) -> PathBuf {
        match non_empty(explicit) {
            Some(dir) => expand_path(dir),
            None => env::temp_dir(),
        }
    }
}

// Runners export unset inputs as empty strings.
fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
