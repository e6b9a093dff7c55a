// Expansion of user supplied paths (`~/cache`, `$RUNNER_TEMP/dcm`).
// Our custom logging macro for detailed, debug-only output.
use crate::log_debug;
// The 'colored' crate helps us make our console output look pretty and readable.
use colored::Colorize;
// The expanded result is an owned path.
use std::path::PathBuf;

/// Expands a leading `~` and any `$VAR` / `${VAR}` references in `path`.
///
/// Unknown variables leave the input untouched rather than failing, so a
/// literal `$` in a directory name still works.
pub fn expand_path(path: &str) -> PathBuf {
    // `full` handles both `~` and environment variables in one pass.
    match shellexpand::full(path) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        // An unset variable: fall back to expanding only the home directory.
        Err(e) => {
            log_debug!(
                "[Paths] Could not expand '{}': {}. Using it verbatim.",
                path.yellow(),
                e
            );
            PathBuf::from(shellexpand::tilde(path).as_ref())
        }
    }
}
