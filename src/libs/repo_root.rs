// Discovery of the repository root `auto` looks for the configuration file in.

use crate::log_debug;
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// Finds the root directory of the checked-out repository.
pub trait RepoRootLocator {
    /// `None` when no repository root can be determined.
    fn repo_root(&self) -> Option<PathBuf>;
}

/// Asks git: `git rev-parse --show-toplevel` in `working_dir`
/// (the process's current directory when `None`).
#[derive(Debug, Default)]
pub struct GitRepoRoot {
    working_dir: Option<PathBuf>,
}

impl GitRepoRoot {
    pub fn new(working_dir: Option<PathBuf>) -> Self {
        GitRepoRoot { working_dir }
    }
}

impl RepoRootLocator for GitRepoRoot {
    fn repo_root(&self) -> Option<PathBuf> {
        let mut command = Command::new("git");
        command
            .args(["rev-parse", "--show-toplevel"])
            .stdin(Stdio::null())
            .stderr(Stdio::piped());
        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }

        let output = match command.output() {
            Ok(output) => output,
            Err(e) => {
                log_debug!("[Git] Failed to run git: {}", e);
                return None;
            }
        };

        if !output.status.success() {
            log_debug!(
                "[Git] git rev-parse exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
            return None;
        }

        let root = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if root.is_empty() {
            return None;
        }
        log_debug!("[Git] Repository root: {}", root);
        Some(PathBuf::from(root))
    }
}
