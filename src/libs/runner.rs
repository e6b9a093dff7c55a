//! Host runner glue: step outputs and search-path additions.
//!
//! The runner reads outputs from the file named by `GITHUB_OUTPUT` and
//! prepends every directory listed in the file named by `GITHUB_PATH` to
//! `PATH` for later steps. Processes spawned by this run (the smoke test)
//! receive the updated search path through [`Runner::search_path`].

use crate::{log_debug, log_info};
use colored::Colorize;
use std::env;
use std::ffi::OsString;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Primitives the setup pipeline needs from its host.
pub trait Runner {
    /// Publishes a named step output.
    fn set_output(&mut self, name: &str, value: &str) -> io::Result<()>;

    /// Prepends `dir` to the executable search path.
    fn add_path(&mut self, dir: &Path) -> io::Result<()>;

    /// The search path including every directory added so far.
    fn search_path(&self) -> OsString;
}

/// Runner backed by the `GITHUB_OUTPUT` / `GITHUB_PATH` command files.
#[derive(Debug)]
pub struct ActionsRunner {
    output_file: Option<PathBuf>,
    path_file: Option<PathBuf>,
    added: Vec<PathBuf>,
    base_path: OsString,
}

impl ActionsRunner {
    pub fn new(output_file: Option<PathBuf>, path_file: Option<PathBuf>, base_path: OsString) -> Self {
        ActionsRunner {
            output_file,
            path_file,
            added: Vec::new(),
            base_path,
        }
    }

    pub fn from_env() -> Self {
        let file_var = |name: &str| {
            env::var_os(name)
                .filter(|value| !value.is_empty())
                .map(PathBuf::from)
        };
        Self::new(
            file_var("GITHUB_OUTPUT"),
            file_var("GITHUB_PATH"),
            env::var_os("PATH").unwrap_or_default(),
        )
    }

    /// Directories added during this run, most recent first.
    #[cfg(test)]
    pub fn added_paths(&self) -> impl Iterator<Item = &Path> {
        self.added.iter().rev().map(PathBuf::as_path)
    }
}

impl Runner for ActionsRunner {
    fn set_output(&mut self, name: &str, value: &str) -> io::Result<()> {
        match &self.output_file {
            Some(file) => {
                log_debug!("[Runner] Writing output {} to {}", name, file.display());
                append_line(file, &format_output(name, value))
            }
            None => {
                log_info!("[Runner] Output {}={}", name, value);
                Ok(())
            }
        }
    }

    fn add_path(&mut self, dir: &Path) -> io::Result<()> {
        if let Some(file) = &self.path_file {
            append_line(file, &format!("{}\n", dir.display()))?;
        }
        log_info!("Added {} to the search path.", dir.to_string_lossy().green());
        self.added.push(dir.to_path_buf());
        Ok(())
    }

    fn search_path(&self) -> OsString {
        let added = self.added.iter().rev().cloned();
        let existing = env::split_paths(&self.base_path).filter(|p| !p.as_os_str().is_empty());
        // Fails only for a directory containing the path separator.
        env::join_paths(added.chain(existing)).unwrap_or_else(|_| self.base_path.clone())
    }
}

/// `name=value`, or the delimiter form when the value spans lines.
fn format_output(name: &str, value: &str) -> String {
    if value.contains('\n') || value.contains('\r') {
        let delimiter = format!("ghadelimiter_{}", std::process::id());
        format!("{name}<<{delimiter}\n{value}\n{delimiter}\n")
    } else {
        format!("{name}={value}\n")
    }
}

fn append_line(file: &Path, line: &str) -> io::Result<()> {
    let mut handle = OpenOptions::new().create(true).append(true).open(file)?;
    handle.write_all(line.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn outputs_are_appended_to_the_output_file() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("output");
        fs::write(&output, "existing=1\n").unwrap();
        let mut runner = ActionsRunner::new(Some(output.clone()), None, OsString::new());

        runner.set_output("dcm-version", "1.21.0").unwrap();

        assert_eq!(fs::read_to_string(&output).unwrap(), "existing=1\ndcm-version=1.21.0\n");
    }

    #[test]
    fn multi_line_outputs_use_a_delimiter() {
        let formatted = format_output("notes", "a\nb");
        assert!(formatted.starts_with("notes<<ghadelimiter_"));
        assert!(formatted.contains("\na\nb\n"));
    }

    #[test]
    fn added_paths_go_first_and_to_the_path_file() {
        let dir = TempDir::new().unwrap();
        let path_file = dir.path().join("path");
        let base = env::join_paths([PathBuf::from("/usr/bin")]).unwrap();
        let mut runner = ActionsRunner::new(None, Some(path_file.clone()), base);
        let bin = dir.path().join("dcm/1.21.0/x64/bin");

        runner.add_path(&bin).unwrap();

        assert_eq!(
            fs::read_to_string(&path_file).unwrap(),
            format!("{}\n", bin.display())
        );
        let entries: Vec<PathBuf> = env::split_paths(&runner.search_path()).collect();
        assert_eq!(entries, vec![bin.clone(), PathBuf::from("/usr/bin")]);
        assert_eq!(runner.added_paths().collect::<Vec<_>>(), vec![bin.as_path()]);
    }

    #[test]
    fn works_without_command_files() {
        let mut runner = ActionsRunner::new(None, None, OsString::new());
        runner.set_output("dcm-version", "1.0.0").unwrap();
        runner.add_path(Path::new("/opt/dcm/bin")).unwrap();
        assert_eq!(
            env::split_paths(&runner.search_path()).next(),
            Some(PathBuf::from("/opt/dcm/bin"))
        );
    }
}
