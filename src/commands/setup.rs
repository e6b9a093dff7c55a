// This file contains the primary logic of `setup-dcm`: it resolves the
// version, fetches (or reuses) the matching release artifact, installs it and
// checks that the installed tool runs.
//
// Steps run strictly in order and the first failure ends the run:
// 1. platform detection (done by the caller, passed in)
// 2. version resolution
// 3. download URL
// 4. cache lookup / download / extraction
// 5. `<tool>-version` output
// 6. installation and search-path update
// 7. smoke test

use crate::installers::github::{self, InstalledLayout};
use crate::libs::artifact_locator;
use crate::libs::release_source::ReleaseSource;
use crate::libs::repo_root::RepoRootLocator;
use crate::libs::runner::Runner;
use crate::libs::tool_cache::{ArtifactCache, ToolCache};
use crate::libs::utilities::assets::ArtifactFetcher;
use crate::libs::version_resolver::VersionResolver;
use crate::log_info;
use crate::schemas::errors::SetupError;
use crate::schemas::platform::PlatformArch;
use crate::schemas::setup_config::SetupConfig;
use crate::schemas::version::ReleaseTag;
use colored::Colorize;

/// External collaborators of one run.
pub struct Collaborators<'a> {
    pub releases: &'a dyn ReleaseSource,
    pub repo_root: &'a dyn RepoRootLocator,
    pub fetcher: &'a dyn ArtifactFetcher,
    pub runner: &'a mut dyn Runner,
}

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupOutcome {
    pub version: ReleaseTag,
    pub download_url: String,
    pub layout: InstalledLayout,
}

pub fn run(
    config: &SetupConfig,
    host: PlatformArch,
    collaborators: Collaborators<'_>,
) -> Result<SetupOutcome, SetupError> {
    let Collaborators {
        releases,
        repo_root,
        fetcher,
        runner,
    } = collaborators;

    let version = VersionResolver::new(releases, repo_root, &config.tool_name, &config.config_file)
        .resolve(&config.selector)?;

    log_info!(
        "Installing DCM {} for {}.",
        version.bold(),
        host.to_string().cyan()
    );

    let download_url = artifact_locator::locate(
        &config.upstream,
        &config.tool_name,
        &version,
        host.platform,
        host.architecture,
    );

    let cache = ToolCache::new(&config.cache_root);
    let entry = ArtifactCache::new(&cache, fetcher, host.platform, &config.temp_root).acquire(
        &download_url,
        &config.tool_name,
        &version,
        host.architecture,
    )?;

    let output_name = format!("{}-version", config.tool_name);
    runner
        .set_output(&output_name, &version)
        .map_err(|source| SetupError::Output {
            name: output_name.clone(),
            source,
        })?;

    let layout = github::install(&entry, host.platform, &config.tool_name, runner)?;

    if config.skip_smoke_test {
        log_info!("Skipping the {} --version check.", config.tool_name);
    } else {
        github::verify(&layout.executable, runner.search_path())?;
    }

    Ok(SetupOutcome {
        version,
        download_url,
        layout,
    })
}
