//! # Version Resolver
//!
//! Turns the user's [`VersionSelector`] into a concrete release tag before
//! any cache or network work for the artifact starts.
//!
//! - `Explicit(tag)` returns the tag verbatim, without contacting GitHub.
//! - `Latest` asks the release source for its latest release.
//! - `Auto` reads the `version` range from the configuration file at the
//!   repository root and picks the **first** release, in the order the
//!   release source returns them (newest first), whose tag satisfies it.
//!   Only the newest [`RELEASE_WINDOW`] releases are considered.

use crate::libs::release_source::ReleaseSource;
use crate::libs::repo_root::RepoRootLocator;
use crate::libs::utilities::version_range::VersionRange;
use crate::schemas::errors::ResolutionError;
use crate::schemas::project_config::read_version_range;
use crate::schemas::version::{ReleaseTag, VersionSelector};
use crate::{log_debug, log_info};

/// How many of the newest releases `auto` inspects.
pub const RELEASE_WINDOW: u32 = 30;

pub struct VersionResolver<'a> {
    releases: &'a dyn ReleaseSource,
    repo_root: &'a dyn RepoRootLocator,
    tool_name: &'a str,
    config_file: &'a str,
}

impl<'a> VersionResolver<'a> {
    pub fn new(
        releases: &'a dyn ReleaseSource,
        repo_root: &'a dyn RepoRootLocator,
        tool_name: &'a str,
        config_file: &'a str,
    ) -> Self {
        VersionResolver {
            releases,
            repo_root,
            tool_name,
            config_file,
        }
    }

    pub fn resolve(&self, selector: &VersionSelector) -> Result<ReleaseTag, ResolutionError> {
        log_debug!("[Version] Resolving selector '{}'", selector);
        match selector {
            VersionSelector::Explicit(tag) => Ok(tag.clone()),
            VersionSelector::Latest => self.resolve_latest(),
            VersionSelector::Auto => self.resolve_auto(),
        }
    }

    fn resolve_latest(&self) -> Result<ReleaseTag, ResolutionError> {
        let release = self.releases.latest_release()?;
        let tag = release.tag_name.trim();
        if tag.is_empty() {
            return Err(ResolutionError::NoRelease(
                "the latest release has no tag".to_string(),
            ));
        }
        log_info!("[Version] Latest {} release is {}", self.tool_name, tag);
        Ok(tag.to_string())
    }

    fn resolve_auto(&self) -> Result<ReleaseTag, ResolutionError> {
        let root = self
            .repo_root
            .repo_root()
            .ok_or(ResolutionError::RootNotFound)?;

        let raw_range = read_version_range(&root, self.config_file)?;
        let range = VersionRange::parse(&raw_range).map_err(ResolutionError::RangeUnparsable)?;
        log_info!(
            "[Version] {} declares version range '{}'",
            self.config_file,
            range
        );

        let releases = self.releases.list_releases(RELEASE_WINDOW)?;
        log_debug!("[Version] Considering {} releases", releases.len());

        releases
            .into_iter()
            .map(|release| release.tag_name)
            .find(|tag| range.matches_tag(tag))
            .inspect(|tag| log_info!("[Version] Release {} satisfies '{}'", tag, range))
            .ok_or_else(|| ResolutionError::NoMatch {
                tool: self.tool_name.to_string(),
                range: raw_range,
            })
    }
}
