// Data structures for GitHub API payloads and the upstream the tool is
// distributed from.
use serde::Deserialize;

/// A single GitHub release as returned by the releases API.
/// Only the tag is needed; every other field is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Release {
    /// The release tag (e.g. `"v1.5.0"`).
    pub tag_name: String,
}

/// Where releases are listed and downloaded from.
///
/// Defaults point at `CQLabs/homebrew-dcm` on github.com; GitHub Enterprise
/// or a mirror only needs different values here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upstream {
    /// Repository owner, e.g. `CQLabs`.
    pub owner: String,
    /// Repository name, e.g. `homebrew-dcm`.
    pub repo: String,
    /// Base URL of the REST API, e.g. `https://api.github.com`.
    pub api_url: String,
    /// Base URL release downloads are served from, e.g. `https://github.com`.
    pub download_url: String,
}

impl Upstream {
    pub const DEFAULT_OWNER: &'static str = "CQLabs";
    pub const DEFAULT_REPO: &'static str = "homebrew-dcm";
    pub const DEFAULT_API_URL: &'static str = "https://api.github.com";
    pub const DEFAULT_DOWNLOAD_URL: &'static str = "https://github.com";

    /// `owner/repo`, for log lines.
    pub fn slug(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

impl Default for Upstream {
    fn default() -> Self {
        Upstream {
            owner: Self::DEFAULT_OWNER.to_string(),
            repo: Self::DEFAULT_REPO.to_string(),
            api_url: Self::DEFAULT_API_URL.to_string(),
            download_url: Self::DEFAULT_DOWNLOAD_URL.to_string(),
        }
    }
}
