//! Release listing for the upstream repository.
//!
//! [`ReleaseSource`] is the seam the version resolver talks to;
//! [`GitHubReleases`] implements it against the GitHub REST API.

use crate::schemas::common::{Release, Upstream};
use crate::schemas::errors::ReleaseSourceError;
use crate::{log_debug, log_info};
use serde::de::DeserializeOwned;

const USER_AGENT: &str = "setup-dcm";
const GITHUB_API_VERSION: &str = "2022-11-28";

/// Lists the releases of one fixed repository.
pub trait ReleaseSource {
    /// The most recent published (non-draft, non-prerelease) release.
    fn latest_release(&self) -> Result<Release, ReleaseSourceError>;

    /// Up to `per_page` releases, newest first.
    fn list_releases(&self, per_page: u32) -> Result<Vec<Release>, ReleaseSourceError>;
}

/// GitHub REST API client scoped to one repository.
pub struct GitHubReleases {
    agent: ureq::Agent,
    upstream: Upstream,
    token: String,
}

impl GitHubReleases {
    pub fn new(upstream: Upstream, token: impl Into<String>) -> Self {
        let agent = ureq::AgentBuilder::new().user_agent(USER_AGENT).build();
        GitHubReleases {
            agent,
            upstream,
            token: token.into(),
        }
    }

    fn releases_url(&self) -> String {
        format!(
            "{}/repos/{}/{}/releases",
            self.upstream.api_url.trim_end_matches('/'),
            self.upstream.owner,
            self.upstream.repo
        )
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ReleaseSourceError> {
        log_debug!("[GitHub] GET {} {:?}", url, query);

        let mut request = self
            .agent
            .get(url)
            .set("Accept", "application/vnd.github+json")
            .set("X-GitHub-Api-Version", GITHUB_API_VERSION)
            .set("Authorization", &format!("Bearer {}", self.token));
        for (key, value) in query {
            request = request.query(key, value);
        }

        let response = match request.call() {
            Ok(response) => response,
            Err(ureq::Error::Status(status, _)) => {
                return Err(ReleaseSourceError::Status {
                    url: url.to_string(),
                    status,
                });
            }
            Err(ureq::Error::Transport(transport)) => {
                return Err(ReleaseSourceError::Transport {
                    url: url.to_string(),
                    message: transport.to_string(),
                });
            }
        };

        response
            .into_json::<T>()
            .map_err(|e| ReleaseSourceError::InvalidResponse(e.to_string()))
    }
}

impl ReleaseSource for GitHubReleases {
    fn latest_release(&self) -> Result<Release, ReleaseSourceError> {
        log_info!(
            "[GitHub] Fetching the latest release of {}",
            self.upstream.slug()
        );
        let url = format!("{}/latest", self.releases_url());
        self.get_json(&url, &[])
    }

    fn list_releases(&self, per_page: u32) -> Result<Vec<Release>, ReleaseSourceError> {
        log_info!(
            "[GitHub] Fetching up to {} releases of {}",
            per_page,
            self.upstream.slug()
        );
        let per_page = per_page.to_string();
        self.get_json(&self.releases_url(), &[("per_page", per_page.as_str())])
    }
}
