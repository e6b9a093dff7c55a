// The immutable configuration of one run, assembled from CLI flags and the
// runner's environment before any pipeline step starts.

use crate::cli::cmd_enums::Cli;
use crate::schemas::common::Upstream;
use crate::schemas::errors::SetupError;
use crate::schemas::path_resolver::PathResolver;
use crate::schemas::version::VersionSelector;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct SetupConfig {
    /// Credential for the release-listing API.
    pub github_token: String,
    /// What version the user asked for.
    pub selector: VersionSelector,
    /// Name of the tool binary; also the first cache key component.
    pub tool_name: String,
    /// Project configuration file consulted by `auto`.
    pub config_file: String,
    /// Where releases are listed and downloaded from.
    pub upstream: Upstream,
    /// Root of the artifact cache.
    pub cache_root: PathBuf,
    /// Staging area for downloads.
    pub temp_root: PathBuf,
    /// Skip the `--version` smoke invocation.
    pub skip_smoke_test: bool,
}

impl SetupConfig {
    pub fn from_cli(cli: &Cli) -> Result<Self, SetupError> {
        let github_token = cli.github_token.as_deref().map(str::trim).unwrap_or_default();
        if github_token.is_empty() {
            return Err(SetupError::MissingInput("github_token"));
        }

        let paths = PathResolver::new(cli.cache_dir.as_deref(), cli.temp_dir.as_deref());

        Ok(SetupConfig {
            github_token: github_token.to_string(),
            selector: cli.version.clone(),
            tool_name: cli.tool_name.clone(),
            config_file: cli.config_file.clone(),
            upstream: Upstream {
                owner: cli.owner.clone(),
                repo: cli.repo.clone(),
                api_url: trim_base(&cli.api_url),
                download_url: trim_base(&cli.download_url),
            },
            cache_root: paths.cache_root().to_path_buf(),
            temp_root: paths.temp_root().to_path_buf(),
            skip_smoke_test: cli.skip_smoke_test,
        })
    }
}

fn trim_base(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
