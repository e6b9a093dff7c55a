use crate::schemas::common::Upstream;
use crate::schemas::project_config::DEFAULT_CONFIG_FILE;
use crate::schemas::version::VersionSelector;
use clap::Parser;
use clap::builder::FalseyValueParser;

/// Defines the command-line interface (CLI) for 'setup-dcm'.
///
/// The host runner passes action inputs as `INPUT_<NAME>` environment
/// variables, so every option here has an environment fallback and the
/// binary normally runs without any arguments.
#[derive(Parser, Debug)]
#[command(name = "setup-dcm")]
#[command(about = "Install the DCM command-line tool and add it to the search path", long_about = None)]
pub struct Cli {
    /// Token used to query the GitHub releases API.
    #[arg(long, env = "INPUT_GITHUB_TOKEN", hide_env_values = true)]
    pub(crate) github_token: Option<String>,

    /// Version to install: `latest`, `auto` (read the range from the project
    /// configuration file) or an explicit release tag such as `1.21.0`.
    #[arg(long, env = "INPUT_VERSION", default_value = "latest")]
    pub(crate) version: VersionSelector,

    /// Name of the tool executable inside the release archive.
    #[arg(long, default_value = "dcm")]
    pub(crate) tool_name: String,

    /// Project configuration file `auto` reads the version range from.
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    pub(crate) config_file: String,

    /// Owner of the repository publishing the releases.
    #[arg(long, default_value = Upstream::DEFAULT_OWNER)]
    pub(crate) owner: String,

    /// Repository publishing the releases.
    #[arg(long, default_value = Upstream::DEFAULT_REPO)]
    pub(crate) repo: String,

    /// Base URL of the GitHub REST API.
    #[arg(long, env = "GITHUB_API_URL", default_value = Upstream::DEFAULT_API_URL)]
    pub(crate) api_url: String,

    /// Base URL release artifacts are downloaded from.
    #[arg(long, env = "GITHUB_SERVER_URL", default_value = Upstream::DEFAULT_DOWNLOAD_URL)]
    pub(crate) download_url: String,

    /// Root directory of the artifact cache.
    #[arg(long, env = "RUNNER_TOOL_CACHE")]
    pub(crate) cache_dir: Option<String>,

    /// Directory downloads are staged in.
    #[arg(long, env = "RUNNER_TEMP")]
    pub(crate) temp_dir: Option<String>,

    /// Skip running `<tool> --version` after installation.
    #[arg(long)]
    pub(crate) skip_smoke_test: bool,

    /// Enables detailed debug output for troubleshooting.
    #[arg(short, long, env = "RUNNER_DEBUG", value_parser = FalseyValueParser::new())]
    pub(crate) debug: bool,
}
