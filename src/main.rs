mod cli;
mod commands;
mod installers;
mod libs;
mod logger;
mod schemas;

use anyhow::Context;
use clap::Parser;
use cli::cmd_enums::Cli;
use commands::setup::{self, Collaborators};
use libs::release_source::GitHubReleases;
use libs::repo_root::GitRepoRoot;
use libs::runner::ActionsRunner;
use libs::utilities::assets::HttpFetcher;
use libs::utilities::platform;
use schemas::setup_config::SetupConfig;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    logger::init(cli.debug);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log_error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = SetupConfig::from_cli(cli)?;
    let host = platform::detect();
    log_debug!("[Main] Detected platform {}", host);
    log_debug!("[Main] Cache root {}", config.cache_root.display());

    let releases = GitHubReleases::new(config.upstream.clone(), config.github_token.as_str());
    let repo_root = GitRepoRoot::new(None);
    let fetcher = HttpFetcher::default();
    let mut runner = ActionsRunner::from_env();

    let outcome = setup::run(
        &config,
        host,
        Collaborators {
            releases: &releases,
            repo_root: &repo_root,
            fetcher: &fetcher,
            runner: &mut runner,
        },
    )
    .with_context(|| format!("Failed to set up {}", config.tool_name))?;

    log_debug!("[Main] Artifact source {}", outcome.download_url);
    log_info!(
        "{} {} is ready at {}.",
        config.tool_name,
        outcome.version,
        outcome.layout.executable.display()
    );
    Ok(())
}
