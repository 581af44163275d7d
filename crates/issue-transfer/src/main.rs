mod cli;
mod color;
mod commands;
mod config;
mod output;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Backend, Cli, Commands};
use commands::Status;
use config::Config;
use github_backend::{GhCli, GitHubClient};
use output::output_error;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use tracker_core::IssueTracker;
use tracker_mock::MockTracker;

fn main() -> ExitCode {
    let cli = Cli::parse();
    color::init(cli.color);
    init_tracing(cli.verbose, cli.quiet);

    match run(&cli) {
        Ok(Status::Success) => ExitCode::SUCCESS,
        Ok(Status::Partial) => ExitCode::from(2),
        Err(e) => {
            output_error(&e, cli.format);
            ExitCode::from(1)
        }
    }
}

/// Logs go to stderr; `RUST_LOG` overrides the verbosity flags
fn init_tracing(verbose: u8, quiet: bool) {
    let default_level = match (quiet, verbose) {
        (true, _) => "warn",
        (false, 0) => "info",
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> Result<Status> {
    if let Commands::Completions { shell } = &cli.command {
        Cli::generate_completions(*shell);
        return Ok(Status::Success);
    }

    let mut config = Config::load(cli.config.as_deref())?;
    config.merge_with_cli(cli);
    config.validate()?;

    let tracker = build_tracker(&config)?;
    let policy = config.transfer.policy();
    debug!(backend = ?config.backend(), ?policy, "Configured");

    match &cli.command {
        Commands::Transfer(args) => {
            commands::transfer::handle_transfer(tracker.as_ref(), args, policy, cli.format)
        }
        Commands::Plan(args) => {
            commands::plan::handle_plan(tracker.as_ref(), args, policy, cli.format)?;
            Ok(Status::Success)
        }
        Commands::Completions { .. } => Ok(Status::Success),
    }
}

fn build_tracker(config: &Config) -> Result<Box<dyn IssueTracker>> {
    let tracker: Box<dyn IssueTracker> = match config.backend() {
        Backend::Api => {
            let token = config
                .token
                .as_deref()
                .context("GitHub token not configured")?;
            Box::new(GitHubClient::with_base_url(&config.api_url, token))
        }
        Backend::Gh => Box::new(GhCli::new(&config.gh_path, config.list_limit)),
        Backend::Mock => {
            let path = config
                .mock_file
                .as_deref()
                .context("Mock scenario not configured")?;
            let tracker = MockTracker::from_file(path)
                .with_context(|| format!("Cannot load mock scenario {}", path.display()))?;
            Box::new(tracker)
        }
    };
    Ok(tracker)
}
