use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracker_core::{RepoRef, TrackerError};
use transfer_engine::{IssueFilter, OrderStrategy};

#[derive(Parser, Debug)]
#[command(
    name = "issue-transfer",
    version,
    about = "Move issues between repositories, keeping their labels"
)]
pub struct Cli {
    /// Output format
    #[arg(long, short = 'o', value_enum, global = true, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// When to colorize output
    #[arg(long, value_enum, global = true, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Backend to use. If not specified, uses config or defaults to gh.
    #[arg(long, short = 'b', value_enum, global = true, env = "ISSUE_TRANSFER_BACKEND")]
    pub backend: Option<Backend>,

    /// Path to a TOML config file
    #[arg(long, env = "ISSUE_TRANSFER_CONFIG", global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// GitHub API base URL (api backend)
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// GitHub token (api backend; overrides config and GITHUB_TOKEN)
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// More log output (-v debug, -vv trace)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(ValueEnum, Clone, Debug, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// GitHub REST and GraphQL API
    #[value(name = "api", alias = "github")]
    Api,
    /// The gh command-line tool
    #[default]
    #[value(name = "gh")]
    Gh,
    /// In-memory tracker seeded from a scenario file
    #[value(name = "mock")]
    Mock,
}

#[derive(ValueEnum, Clone, Debug, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(ValueEnum, Clone, Debug, Copy, Default)]
pub enum ColorChoice {
    /// Colorize output if stdout is a terminal
    #[default]
    Auto,
    /// Always colorize output
    Always,
    /// Never colorize output
    Never,
}

#[derive(ValueEnum, Clone, Debug, Copy, PartialEq, Eq)]
pub enum Ordering {
    /// Issues without references first, input order kept otherwise
    Partition,
    /// Referenced issues always before the issues that mention them
    Topological,
}

impl From<Ordering> for OrderStrategy {
    fn from(ordering: Ordering) -> Self {
        match ordering {
            Ordering::Partition => OrderStrategy::Partition,
            Ordering::Topological => OrderStrategy::Topological,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Transfer issues from one repository to another
    #[command(visible_alias = "t")]
    Transfer(TransferArgs),
    /// Show what a transfer would do without changing anything
    Plan(BatchArgs),
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Which issues move where
#[derive(Args, Debug)]
pub struct BatchArgs {
    /// Owner of both repositories
    pub owner: String,

    /// Repository to move issues out of (`name`, or `owner/name`)
    pub source_repo: String,

    /// Repository to move issues into (`name`, or `owner/name`)
    pub target_repo: String,

    /// Include closed issues (default: open issues only)
    #[arg(long)]
    pub all: bool,

    /// How to order the batch
    #[arg(long, value_enum)]
    pub ordering: Option<Ordering>,
}

impl BatchArgs {
    /// Source and target, each resolved against `owner`
    pub fn repos(&self) -> Result<(RepoRef, RepoRef), TrackerError> {
        Ok((
            RepoRef::resolve(&self.owner, &self.source_repo)?,
            RepoRef::resolve(&self.owner, &self.target_repo)?,
        ))
    }

    pub fn filter(&self) -> IssueFilter {
        if self.all {
            IssueFilter::All
        } else {
            IssueFilter::Open
        }
    }
}

#[derive(Args, Debug)]
pub struct TransferArgs {
    #[command(flatten)]
    pub batch: BatchArgs,

    /// Wait before labelling a freshly transferred issue
    #[arg(long, value_name = "MS")]
    pub settle_delay_ms: Option<u64>,

    /// Attempts at adding labels before giving up on an issue
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    pub label_attempts: Option<u32>,
}

impl Cli {
    pub fn generate_completions(shell: Shell) {
        let mut cmd = Cli::command();
        clap_complete::generate(shell, &mut cmd, "issue-transfer", &mut std::io::stdout());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_transfer_args() {
        let cli = Cli::parse_from([
            "issue-transfer",
            "transfer",
            "octo",
            "old",
            "elsewhere/new",
            "--all",
            "--ordering",
            "topological",
            "--settle-delay-ms",
            "0",
        ]);

        let Commands::Transfer(args) = cli.command else {
            panic!("expected transfer");
        };
        let (source, target) = args.batch.repos().unwrap();
        assert_eq!(source, RepoRef::new("octo", "old"));
        assert_eq!(target, RepoRef::new("elsewhere", "new"));
        assert_eq!(args.batch.filter(), IssueFilter::All);
        assert_eq!(args.batch.ordering, Some(Ordering::Topological));
        assert_eq!(args.settle_delay_ms, Some(0));
        assert_eq!(args.label_attempts, None);
    }

    #[test]
    fn test_open_issues_by_default() {
        let cli = Cli::parse_from(["issue-transfer", "plan", "octo", "old", "new"]);

        let Commands::Plan(args) = cli.command else {
            panic!("expected plan");
        };
        assert_eq!(args.filter(), IssueFilter::Open);
    }

    #[test]
    fn test_bad_repo_argument() {
        let cli = Cli::parse_from(["issue-transfer", "plan", "octo", "a/b/c", "new"]);

        let Commands::Plan(args) = cli.command else {
            panic!("expected plan");
        };
        assert!(args.repos().is_err());
    }

    #[test]
    fn test_zero_label_attempts_rejected() {
        let result = Cli::try_parse_from([
            "issue-transfer",
            "transfer",
            "octo",
            "old",
            "new",
            "--label-attempts",
            "0",
        ]);
        assert!(result.is_err());
    }
}
