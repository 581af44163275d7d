//! Backend that drives the `gh` command-line tool
//!
//! Authentication is whatever `gh auth` already holds; no token is passed.

use regex::Regex;
use serde::Deserialize;
use std::path::PathBuf;
use std::process::Command;
use std::sync::LazyLock;
use tracing::{debug, warn};
use tracker_core::{Issue, IssueTracker, Label, RepoRef, Result, TrackerError};

/// Default `--limit` for list commands (gh itself defaults to 30)
pub const DEFAULT_LIST_LIMIT: usize = 1000;

static TRANSFERRED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Issue #(\d+) transferred").expect("valid regex"));

static ISSUE_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/issues/(\d+)\s*$").expect("valid regex"));

/// A single `gh` invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GhCommand<'a> {
    ListIssues { repo: &'a RepoRef, limit: usize },
    ListLabels { repo: &'a RepoRef, limit: usize },
    CreateLabel { repo: &'a RepoRef, label: &'a Label },
    TransferIssue { number: u64, source: &'a RepoRef, target: &'a RepoRef },
    EditIssueLabels { repo: &'a RepoRef, number: u64, labels: String },
}

impl GhCommand<'_> {
    /// Argument vector passed to `gh` (no shell involved)
    pub fn args(&self) -> Vec<String> {
        match self {
            GhCommand::ListIssues { repo, limit } => vec![
                "issue".into(),
                "list".into(),
                "--repo".into(),
                repo.to_string(),
                "--json".into(),
                "number,title,body,state,labels".into(),
                "--state".into(),
                "all".into(),
                "--limit".into(),
                limit.to_string(),
            ],
            GhCommand::ListLabels { repo, limit } => vec![
                "label".into(),
                "list".into(),
                "--repo".into(),
                repo.to_string(),
                "--json".into(),
                "name".into(),
                "--limit".into(),
                limit.to_string(),
            ],
            GhCommand::CreateLabel { repo, label } => {
                let mut args = vec![
                    "label".into(),
                    "create".into(),
                    label.name.clone(),
                    "--color".into(),
                    label.color.trim_start_matches('#').to_string(),
                    "--repo".into(),
                    repo.to_string(),
                ];
                if let Some(description) = label.description.as_deref().filter(|d| !d.is_empty()) {
                    args.push("--description".into());
                    args.push(description.to_string());
                }
                args
            }
            GhCommand::TransferIssue {
                number,
                source,
                target,
            } => vec![
                "issue".into(),
                "transfer".into(),
                number.to_string(),
                target.to_string(),
                "--repo".into(),
                source.to_string(),
            ],
            GhCommand::EditIssueLabels {
                repo,
                number,
                labels,
            } => vec![
                "issue".into(),
                "edit".into(),
                number.to_string(),
                "--repo".into(),
                repo.to_string(),
                "--add-label".into(),
                labels.clone(),
            ],
        }
    }
}

/// Extract the new issue number from `gh issue transfer` output
///
/// Older `gh` releases print "Issue #N transferred"; newer ones print the URL
/// of the moved issue.
pub fn parse_transfer_output(stdout: &str) -> Option<u64> {
    TRANSFERRED_RE
        .captures(stdout)
        .or_else(|| ISSUE_URL_RE.captures(stdout.trim_end()))
        .and_then(|caps| caps[1].parse().ok())
}

#[derive(Debug, Deserialize)]
struct GhLabelName {
    name: String,
}

/// `IssueTracker` over the `gh` CLI
pub struct GhCli {
    program: PathBuf,
    list_limit: usize,
}

impl Default for GhCli {
    fn default() -> Self {
        Self::new("gh", DEFAULT_LIST_LIMIT)
    }
}

impl GhCli {
    pub fn new(program: impl Into<PathBuf>, list_limit: usize) -> Self {
        Self {
            program: program.into(),
            list_limit,
        }
    }

    /// Run a command and return its stdout
    fn run(&self, command: &GhCommand<'_>) -> Result<String> {
        let args = command.args();
        debug!(program = %self.program.display(), ?args, "Running gh");

        let output = Command::new(&self.program)
            .args(&args)
            .output()
            .map_err(|e| {
                TrackerError::Io(format!(
                    "Failed to run {}: {}",
                    self.program.display(),
                    e
                ))
            })?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() {
            let message = stderr.trim();
            return Err(TrackerError::Command(if message.is_empty() {
                format!("gh exited with {}", output.status)
            } else {
                message.to_string()
            }));
        }

        if !stderr.trim().is_empty() {
            warn!(stderr = %stderr.trim(), "gh reported on stderr");
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl IssueTracker for GhCli {
    fn list_issues(&self, repo: &RepoRef) -> Result<Vec<Issue>> {
        let stdout = self.run(&GhCommand::ListIssues {
            repo,
            limit: self.list_limit,
        })?;
        serde_json::from_str(&stdout).map_err(|e| TrackerError::Parse(e.to_string()))
    }

    fn transfer_issue(
        &self,
        number: u64,
        source: &RepoRef,
        target: &RepoRef,
    ) -> Result<Option<u64>> {
        let stdout = self.run(&GhCommand::TransferIssue {
            number,
            source,
            target,
        })?;

        let new_number = parse_transfer_output(&stdout);
        if new_number.is_none() {
            warn!(issue = number, output = %stdout.trim(), "Could not read new issue number");
        }
        Ok(new_number)
    }

    fn add_labels(&self, repo: &RepoRef, number: u64, names: &[String]) -> Result<()> {
        self.run(&GhCommand::EditIssueLabels {
            repo,
            number,
            labels: names.join(","),
        })
        .map(|_| ())
    }

    fn list_labels(&self, repo: &RepoRef) -> Result<Vec<String>> {
        let stdout = self.run(&GhCommand::ListLabels {
            repo,
            limit: self.list_limit,
        })?;
        let labels: Vec<GhLabelName> =
            serde_json::from_str(&stdout).map_err(|e| TrackerError::Parse(e.to_string()))?;
        Ok(labels.into_iter().map(|l| l.name).collect())
    }

    fn create_label(&self, repo: &RepoRef, label: &Label) -> Result<()> {
        self.run(&GhCommand::CreateLabel { repo, label }).map(|_| ())
    }
}
