//! Implementation of tracker-core traits for GitHubClient

use tracker_core::{Issue, IssueTracker, Label, RepoRef, Result, TrackerError};

use crate::client::GitHubClient;
use crate::convert::{create_label_from_core, github_issue_to_core};

impl IssueTracker for GitHubClient {
    fn list_issues(&self, repo: &RepoRef) -> Result<Vec<Issue>> {
        let issues = self.list_issues(repo).map_err(TrackerError::from)?;
        Ok(issues.into_iter().map(github_issue_to_core).collect())
    }

    fn transfer_issue(
        &self,
        number: u64,
        source: &RepoRef,
        target: &RepoRef,
    ) -> Result<Option<u64>> {
        self.transfer_issue(number, source, target)
            .map_err(TrackerError::from)
    }

    fn add_labels(&self, repo: &RepoRef, number: u64, names: &[String]) -> Result<()> {
        self.add_labels(repo, number, names)
            .map(|_| ())
            .map_err(TrackerError::from)
    }

    fn list_labels(&self, repo: &RepoRef) -> Result<Vec<String>> {
        self.list_labels(repo)
            .map(|labels| labels.into_iter().map(|l| l.name).collect())
            .map_err(TrackerError::from)
    }

    fn create_label(&self, repo: &RepoRef, label: &Label) -> Result<()> {
        self.create_label(repo, &create_label_from_core(label))
            .map(|_| ())
            .map_err(TrackerError::from)
    }
}
