//! Model conversions between GitHub types and tracker-core types

use tracker_core::{Issue, IssueState, Label};
use tracing::warn;

use crate::models::*;

/// Convert a GitHub issue to a tracker-core Issue
pub fn github_issue_to_core(issue: GitHubIssue) -> Issue {
    let state = issue.state.parse().unwrap_or_else(|_| {
        warn!(issue = issue.number, state = %issue.state, "Unknown issue state, treating as open");
        IssueState::Open
    });

    Issue {
        number: issue.number,
        title: issue.title,
        body: issue.body.unwrap_or_default(),
        state,
        labels: issue.labels.into_iter().map(Into::into).collect(),
    }
}

impl From<GitHubLabel> for Label {
    fn from(label: GitHubLabel) -> Self {
        Label {
            name: label.name,
            color: label.color,
            description: label.description.filter(|d| !d.is_empty()),
        }
    }
}

/// Build a label creation request from a tracker-core Label
pub fn create_label_from_core(label: &Label) -> CreateGitHubLabel {
    CreateGitHubLabel {
        name: label.name.clone(),
        color: label.color.trim_start_matches('#').to_string(),
        description: label.description.clone().filter(|d| !d.is_empty()),
    }
}
