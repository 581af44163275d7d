use thiserror::Error;
use tracker_core::{RepoRef, TrackerError};

/// Errors that stop a whole run
///
/// Per-issue and per-label failures never surface here; they are folded into
/// the batch result instead.
#[derive(Error, Debug)]
pub enum TransferError {
    #[error("Failed to list issues in {repo}")]
    ListIssues {
        repo: RepoRef,
        source: TrackerError,
    },

    #[error("Failed to list labels in {repo}")]
    ListLabels {
        repo: RepoRef,
        source: TrackerError,
    },
}
