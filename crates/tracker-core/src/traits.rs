use crate::error::Result;
use crate::models::*;

/// Operations the transfer engine needs from an issue tracker
///
/// Each backend (GitHub API, `gh` CLI, in-memory mock) provides its own
/// implementation. Calls are blocking; the engine drives them one at a time.
pub trait IssueTracker: Send + Sync {
    // ========== Issue Operations ==========

    /// List all issues in a repository, in any state
    fn list_issues(&self, repo: &RepoRef) -> Result<Vec<Issue>>;

    /// Transfer an issue to another repository
    ///
    /// Returns the issue's number in the target repository, or `None` when the
    /// tracker's confirmation does not reveal it.
    fn transfer_issue(&self, number: u64, source: &RepoRef, target: &RepoRef)
        -> Result<Option<u64>>;

    /// Add labels (by name) to an issue
    fn add_labels(&self, repo: &RepoRef, number: u64, names: &[String]) -> Result<()>;

    // ========== Label Operations ==========

    /// List the names of all labels defined in a repository
    fn list_labels(&self, repo: &RepoRef) -> Result<Vec<String>>;

    /// Create a label in a repository
    fn create_label(&self, repo: &RepoRef, label: &Label) -> Result<()>;
}
