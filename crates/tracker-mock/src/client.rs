//! Mock tracker implementing IssueTracker trait
//!
//! Keeps repositories in memory and applies every write, so a test can inspect
//! the end state as well as the sequence of calls.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracker_core::{Issue, IssueTracker, Label, RepoRef, Result, TrackerError};

use crate::scenario::{call_log_path, FailureRules, MockScenario, ScenarioError};

/// A single call log entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallLogEntry {
    /// Timestamp of the call
    pub timestamp: DateTime<Utc>,

    /// Method name
    pub method: String,

    /// Arguments passed, rendered as strings
    pub args: Vec<String>,

    /// Error message (if call failed)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Default)]
struct MockRepo {
    issues: Vec<Issue>,
    labels: Vec<Label>,
}

impl MockRepo {
    fn next_number(&self) -> u64 {
        self.issues.iter().map(|i| i.number).max().unwrap_or(0) + 1
    }
}

#[derive(Debug, Default)]
struct MockState {
    repos: HashMap<RepoRef, MockRepo>,
    /// (target repo, new number) -> original number in the source repo
    origins: HashMap<(RepoRef, u64), u64>,
    add_labels_failures_left: u32,
    calls: Vec<CallLogEntry>,
}

/// An in-memory tracker
pub struct MockTracker {
    state: Mutex<MockState>,
    failures: FailureRules,
    log_writer: Mutex<Option<BufWriter<File>>>,
}

impl Default for MockTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTracker {
    /// Create an empty tracker with no repositories
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MockState::default()),
            failures: FailureRules::default(),
            log_writer: Mutex::new(None),
        }
    }

    /// Build a tracker from a loaded scenario
    pub fn from_scenario(scenario: MockScenario) -> Self {
        let mut tracker = Self::new().with_failures(scenario.failures);
        for repo in scenario.repos {
            tracker = tracker.with_repo(repo.name, repo.issues, repo.labels);
        }
        tracker
    }

    /// Load a scenario file and log calls next to it
    pub fn from_file(path: &Path) -> std::result::Result<Self, ScenarioError> {
        let scenario = MockScenario::load(path)?;
        let tracker = Self::from_scenario(scenario);

        let log_file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(call_log_path(path))
            .ok();
        *tracker.log_writer.lock().unwrap_or_else(|e| e.into_inner()) =
            log_file.map(BufWriter::new);

        Ok(tracker)
    }

    /// Add a repository with initial issues and labels
    pub fn with_repo(self, repo: RepoRef, issues: Vec<Issue>, labels: Vec<Label>) -> Self {
        self.lock()
            .repos
            .insert(repo, MockRepo { issues, labels });
        self
    }

    /// Replace the failure rules
    pub fn with_failures(mut self, failures: FailureRules) -> Self {
        self.lock().add_labels_failures_left = failures.add_labels_flaky;
        self.failures = failures;
        self
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Record a call and pass its result through
    fn log_call<T>(&self, method: &str, args: Vec<String>, result: Result<T>) -> Result<T> {
        let entry = CallLogEntry {
            timestamp: Utc::now(),
            method: method.to_string(),
            args,
            error: result.as_ref().err().map(|e| e.to_string()),
        };

        if let Ok(mut writer) = self.log_writer.lock() {
            if let Some(w) = writer.as_mut() {
                if let Ok(json) = serde_json::to_string(&entry) {
                    let _ = writeln!(w, "{}", json);
                    let _ = w.flush();
                }
            }
        }

        self.lock().calls.push(entry);
        result
    }

    // ========== Inspection ==========

    /// Every call made so far, in order
    pub fn calls(&self) -> Vec<CallLogEntry> {
        self.lock().calls.clone()
    }

    /// Calls to one method, in order
    pub fn calls_to(&self, method: &str) -> Vec<CallLogEntry> {
        self.lock()
            .calls
            .iter()
            .filter(|c| c.method == method)
            .cloned()
            .collect()
    }

    /// Current issues of a repository
    pub fn issues(&self, repo: &RepoRef) -> Vec<Issue> {
        self.lock()
            .repos
            .get(repo)
            .map(|r| r.issues.clone())
            .unwrap_or_default()
    }

    /// Current label names of a repository
    pub fn label_names(&self, repo: &RepoRef) -> Vec<String> {
        self.lock()
            .repos
            .get(repo)
            .map(|r| r.labels.iter().map(|l| l.name.clone()).collect())
            .unwrap_or_default()
    }

    /// Original number of an issue that was moved into `repo` as `number`
    pub fn origin_of(&self, repo: &RepoRef, number: u64) -> Option<u64> {
        self.lock().origins.get(&(repo.clone(), number)).copied()
    }

    fn transfer(&self, number: u64, source: &RepoRef, target: &RepoRef) -> Result<Option<u64>> {
        if self.failures.transfer.contains(&number) {
            return Err(TrackerError::Api {
                status: 422,
                message: format!("Issue #{} could not be transferred", number),
            });
        }

        let mut state = self.lock();
        if !state.repos.contains_key(target) {
            return Err(TrackerError::NotFound(format!("repository {}", target)));
        }

        let source_repo = state
            .repos
            .get_mut(source)
            .ok_or_else(|| TrackerError::NotFound(format!("repository {}", source)))?;
        let position = source_repo
            .issues
            .iter()
            .position(|i| i.number == number)
            .ok_or_else(|| TrackerError::NotFound(format!("issue {}#{}", source, number)))?;
        let mut issue = source_repo.issues.remove(position);

        let target_repo = state
            .repos
            .get_mut(target)
            .ok_or_else(|| TrackerError::NotFound(format!("repository {}", target)))?;
        let new_number = target_repo.next_number();
        issue.number = new_number;
        // Labels do not survive a transfer
        issue.labels.clear();
        target_repo.issues.push(issue);
        state.origins.insert((target.clone(), new_number), number);

        if self.failures.hide_new_number.contains(&number) {
            Ok(None)
        } else {
            Ok(Some(new_number))
        }
    }

    fn apply_labels(&self, repo: &RepoRef, number: u64, names: &[String]) -> Result<()> {
        let mut state = self.lock();

        let origin = state.origins.get(&(repo.clone(), number)).copied();
        if origin.is_some_and(|o| self.failures.add_labels.contains(&o)) {
            return Err(TrackerError::Api {
                status: 422,
                message: format!("Issue #{} is not ready for edits", number),
            });
        }
        if state.add_labels_failures_left > 0 {
            state.add_labels_failures_left -= 1;
            return Err(TrackerError::NotFound(format!(
                "issue {}#{} (not yet visible)",
                repo, number
            )));
        }

        let mock_repo = state
            .repos
            .get_mut(repo)
            .ok_or_else(|| TrackerError::NotFound(format!("repository {}", repo)))?;

        let mut labels = Vec::new();
        for name in names {
            let label = mock_repo
                .labels
                .iter()
                .find(|l| &l.name == name)
                .cloned()
                .ok_or_else(|| TrackerError::NotFound(format!("label '{}'", name)))?;
            labels.push(label);
        }

        let issue = mock_repo
            .issues
            .iter_mut()
            .find(|i| i.number == number)
            .ok_or_else(|| TrackerError::NotFound(format!("issue {}#{}", repo, number)))?;
        for label in labels {
            if !issue.labels.iter().any(|l| l.name == label.name) {
                issue.labels.push(label);
            }
        }
        Ok(())
    }
    fn insert_label(&self, repo: &RepoRef, label: &Label) -> Result<()> {
        if self.failures.create_label.contains(&label.name) {
            return Err(TrackerError::Api {
                status: 422,
                message: format!("Label '{}' rejected", label.name),
            });
        }

        let mut state = self.lock();
        let mock_repo = state
            .repos
            .get_mut(repo)
            .ok_or_else(|| TrackerError::NotFound(format!("repository {}", repo)))?;
        if mock_repo.labels.iter().any(|l| l.name == label.name) {
            return Err(TrackerError::Api {
                status: 422,
                message: format!("Label '{}' already exists", label.name),
            });
        }
        mock_repo.labels.push(label.clone());
        Ok(())
    }
}

impl IssueTracker for MockTracker {
    fn list_issues(&self, repo: &RepoRef) -> Result<Vec<Issue>> {
        let result = if self.failures.list_issues {
            Err(TrackerError::Http("connection refused".to_string()))
        } else {
            self.lock()
                .repos
                .get(repo)
                .map(|r| r.issues.clone())
                .ok_or_else(|| TrackerError::NotFound(format!("repository {}", repo)))
        };
        self.log_call("list_issues", vec![repo.to_string()], result)
    }

    fn transfer_issue(
        &self,
        number: u64,
        source: &RepoRef,
        target: &RepoRef,
    ) -> Result<Option<u64>> {
        let result = self.transfer(number, source, target);
        self.log_call(
            "transfer_issue",
            vec![number.to_string(), source.to_string(), target.to_string()],
            result,
        )
    }

    fn add_labels(&self, repo: &RepoRef, number: u64, names: &[String]) -> Result<()> {
        let result = self.apply_labels(repo, number, names);
        self.log_call(
            "add_labels",
            vec![repo.to_string(), number.to_string(), names.join(",")],
            result,
        )
    }

    fn list_labels(&self, repo: &RepoRef) -> Result<Vec<String>> {
        let result = if self.failures.list_labels {
            Err(TrackerError::Http("connection refused".to_string()))
        } else if self.lock().repos.contains_key(repo) {
            Ok(self.label_names(repo))
        } else {
            Err(TrackerError::NotFound(format!("repository {}", repo)))
        };
        self.log_call("list_labels", vec![repo.to_string()], result)
    }

    fn create_label(&self, repo: &RepoRef, label: &Label) -> Result<()> {
        let result = self.insert_label(repo, label);
        self.log_call("create_label", vec![repo.to_string(), label.name.clone()], result)
    }
}

/// Read the call log written for a scenario file
pub fn read_call_log(scenario_path: &Path) -> Vec<CallLogEntry> {
    let content = std::fs::read_to_string(call_log_path(scenario_path)).unwrap_or_default();
    content
        .lines()
        .filter_map(|line| serde_json::from_str(line).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracker_core::IssueState;

    fn old() -> RepoRef {
        RepoRef::new("octo", "old")
    }

    fn new() -> RepoRef {
        RepoRef::new("octo", "new")
    }

    fn tracker() -> MockTracker {
        MockTracker::new()
            .with_repo(
                old(),
                vec![Issue::new(4, "", IssueState::Open).with_label(Label::new("bug", "d73a4a"))],
                vec![Label::new("bug", "d73a4a")],
            )
            .with_repo(
                new(),
                vec![Issue::new(10, "", IssueState::Open)],
                vec![Label::new("bug", "d73a4a")],
            )
    }

    #[test]
    fn test_transfer_moves_issue_and_drops_labels() {
        let tracker = tracker();

        let new_number = tracker.transfer_issue(4, &old(), &new()).unwrap();

        assert_eq!(new_number, Some(11));
        assert!(tracker.issues(&old()).is_empty());
        let moved = &tracker.issues(&new())[1];
        assert_eq!(moved.number, 11);
        assert!(moved.labels.is_empty());
        assert_eq!(tracker.origin_of(&new(), 11), Some(4));
    }

    #[test]
    fn test_transfer_twice_is_refused() {
        let tracker = tracker();
        tracker.transfer_issue(4, &old(), &new()).unwrap();

        let err = tracker.transfer_issue(4, &old(), &new()).unwrap_err();
        assert!(matches!(err, TrackerError::NotFound(_)));
    }

    #[test]
    fn test_add_labels_requires_existing_label() {
        let tracker = tracker();

        tracker
            .add_labels(&new(), 10, &["bug".to_string()])
            .unwrap();
        let err = tracker
            .add_labels(&new(), 10, &["missing".to_string()])
            .unwrap_err();

        assert!(matches!(err, TrackerError::NotFound(_)));
        assert_eq!(tracker.issues(&new())[0].label_names(), vec!["bug"]);
    }

    #[test]
    fn test_flaky_add_labels_recovers() {
        let tracker = tracker().with_failures(FailureRules {
            add_labels_flaky: 1,
            ..Default::default()
        });

        assert!(tracker.add_labels(&new(), 10, &["bug".to_string()]).is_err());
        assert!(tracker.add_labels(&new(), 10, &["bug".to_string()]).is_ok());
    }

    #[test]
    fn test_create_label_duplicate_is_rejected() {
        let tracker = tracker();

        tracker
            .create_label(&new(), &Label::new("docs", "0075ca"))
            .unwrap();
        assert!(tracker
            .create_label(&new(), &Label::new("docs", "0075ca"))
            .is_err());
        assert_eq!(tracker.label_names(&new()), vec!["bug", "docs"]);
    }

    #[test]
    fn test_calls_are_logged_with_errors() {
        let tracker = tracker().with_failures(FailureRules {
            transfer: vec![4],
            ..Default::default()
        });

        let _ = tracker.list_labels(&new());
        let _ = tracker.transfer_issue(4, &old(), &new());

        let calls = tracker.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].method, "list_labels");
        assert!(calls[0].error.is_none());
        assert_eq!(calls[1].args, vec!["4", "octo/old", "octo/new"]);
        assert!(calls[1].error.is_some());
    }

    #[test]
    fn test_from_file_writes_call_log() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scenario.toml");
        std::fs::write(&path, "[[repos]]\nname = \"octo/new\"\n").unwrap();

        let tracker = MockTracker::from_file(&path).unwrap();
        tracker.list_labels(&new()).unwrap();

        let log = read_call_log(&path);
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].method, "list_labels");
    }
}
