use chrono::{DateTime, Utc};
use serde::Serialize;
use tracker_core::Issue;

/// What happened to one issue
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferOutcome {
    /// The issue now lives in the target; its new number if the tracker said so
    Transferred { new_number: Option<u64> },
    /// The transfer or the label step failed
    Failed { reason: String },
}

/// A label that could not be created in the target repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelFailure {
    pub name: String,
    pub reason: String,
}

/// An issue recorded as unsuccessful, with why
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueFailure {
    pub number: u64,
    pub reason: String,
}

/// Result of one batch run
///
/// `successful` and `unsuccessful` together hold every input issue number
/// exactly once, each in processing order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchResult {
    pub successful: Vec<u64>,
    pub unsuccessful: Vec<u64>,
    pub failures: Vec<IssueFailure>,
    pub label_failures: Vec<LabelFailure>,
    /// Transferred issues with labels that were never applied because the new
    /// issue number was unknown
    pub unlabeled: Vec<u64>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl BatchResult {
    pub fn total(&self) -> usize {
        self.successful.len() + self.unsuccessful.len()
    }

    pub fn is_success(&self) -> bool {
        self.unsuccessful.is_empty()
    }
}

/// Accumulates outcomes as the executor produces them
#[derive(Debug)]
pub struct BatchReporter {
    successful: Vec<u64>,
    unsuccessful: Vec<u64>,
    failures: Vec<IssueFailure>,
    label_failures: Vec<LabelFailure>,
    unlabeled: Vec<u64>,
    started_at: DateTime<Utc>,
}

impl Default for BatchReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl BatchReporter {
    pub fn new() -> Self {
        Self {
            successful: Vec::new(),
            unsuccessful: Vec::new(),
            failures: Vec::new(),
            label_failures: Vec::new(),
            unlabeled: Vec::new(),
            started_at: Utc::now(),
        }
    }

    pub fn add_label_failures(&mut self, failures: Vec<LabelFailure>) {
        self.label_failures.extend(failures);
    }

    pub fn record(&mut self, issue: &Issue, outcome: &TransferOutcome) {
        match outcome {
            TransferOutcome::Transferred { new_number } => {
                if new_number.is_none() && !issue.labels.is_empty() {
                    self.unlabeled.push(issue.number);
                }
                self.successful.push(issue.number);
            }
            TransferOutcome::Failed { reason } => {
                self.unsuccessful.push(issue.number);
                self.failures.push(IssueFailure {
                    number: issue.number,
                    reason: reason.clone(),
                });
            }
        }
    }

    pub fn finish(self) -> BatchResult {
        BatchResult {
            successful: self.successful,
            unsuccessful: self.unsuccessful,
            failures: self.failures,
            label_failures: self.label_failures,
            unlabeled: self.unlabeled,
            started_at: self.started_at,
            finished_at: Utc::now(),
        }
    }
}
