use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracker_core::{Issue, IssueState, RepoRef};

use crate::retry::RetryPolicy;

/// How the batch is ordered before execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStrategy {
    /// Stable two-bucket partition: issues without references first
    #[default]
    Partition,
    /// Dependency order over in-batch references; cycles broken in input order
    Topological,
}

/// Tunables for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferPolicy {
    pub ordering: OrderStrategy,
    /// Wait before the first label edit on a freshly transferred issue
    pub settle_delay: Duration,
    pub label_retry: RetryPolicy,
}

impl Default for TransferPolicy {
    fn default() -> Self {
        Self {
            ordering: OrderStrategy::default(),
            settle_delay: Duration::from_secs(2),
            label_retry: RetryPolicy::default(),
        }
    }
}

impl TransferPolicy {
    /// No waiting anywhere and a single label attempt
    pub fn immediate() -> Self {
        Self {
            ordering: OrderStrategy::default(),
            settle_delay: Duration::ZERO,
            label_retry: RetryPolicy::once(),
        }
    }
}

/// Everything a run needs to know, passed by reference to each stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchContext {
    pub source: RepoRef,
    pub target: RepoRef,
    pub policy: TransferPolicy,
}

impl BatchContext {
    pub fn new(source: RepoRef, target: RepoRef) -> Self {
        Self {
            source,
            target,
            policy: TransferPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: TransferPolicy) -> Self {
        self.policy = policy;
        self
    }
}

/// Which source issues make up the batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IssueFilter {
    #[default]
    Open,
    All,
}

impl IssueFilter {
    pub fn matches(&self, issue: &Issue) -> bool {
        match self {
            IssueFilter::Open => issue.state == IssueState::Open,
            IssueFilter::All => true,
        }
    }
}
