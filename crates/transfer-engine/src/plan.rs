use serde::Serialize;
use tracker_core::{Issue, IssueTracker, RepoRef};

use crate::context::BatchContext;
use crate::error::TransferError;
use crate::labels::{batch_labels, missing_labels};
use crate::references::{build_reference_map, ReferenceMap};
use crate::sequencer::sequence;

/// What a run would do, computed without writing anything
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferPlan {
    pub source: RepoRef,
    pub target: RepoRef,
    /// Labels the target lacks, in first-seen order
    pub labels_to_create: Vec<String>,
    /// Source issue numbers in execution order
    pub order: Vec<u64>,
    pub references: ReferenceMap,
}

/// Build the plan for `issues`
///
/// Reads the target's labels once when the batch uses any; unlike a real run,
/// a failure to read them is an error since the plan would be meaningless.
pub fn plan_batch(
    tracker: &dyn IssueTracker,
    ctx: &BatchContext,
    issues: &[Issue],
) -> Result<TransferPlan, TransferError> {
    let labels = batch_labels(issues);
    let labels_to_create = if labels.is_empty() {
        Vec::new()
    } else {
        let existing = tracker
            .list_labels(&ctx.target)
            .map_err(|e| TransferError::ListLabels {
                repo: ctx.target.clone(),
                source: e,
            })?;
        missing_labels(&existing, &labels)
            .into_iter()
            .map(|label| label.name.clone())
            .collect()
    };

    let references = build_reference_map(issues);
    let order = sequence(issues, &references, ctx.policy.ordering)
        .into_iter()
        .map(|issue| issue.number)
        .collect();

    Ok(TransferPlan {
        source: ctx.source.clone(),
        target: ctx.target.clone(),
        labels_to_create,
        order,
        references,
    })
}
