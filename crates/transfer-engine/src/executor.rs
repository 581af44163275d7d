use std::collections::HashSet;
use tracing::{info, info_span, warn};
use tracker_core::{Issue, IssueTracker, RepoRef};

use crate::context::{BatchContext, IssueFilter, TransferPolicy};
use crate::error::TransferError;
use crate::labels::{batch_labels, reconcile_labels};
use crate::references::{build_reference_map, ReferenceMap};
use crate::report::{BatchReporter, BatchResult, TransferOutcome};
use crate::sequencer::sequence;

/// Transfer one issue and re-apply its labels
///
/// Never fails: any tracker error becomes [`TransferOutcome::Failed`]. A label
/// failure after a successful transfer also counts as a failure, even though
/// the issue already lives in the target.
pub fn transfer_one(
    tracker: &dyn IssueTracker,
    ctx: &BatchContext,
    issue: &Issue,
    references: &ReferenceMap,
    batch_numbers: &HashSet<u64>,
) -> TransferOutcome {
    let new_number = match tracker.transfer_issue(issue.number, &ctx.source, &ctx.target) {
        Ok(new_number) => new_number,
        Err(e) => {
            warn!(issue = issue.number, error = %e, "Failed to transfer issue");
            return TransferOutcome::Failed {
                reason: e.to_string(),
            };
        }
    };

    match new_number {
        Some(n) => info!(issue = issue.number, new_number = n, target = %ctx.target, "Issue transferred"),
        None => info!(issue = issue.number, target = %ctx.target, "Issue transferred"),
    }

    if !issue.labels.is_empty() {
        match new_number {
            Some(n) => {
                if let Err(e) = apply_labels(tracker, ctx, issue, n) {
                    warn!(issue = issue.number, new_number = n, error = %e, "Failed to add labels");
                    return TransferOutcome::Failed {
                        reason: format!("transferred as #{} but labels failed: {}", n, e),
                    };
                }
            }
            None => warn!(
                issue = issue.number,
                labels = %issue.label_names().join(","),
                "New issue number unknown, labels not applied"
            ),
        }
    }

    if let Some(referenced) = references.get(&issue.number) {
        let in_batch: Vec<u64> = referenced
            .iter()
            .copied()
            .filter(|n| batch_numbers.contains(n))
            .collect();
        if !in_batch.is_empty() {
            info!(issue = issue.number, referenced = ?in_batch, "Transferred with referenced issues");
        }
    }

    TransferOutcome::Transferred { new_number }
}

/// Settle, then add labels under the retry policy
fn apply_labels(
    tracker: &dyn IssueTracker,
    ctx: &BatchContext,
    issue: &Issue,
    new_number: u64,
) -> tracker_core::Result<()> {
    let names = issue.label_names();
    std::thread::sleep(ctx.policy.settle_delay);

    ctx.policy.label_retry.run("add_labels", |_| {
        tracker.add_labels(&ctx.target, new_number, &names)
    })?;

    info!(new_number, labels = %names.join(","), "Added labels");
    Ok(())
}

/// Run a batch: reconcile labels, sequence, then transfer one issue at a time
pub fn run_batch(tracker: &dyn IssueTracker, ctx: &BatchContext, issues: &[Issue]) -> BatchResult {
    let _span = info_span!("batch", source = %ctx.source, target = %ctx.target).entered();
    let mut reporter = BatchReporter::new();

    let labels = batch_labels(issues);
    reporter.add_label_failures(reconcile_labels(tracker, ctx, &labels));

    let references = build_reference_map(issues);
    let batch_numbers: HashSet<u64> = issues.iter().map(|i| i.number).collect();

    for issue in sequence(issues, &references, ctx.policy.ordering) {
        let outcome = transfer_one(tracker, ctx, issue, &references, &batch_numbers);
        reporter.record(issue, &outcome);
    }

    reporter.finish()
}

/// Transfer `issues` from `source` to `target` with the default policy
pub fn transfer_batch(
    tracker: &dyn IssueTracker,
    source: &RepoRef,
    issues: &[Issue],
    target: &RepoRef,
) -> BatchResult {
    let ctx = BatchContext::new(source.clone(), target.clone()).with_policy(TransferPolicy::default());
    run_batch(tracker, &ctx, issues)
}

/// List the source repository and keep the issues `filter` selects
pub fn fetch_batch(
    tracker: &dyn IssueTracker,
    source: &RepoRef,
    filter: IssueFilter,
) -> Result<Vec<Issue>, TransferError> {
    let issues = tracker
        .list_issues(source)
        .map_err(|e| TransferError::ListIssues {
            repo: source.clone(),
            source: e,
        })?;
    info!(repo = %source, total = issues.len(), "Found issues");

    Ok(issues.into_iter().filter(|i| filter.matches(i)).collect())
}

/// Transfer every selected issue of the source repository
///
/// Failing to list the source is the only error; an empty selection returns
/// an empty result without touching the target.
pub fn transfer_repository(
    tracker: &dyn IssueTracker,
    ctx: &BatchContext,
    filter: IssueFilter,
) -> Result<BatchResult, TransferError> {
    let issues = fetch_batch(tracker, &ctx.source, filter)?;
    if issues.is_empty() {
        info!(repo = %ctx.source, "No issues to transfer");
    }
    Ok(run_batch(tracker, ctx, &issues))
}
