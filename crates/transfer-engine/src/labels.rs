use std::collections::HashSet;
use tracing::{info, warn};
use tracker_core::{Issue, IssueTracker, Label};

use crate::context::BatchContext;
use crate::report::LabelFailure;

/// Distinct labels used anywhere in the batch, by name, in first-seen order
///
/// When two issues carry a label with the same name but different color or
/// description, the first one seen wins.
pub fn batch_labels(issues: &[Issue]) -> Vec<Label> {
    let mut seen = HashSet::new();
    issues
        .iter()
        .flat_map(|issue| issue.labels.iter())
        .filter(|label| seen.insert(label.name.clone()))
        .cloned()
        .collect()
}

/// Labels whose names are absent from `existing`
pub fn missing_labels<'a>(existing: &[String], labels: &'a [Label]) -> Vec<&'a Label> {
    let existing: HashSet<&str> = existing.iter().map(String::as_str).collect();
    labels
        .iter()
        .filter(|label| !existing.contains(label.name.as_str()))
        .collect()
}

/// Create every label in `labels` that the target repository lacks
///
/// Queries the target once. Failures are per label and never stop the run:
/// each one is logged and returned. If the query itself fails nothing can be
/// compared, so every label is reported as failed.
pub fn reconcile_labels(
    tracker: &dyn IssueTracker,
    ctx: &BatchContext,
    labels: &[Label],
) -> Vec<LabelFailure> {
    if labels.is_empty() {
        return Vec::new();
    }

    let existing = match tracker.list_labels(&ctx.target) {
        Ok(existing) => existing,
        Err(e) => {
            warn!(repo = %ctx.target, error = %e, "Failed to list labels");
            return labels
                .iter()
                .map(|label| LabelFailure {
                    name: label.name.clone(),
                    reason: format!("could not list labels in {}: {}", ctx.target, e),
                })
                .collect();
        }
    };

    let mut failures = Vec::new();
    for label in missing_labels(&existing, labels) {
        match tracker.create_label(&ctx.target, label) {
            Ok(()) => info!(label = %label.name, repo = %ctx.target, "Created label"),
            Err(e) => {
                warn!(label = %label.name, error = %e, "Failed to create label");
                failures.push(LabelFailure {
                    name: label.name.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }
    failures
}
