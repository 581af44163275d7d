use std::collections::HashSet;
use tracing::warn;
use tracker_core::Issue;

use crate::context::OrderStrategy;
use crate::references::ReferenceMap;

/// Order the batch so referenced issues move before the issues mentioning them
///
/// The result is always a permutation of `issues`.
pub fn sequence<'a>(
    issues: &'a [Issue],
    references: &ReferenceMap,
    strategy: OrderStrategy,
) -> Vec<&'a Issue> {
    match strategy {
        OrderStrategy::Partition => partition(issues, references),
        OrderStrategy::Topological => topological(issues, references),
    }
}

/// Stable partition on "has outgoing references"
///
/// Correct for one level of references only: in a chain A -> B -> C, A and B
/// keep their relative input order.
fn partition<'a>(issues: &'a [Issue], references: &ReferenceMap) -> Vec<&'a Issue> {
    let mut ordered: Vec<&Issue> = issues.iter().collect();
    ordered.sort_by_key(|issue| references.contains_key(&issue.number));
    ordered
}

/// Dependency order over references that stay inside the batch
///
/// Each pass walks the remaining issues in input order and emits every issue
/// whose in-batch references are already emitted. A pass that emits nothing
/// means a cycle; the first remaining issue is then emitted regardless.
fn topological<'a>(issues: &'a [Issue], references: &ReferenceMap) -> Vec<&'a Issue> {
    let in_batch: HashSet<u64> = issues.iter().map(|i| i.number).collect();
    let dependencies = |issue: &Issue| -> Vec<u64> {
        references
            .get(&issue.number)
            .map(|refs| {
                refs.iter()
                    .copied()
                    .filter(|n| *n != issue.number && in_batch.contains(n))
                    .collect()
            })
            .unwrap_or_default()
    };

    let mut remaining: Vec<(&Issue, Vec<u64>)> =
        issues.iter().map(|i| (i, dependencies(i))).collect();
    let mut emitted: HashSet<u64> = HashSet::new();
    let mut ordered = Vec::with_capacity(issues.len());

    while !remaining.is_empty() {
        let before = ordered.len();
        remaining.retain(|(issue, deps)| {
            if deps.iter().all(|d| emitted.contains(d)) {
                emitted.insert(issue.number);
                ordered.push(*issue);
                false
            } else {
                true
            }
        });

        if ordered.len() == before {
            let cycle: Vec<u64> = remaining.iter().map(|(i, _)| i.number).collect();
            let (issue, _) = remaining.remove(0);
            warn!(?cycle, breaking_at = issue.number, "Reference cycle in batch");
            emitted.insert(issue.number);
            ordered.push(issue);
        }
    }

    ordered
}
