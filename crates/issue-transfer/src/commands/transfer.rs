use crate::cli::{OutputFormat, TransferArgs};
use crate::commands::Status;
use crate::output::{output_note, output_result, TransferReport};
use anyhow::{Context, Result};
use tracker_core::IssueTracker;
use transfer_engine::{fetch_batch, run_batch, BatchContext, IssueFilter, TransferPolicy};

pub fn handle_transfer(
    tracker: &dyn IssueTracker,
    args: &TransferArgs,
    policy: TransferPolicy,
    format: OutputFormat,
) -> Result<Status> {
    let (source, target) = args.batch.repos()?;
    let filter = args.batch.filter();
    let ctx = BatchContext::new(source, target).with_policy(policy);

    if filter == IssueFilter::Open {
        output_note(
            "Only open issues will be transferred. Pass --all to include closed ones.",
            format,
        );
    }

    let issues = fetch_batch(tracker, &ctx.source, filter)
        .with_context(|| format!("Cannot transfer from {}", ctx.source))?;
    output_note(
        &format!("Found {} issues to transfer from {}", issues.len(), ctx.source),
        format,
    );

    let result = run_batch(tracker, &ctx, &issues);
    let status = if result.is_success() {
        Status::Success
    } else {
        Status::Partial
    };

    output_result(
        &TransferReport {
            source: ctx.source,
            target: ctx.target,
            include_closed: filter == IssueFilter::All,
            result,
        },
        format,
    );
    Ok(status)
}
