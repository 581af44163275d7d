use crate::cli::{BatchArgs, OutputFormat};
use crate::output::output_result;
use anyhow::{Context, Result};
use tracker_core::IssueTracker;
use transfer_engine::{fetch_batch, plan_batch, BatchContext, TransferPolicy};

pub fn handle_plan(
    tracker: &dyn IssueTracker,
    args: &BatchArgs,
    policy: TransferPolicy,
    format: OutputFormat,
) -> Result<()> {
    let (source, target) = args.repos()?;
    let ctx = BatchContext::new(source, target).with_policy(policy);

    let issues = fetch_batch(tracker, &ctx.source, args.filter())
        .with_context(|| format!("Cannot plan transfer from {}", ctx.source))?;
    let plan = plan_batch(tracker, &ctx, &issues)?;

    output_result(&plan, format);
    Ok(())
}
