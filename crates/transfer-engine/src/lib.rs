//! Transfer orchestration
//!
//! Moves a batch of issues from one repository to another through any
//! [`IssueTracker`](tracker_core::IssueTracker):
//!
//! 1. **Label reconciliation** creates every label the batch uses that the
//!    target lacks, once, before any issue moves.
//! 2. **Sequencing** puts issues that others reference ahead of the issues
//!    referencing them.
//! 3. **Execution** transfers issues strictly one at a time, re-applies labels
//!    after a settle delay (with bounded retries), and isolates each issue's
//!    failure from the rest of the batch.
//! 4. **Reporting** partitions the batch into successful and unsuccessful
//!    issue numbers, in processing order.
//!
//! Only failing to list the source issues aborts a run; everything else
//! degrades to a per-item failure in the [`BatchResult`].

pub mod context;
pub mod error;
pub mod executor;
pub mod labels;
pub mod plan;
pub mod references;
pub mod report;
pub mod retry;
pub mod sequencer;

pub use context::{BatchContext, IssueFilter, OrderStrategy, TransferPolicy};
pub use error::TransferError;
pub use executor::{fetch_batch, run_batch, transfer_batch, transfer_one, transfer_repository};
pub use labels::{batch_labels, reconcile_labels};
pub use plan::{plan_batch, TransferPlan};
pub use references::{build_reference_map, extract_references, ReferenceMap};
pub use report::{BatchReporter, BatchResult, IssueFailure, LabelFailure, TransferOutcome};
pub use retry::RetryPolicy;
pub use sequencer::sequence;
