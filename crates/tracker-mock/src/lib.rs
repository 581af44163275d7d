//! In-memory issue tracker for transfer testing
//!
//! This crate provides a stateful implementation of the `IssueTracker` trait.
//! Issues actually move between repositories, labels are created and attached,
//! and chosen operations can be made to fail. It's designed for:
//!
//! 1. **Engine Testing**: Exercise ordering, label reconciliation and failure isolation
//! 2. **CLI Testing**: Run the binary end-to-end without a real tracker
//! 3. **Dry Rehearsals**: Try a migration against a fixture before touching GitHub
//!
//! # Usage
//!
//! Set the `ISSUE_TRANSFER_MOCK_FILE` environment variable to a scenario file and
//! select the mock backend:
//!
//! ```bash
//! ISSUE_TRANSFER_MOCK_FILE=./scenario.toml issue-transfer -b mock transfer octo old new
//! ```
//!
//! # Scenario Structure
//!
//! ```toml
//! [[repos]]
//! name = "octo/old"
//! issues = [{ number = 1, body = "blocks #2", state = "OPEN", labels = [{ name = "bug", color = "d73a4a" }] }]
//!
//! [[repos]]
//! name = "octo/new"
//!
//! [failures]
//! transfer = [5]
//! ```
//!
//! Every call is recorded; when loaded from a file, calls are also appended to
//! `<scenario>.calls.jsonl` next to it.

mod client;
mod scenario;

pub use client::{read_call_log, CallLogEntry, MockTracker};
pub use scenario::{call_log_path, FailureRules, MockRepoFixture, MockScenario, ScenarioError};

/// Environment variable naming the scenario file for the mock backend
pub const MOCK_FILE_ENV: &str = "ISSUE_TRANSFER_MOCK_FILE";
