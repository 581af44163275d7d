//! Scenario definition and loading
//!
//! A scenario seeds the mock with repositories, issues and labels, and says
//! which operations should fail.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracker_core::{Issue, Label, RepoRef};

/// Errors that can occur when loading a scenario
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("Failed to read scenario {0}: {1}")]
    Io(PathBuf, std::io::Error),

    #[error("Failed to parse scenario {0}: {1}")]
    Parse(PathBuf, toml::de::Error),
}

/// Complete mock setup
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MockScenario {
    #[serde(default)]
    pub repos: Vec<MockRepoFixture>,

    #[serde(default)]
    pub failures: FailureRules,
}

/// One repository and its initial contents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MockRepoFixture {
    /// Repository in `owner/name` form
    pub name: RepoRef,

    #[serde(default)]
    pub issues: Vec<Issue>,

    #[serde(default)]
    pub labels: Vec<Label>,
}

/// Which operations should fail
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FailureRules {
    /// Fail every `list_issues` call
    #[serde(default)]
    pub list_issues: bool,

    /// Fail every `list_labels` call
    #[serde(default)]
    pub list_labels: bool,

    /// Label names whose creation fails
    #[serde(default)]
    pub create_label: Vec<String>,

    /// Source issue numbers whose transfer fails
    #[serde(default)]
    pub transfer: Vec<u64>,

    /// Source issue numbers whose transfer succeeds without reporting the new number
    #[serde(default)]
    pub hide_new_number: Vec<u64>,

    /// Source issue numbers for which every `add_labels` on the moved issue fails
    #[serde(default)]
    pub add_labels: Vec<u64>,

    /// Number of initial `add_labels` calls that fail before any succeeds
    #[serde(default)]
    pub add_labels_flaky: u32,
}

impl MockScenario {
    /// Load a scenario from a TOML file
    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ScenarioError::Io(path.to_path_buf(), e))?;

        toml::from_str(&content).map_err(|e| ScenarioError::Parse(path.to_path_buf(), e))
    }
}

/// Where calls are logged for a scenario loaded from `path`
pub fn call_log_path(path: &Path) -> PathBuf {
    path.with_extension("calls.jsonl")
}
