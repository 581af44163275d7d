use crate::cli::{Backend, Cli, Commands};
use anyhow::{anyhow, Result};
use directories::{BaseDirs, ProjectDirs};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use transfer_engine::{OrderStrategy, RetryPolicy, TransferPolicy};

/// Main configuration structure
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    pub backend: Option<Backend>,
    /// GitHub API base URL
    pub api_url: String,
    pub token: Option<String>,
    /// Program run by the gh backend
    pub gh_path: PathBuf,
    /// Upper bound on issues and labels listed by the gh backend
    pub list_limit: usize,
    /// Scenario file for the mock backend
    pub mock_file: Option<PathBuf>,
    #[serde(default)]
    pub transfer: TransferConfig,
}

/// Timing and ordering of a run
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct TransferConfig {
    pub ordering: OrderStrategy,
    pub settle_delay_ms: u64,
    pub label_attempts: u32,
    pub backoff_ms: u64,
    pub max_backoff_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: None,
            api_url: "https://api.github.com".to_string(),
            token: None,
            gh_path: PathBuf::from("gh"),
            list_limit: github_backend::gh_cli::DEFAULT_LIST_LIMIT,
            mock_file: None,
            transfer: TransferConfig::default(),
        }
    }
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            ordering: OrderStrategy::default(),
            settle_delay_ms: 2000,
            label_attempts: 3,
            backoff_ms: 1000,
            max_backoff_ms: 8000,
        }
    }
}

impl TransferConfig {
    pub fn policy(&self) -> TransferPolicy {
        TransferPolicy {
            ordering: self.ordering,
            settle_delay: Duration::from_millis(self.settle_delay_ms),
            label_retry: RetryPolicy {
                max_attempts: self.label_attempts.max(1),
                initial_backoff: Duration::from_millis(self.backoff_ms),
                max_backoff: Duration::from_millis(self.max_backoff_ms),
            },
        }
    }
}

impl Config {
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = config_path {
            if !path.exists() {
                return Err(anyhow!("Config file not found: {}", path.display()));
            }
        }

        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));
        for path in config_paths(config_path) {
            if path.exists() {
                figment = figment.merge(Toml::file(path));
            }
        }
        // ISSUE_TRANSFER_TRANSFER__SETTLE_DELAY_MS -> transfer.settle_delay_ms
        figment = figment.merge(Env::prefixed("ISSUE_TRANSFER_").split("__"));

        let mut config: Config = figment
            .extract()
            .map_err(|e| anyhow!("Failed to load config: {}", e))?;

        if config.token.is_none() {
            config.token = ["GITHUB_TOKEN", "GH_TOKEN"]
                .iter()
                .find_map(|var| std::env::var(var).ok().filter(|t| !t.is_empty()));
        }

        Ok(config)
    }

    /// Command-line flags win over every other source
    pub fn merge_with_cli(&mut self, cli: &Cli) {
        if let Some(backend) = cli.backend {
            self.backend = Some(backend);
        }
        if let Some(url) = &cli.api_url {
            self.api_url = url.clone();
        }
        if let Some(token) = &cli.token {
            self.token = Some(token.clone());
        }

        match &cli.command {
            Commands::Transfer(args) => {
                if let Some(ordering) = args.batch.ordering {
                    self.transfer.ordering = ordering.into();
                }
                if let Some(ms) = args.settle_delay_ms {
                    self.transfer.settle_delay_ms = ms;
                }
                if let Some(attempts) = args.label_attempts {
                    self.transfer.label_attempts = attempts;
                }
            }
            Commands::Plan(args) => {
                if let Some(ordering) = args.ordering {
                    self.transfer.ordering = ordering.into();
                }
            }
            Commands::Completions { .. } => {}
        }
    }

    pub fn backend(&self) -> Backend {
        self.backend.unwrap_or_default()
    }

    pub fn validate(&self) -> Result<()> {
        match self.backend() {
            Backend::Api if self.token.is_none() => Err(anyhow!(
                "GitHub token not configured. Set via --token, ISSUE_TRANSFER_TOKEN, GITHUB_TOKEN or config file"
            )),
            Backend::Mock if self.mock_file.is_none() => Err(anyhow!(
                "Mock scenario not configured. Set via {} or mock_file in the config file",
                tracker_mock::MOCK_FILE_ENV
            )),
            _ => Ok(()),
        }
    }
}

fn config_paths(explicit: Option<&Path>) -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Some(path) = explicit {
        paths.push(path.to_path_buf());
        return paths;
    }

    if let Some(path) = get_project_config_path() {
        push_unique(&mut paths, path);
    }
    if let Some(path) = get_xdg_config_path() {
        push_unique(&mut paths, path);
    }
    if let Some(path) = get_local_config_path() {
        push_unique(&mut paths, path);
    }

    paths
}

fn push_unique(paths: &mut Vec<PathBuf>, path: PathBuf) {
    if !paths.contains(&path) {
        paths.push(path);
    }
}

fn get_project_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "issue-transfer").map(|d| d.config_dir().join("config.toml"))
}

fn get_xdg_config_path() -> Option<PathBuf> {
    if let Some(dir) = std::env::var_os("XDG_CONFIG_HOME") {
        return Some(PathBuf::from(dir).join("issue-transfer").join("config.toml"));
    }

    BaseDirs::new().map(|dirs| {
        dirs.home_dir()
            .join(".config")
            .join("issue-transfer")
            .join("config.toml")
    })
}

fn get_local_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|dir| dir.join("issue-transfer.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use serial_test::serial;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), content).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.backend(), Backend::Gh);
        assert_eq!(config.transfer.settle_delay_ms, 2000);

        let policy = config.transfer.policy();
        assert_eq!(policy.settle_delay, Duration::from_secs(2));
        assert_eq!(policy.label_retry, RetryPolicy::default());
        assert_eq!(policy.ordering, OrderStrategy::Partition);
    }

    #[test]
    #[serial]
    fn test_load_explicit_file() {
        let file = write_config(
            r#"
backend = "mock"
mock_file = "/tmp/scenario.toml"

[transfer]
ordering = "topological"
settle_delay_ms = 0
"#,
        );

        let config = Config::load(Some(file.path())).unwrap();

        assert_eq!(config.backend(), Backend::Mock);
        assert_eq!(config.mock_file, Some(PathBuf::from("/tmp/scenario.toml")));
        assert_eq!(config.transfer.ordering, OrderStrategy::Topological);
        assert_eq!(config.transfer.settle_delay_ms, 0);
        assert_eq!(config.transfer.label_attempts, 3);
        assert_eq!(config.list_limit, 1000);
    }

    #[test]
    #[serial]
    fn test_env_overrides_file() {
        let file = write_config("token = \"from-file\"\n[transfer]\nsettle_delay_ms = 100\n");
        std::env::set_var("ISSUE_TRANSFER_TRANSFER__SETTLE_DELAY_MS", "10");
        std::env::set_var("ISSUE_TRANSFER_TOKEN", "from-env");

        let config = Config::load(Some(file.path()));

        std::env::remove_var("ISSUE_TRANSFER_TRANSFER__SETTLE_DELAY_MS");
        std::env::remove_var("ISSUE_TRANSFER_TOKEN");
        let config = config.unwrap();
        assert_eq!(config.transfer.settle_delay_ms, 10);
        assert_eq!(config.token.as_deref(), Some("from-env"));
    }

    #[test]
    #[serial]
    fn test_token_falls_back_to_github_token() {
        let file = write_config("");
        let saved = std::env::var("GITHUB_TOKEN").ok();
        std::env::set_var("GITHUB_TOKEN", "ghp_fallback");

        let config = Config::load(Some(file.path()));

        match saved {
            Some(token) => std::env::set_var("GITHUB_TOKEN", token),
            None => std::env::remove_var("GITHUB_TOKEN"),
        }
        assert_eq!(config.unwrap().token.as_deref(), Some("ghp_fallback"));
    }

    #[test]
    fn test_missing_explicit_file() {
        let err = Config::load(Some(Path::new("/nonexistent/issue-transfer.toml"))).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_cli_flags_override() {
        let mut config = Config::default();
        let cli = Cli::parse_from([
            "issue-transfer",
            "--backend",
            "api",
            "--token",
            "secret",
            "transfer",
            "octo",
            "old",
            "new",
            "--ordering",
            "topological",
            "--settle-delay-ms",
            "5",
            "--label-attempts",
            "7",
        ]);

        config.merge_with_cli(&cli);

        assert_eq!(config.backend(), Backend::Api);
        assert_eq!(config.token.as_deref(), Some("secret"));
        let policy = config.transfer.policy();
        assert_eq!(policy.ordering, OrderStrategy::Topological);
        assert_eq!(policy.settle_delay, Duration::from_millis(5));
        assert_eq!(policy.label_retry.max_attempts, 7);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate() {
        let api = Config {
            backend: Some(Backend::Api),
            ..Config::default()
        };
        assert!(api.validate().unwrap_err().to_string().contains("token"));

        let mock = Config {
            backend: Some(Backend::Mock),
            ..Config::default()
        };
        assert!(mock.validate().is_err());

        assert!(Config::default().validate().is_ok());
    }
}
