use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};
use tracker_core::RepoRef;
use ureq::Agent;

use crate::error::{GitHubError, Result};
use crate::models::*;
use crate::pagination::{PAGE_SIZE, fetch_all_pages};

type Response = ureq::http::Response<ureq::Body>;

/// GitHub REST/GraphQL API client
///
/// Not bound to a single repository: every operation names the repository it
/// acts on, so one client serves both sides of a transfer.
pub struct GitHubClient {
    agent: Agent,
    base_url: String,
    token: String,
}

impl GitHubClient {
    /// Create a new GitHub client targeting api.github.com
    pub fn new(token: &str) -> Self {
        Self::with_base_url("https://api.github.com", token)
    }

    /// Create a new GitHub client with a custom base URL (for testing)
    pub fn with_base_url(base_url: &str, token: &str) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(30)))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        }
    }

    /// Build a repo-scoped URL
    fn repo_url(&self, repo: &RepoRef, path: &str) -> String {
        format!(
            "{}/repos/{}/{}{}",
            self.base_url, repo.owner, repo.name, path
        )
    }

    /// Build the Authorization header value
    fn auth_header(&self) -> String {
        format!("Bearer {}", self.token)
    }

    fn get(&self, url: &str) -> Result<Response> {
        debug!(%url, "GET");
        let response = self
            .agent
            .get(url)
            .header("Authorization", &self.auth_header())
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .call()
            .map_err(GitHubError::Http)?;

        self.check_response(response)
    }

    fn post<B: Serialize>(&self, url: &str, body: &B) -> Result<Response> {
        debug!(%url, "POST");
        let response = self
            .agent
            .post(url)
            .header("Authorization", &self.auth_header())
            .header("Content-Type", "application/json")
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .send_json(body)
            .map_err(GitHubError::Http)?;

        self.check_response(response)
    }

    /// Check response status and return error if not successful
    fn check_response(&self, mut response: Response) -> Result<Response> {
        let status = response.status().as_u16();

        if (200..300).contains(&status) {
            return Ok(response);
        }

        // Detect rate limiting: 403 with x-ratelimit-remaining: 0
        if status == 403 || status == 429 {
            if let Some(remaining) = response.headers().get("x-ratelimit-remaining") {
                if remaining.to_str().unwrap_or("") == "0" {
                    return Err(GitHubError::RateLimited);
                }
            }
        }

        let body = response
            .body_mut()
            .read_to_string()
            .unwrap_or_else(|_| String::new());

        let message = if let Ok(error_response) = serde_json::from_str::<serde_json::Value>(&body) {
            error_response
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or(&body)
                .to_string()
        } else if body.is_empty() {
            format!("HTTP {}", status)
        } else {
            body
        };

        match status {
            401 => Err(GitHubError::Unauthorized),
            404 => Err(GitHubError::NotFound(message)),
            _ => Err(GitHubError::Api { status, message }),
        }
    }

    // ==================== Issue Operations ====================

    /// Get an issue by number
    pub fn get_issue(&self, repo: &RepoRef, number: u64) -> Result<GitHubIssue> {
        let url = self.repo_url(repo, &format!("/issues/{}", number));
        let mut response = self.get(&url)?;
        let issue: GitHubIssue = response.body_mut().read_json()?;
        Ok(issue)
    }

    /// Fetch one page of the issue listing, pull requests included
    pub fn list_issues_page(&self, repo: &RepoRef, page: usize) -> Result<Vec<GitHubIssue>> {
        let url = format!(
            "{}?state=all&per_page={}&page={}",
            self.repo_url(repo, "/issues"),
            PAGE_SIZE,
            page
        );

        let mut response = self.get(&url)?;
        let issues: Vec<GitHubIssue> = response.body_mut().read_json()?;
        Ok(issues)
    }

    /// List every issue in the repository, open and closed
    ///
    /// Returns only actual issues, filtering out pull requests.
    pub fn list_issues(&self, repo: &RepoRef) -> Result<Vec<GitHubIssue>> {
        let issues = fetch_all_pages(|page| self.list_issues_page(repo, page), PAGE_SIZE)?;

        Ok(issues
            .into_iter()
            .filter(|i| !i.is_pull_request())
            .collect())
    }

    /// Move an issue to another repository via the GraphQL `transferIssue` mutation
    ///
    /// Returns `Ok(None)` if the mutation succeeded but its payload does not
    /// reveal the new issue number.
    pub fn transfer_issue(
        &self,
        number: u64,
        source: &RepoRef,
        target: &RepoRef,
    ) -> Result<Option<u64>> {
        let issue = self.get_issue(source, number)?;
        let target_repo = self.get_repo(target)?;

        let request = GraphQlRequest {
            query: TRANSFER_ISSUE_MUTATION,
            variables: TransferIssueVariables {
                issue_id: issue.node_id,
                repository_id: target_repo.node_id,
            },
        };

        let url = format!("{}/graphql", self.base_url);
        let mut response = self.post(&url, &request)?;
        let body = response.body_mut().read_to_string()?;

        let parsed: GraphQlResponse<TransferIssueData> = match serde_json::from_str(&body) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(issue = number, error = %e, "Unrecognized transfer response");
                return Ok(None);
            }
        };

        if !parsed.errors.is_empty() {
            let messages: Vec<&str> = parsed.errors.iter().map(|e| e.message.as_str()).collect();
            return Err(GitHubError::GraphQl(messages.join("; ")));
        }

        Ok(parsed.new_issue_number())
    }

    /// Add labels to an issue, returning the issue's full label set
    pub fn add_labels(
        &self,
        repo: &RepoRef,
        number: u64,
        names: &[String],
    ) -> Result<Vec<GitHubLabel>> {
        let url = self.repo_url(repo, &format!("/issues/{}/labels", number));
        let body = AddGitHubLabels {
            labels: names.to_vec(),
        };

        let mut response = self.post(&url, &body)?;
        let labels: Vec<GitHubLabel> = response.body_mut().read_json()?;
        Ok(labels)
    }

    // ==================== Repository Operations ====================

    /// Get a specific repository
    pub fn get_repo(&self, repo: &RepoRef) -> Result<GitHubRepo> {
        let url = format!("{}/repos/{}/{}", self.base_url, repo.owner, repo.name);
        let mut response = self.get(&url)?;
        let repo: GitHubRepo = response.body_mut().read_json()?;
        Ok(repo)
    }

    // ==================== Label Operations ====================

    /// Fetch one page of the repository's labels
    pub fn list_labels_page(&self, repo: &RepoRef, page: usize) -> Result<Vec<GitHubLabel>> {
        let url = format!(
            "{}?per_page={}&page={}",
            self.repo_url(repo, "/labels"),
            PAGE_SIZE,
            page
        );

        let mut response = self.get(&url)?;
        let labels: Vec<GitHubLabel> = response.body_mut().read_json()?;
        Ok(labels)
    }

    /// List all labels for the repository
    pub fn list_labels(&self, repo: &RepoRef) -> Result<Vec<GitHubLabel>> {
        fetch_all_pages(|page| self.list_labels_page(repo, page), PAGE_SIZE)
    }

    /// Create a label
    pub fn create_label(&self, repo: &RepoRef, label: &CreateGitHubLabel) -> Result<GitHubLabel> {
        let url = self.repo_url(repo, "/labels");
        let mut response = self.post(&url, label)?;
        let created: GitHubLabel = response.body_mut().read_json()?;
        Ok(created)
    }
}
