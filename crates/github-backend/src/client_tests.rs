//! Unit tests for GitHubClient using wiremock

#[cfg(test)]
mod tests {
    use crate::client::GitHubClient;
    use crate::error::GitHubError;
    use tracker_core::{IssueState, IssueTracker, Label, RepoRef, TrackerError};
    use wiremock::matchers::{body_json, body_string_contains, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn source() -> RepoRef {
        RepoRef::new("owner", "old")
    }

    fn target() -> RepoRef {
        RepoRef::new("owner", "new")
    }

    /// Helper to create a mock GitHub issue response
    fn mock_github_issue(number: u64, body: Option<&str>, state: &str) -> serde_json::Value {
        serde_json::json!({
            "id": 1000 + number,
            "node_id": format!("I_node{}", number),
            "number": number,
            "title": format!("Issue {}", number),
            "body": body,
            "state": state,
            "labels": [
                {"id": 1, "name": "bug", "color": "fc2929", "description": "Something isn't working"}
            ],
            "pull_request": null
        })
    }

    /// Helper to create a mock GitHub PR disguised as issue
    fn mock_github_pr(number: u64) -> serde_json::Value {
        serde_json::json!({
            "id": 2000 + number,
            "node_id": format!("PR_node{}", number),
            "number": number,
            "title": "A pull request",
            "body": "PR description",
            "state": "open",
            "labels": [],
            "pull_request": {
                "url": "https://api.github.com/repos/owner/old/pulls/99"
            }
        })
    }

    fn mock_github_repo() -> serde_json::Value {
        serde_json::json!({
            "id": 12345,
            "node_id": "R_target",
            "name": "new",
            "full_name": "owner/new"
        })
    }

    async fn mount_transfer_lookups(mock_server: &MockServer, number: u64) {
        Mock::given(method("GET"))
            .and(path(format!("/repos/owner/old/issues/{}", number)))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(mock_github_issue(number, None, "open")),
            )
            .mount(mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/repos/owner/new"))
            .respond_with(ResponseTemplate::new(200).set_body_json(mock_github_repo()))
            .mount(mock_server)
            .await;
    }

    #[tokio::test]
    async fn test_list_issues_filters_prs() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/owner/old/issues"))
            .and(query_param("state", "all"))
            .and(query_param("page", "1"))
            .and(header("Authorization", "Bearer test-token"))
            .and(header("Accept", "application/vnd.github+json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                mock_github_issue(1, Some("Blocks #2"), "open"),
                mock_github_pr(99),
                mock_github_issue(2, None, "closed")
            ])))
            .mount(&mock_server)
            .await;

        let client = GitHubClient::with_base_url(&mock_server.uri(), "test-token");
        let issues = IssueTracker::list_issues(&client, &source()).unwrap();

        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].number, 1);
        assert_eq!(issues[0].body, "Blocks #2");
        assert_eq!(issues[0].state, IssueState::Open);
        assert_eq!(issues[0].labels[0].name, "bug");
        assert_eq!(issues[1].number, 2);
        assert_eq!(issues[1].body, "");
        assert_eq!(issues[1].state, IssueState::Closed);
    }

    #[tokio::test]
    async fn test_list_issues_follows_pages() {
        let mock_server = MockServer::start().await;

        let first_page: Vec<serde_json::Value> = (1..=100)
            .map(|n| mock_github_issue(n, None, "open"))
            .collect();

        Mock::given(method("GET"))
            .and(path("/repos/owner/old/issues"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(first_page))
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/repos/owner/old/issues"))
            .and(query_param("page", "2"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([mock_github_issue(101, None, "open")])),
            )
            .mount(&mock_server)
            .await;

        let client = GitHubClient::with_base_url(&mock_server.uri(), "test-token");
        let issues = client.list_issues(&source()).unwrap();

        assert_eq!(issues.len(), 101);
        assert_eq!(issues[100].number, 101);
    }

    #[tokio::test]
    async fn test_list_labels_returns_names() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/owner/new/labels"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"id": 1, "name": "bug", "color": "fc2929", "description": null},
                {"id": 2, "name": "docs", "color": "0075ca", "description": "Documentation"}
            ])))
            .mount(&mock_server)
            .await;

        let client = GitHubClient::with_base_url(&mock_server.uri(), "test-token");
        let names = IssueTracker::list_labels(&client, &target()).unwrap();

        assert_eq!(names, vec!["bug".to_string(), "docs".to_string()]);
    }

    #[tokio::test]
    async fn test_create_label_sends_color_without_hash() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/repos/owner/new/labels"))
            .and(body_json(serde_json::json!({
                "name": "bug",
                "color": "fc2929",
                "description": "Broken"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "id": 7, "name": "bug", "color": "fc2929", "description": "Broken"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = GitHubClient::with_base_url(&mock_server.uri(), "test-token");
        let label = Label::new("bug", "#fc2929").with_description("Broken");
        IssueTracker::create_label(&client, &target(), &label).unwrap();
    }

    #[tokio::test]
    async fn test_create_label_conflict_is_api_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/repos/owner/new/labels"))
            .respond_with(ResponseTemplate::new(422).set_body_json(serde_json::json!({
                "message": "Validation Failed"
            })))
            .mount(&mock_server)
            .await;

        let client = GitHubClient::with_base_url(&mock_server.uri(), "test-token");
        let err = IssueTracker::create_label(&client, &target(), &Label::new("bug", "fc2929"))
            .unwrap_err();

        assert_eq!(
            err,
            TrackerError::Api {
                status: 422,
                message: "Validation Failed".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_transfer_issue_returns_new_number() {
        let mock_server = MockServer::start().await;
        mount_transfer_lookups(&mock_server, 3).await;

        Mock::given(method("POST"))
            .and(path("/graphql"))
            .and(body_string_contains("transferIssue"))
            .and(body_string_contains("I_node3"))
            .and(body_string_contains("R_target"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": {"transferIssue": {"issue": {
                    "number": 57,
                    "url": "https://github.com/owner/new/issues/57"
                }}}
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = GitHubClient::with_base_url(&mock_server.uri(), "test-token");
        let new_number = client.transfer_issue(3, &source(), &target()).unwrap();

        assert_eq!(new_number, Some(57));
    }

    #[tokio::test]
    async fn test_transfer_issue_graphql_errors() {
        let mock_server = MockServer::start().await;
        mount_transfer_lookups(&mock_server, 3).await;

        Mock::given(method("POST"))
            .and(path("/graphql"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": {"transferIssue": null},
                "errors": [{"message": "Issue cannot be transferred"}]
            })))
            .mount(&mock_server)
            .await;

        let client = GitHubClient::with_base_url(&mock_server.uri(), "test-token");
        let err = client.transfer_issue(3, &source(), &target()).unwrap_err();

        assert!(matches!(err, GitHubError::GraphQl(ref m) if m.contains("cannot be transferred")));
    }

    #[tokio::test]
    async fn test_transfer_issue_unparseable_response_has_no_number() {
        let mock_server = MockServer::start().await;
        mount_transfer_lookups(&mock_server, 3).await;

        Mock::given(method("POST"))
            .and(path("/graphql"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
            .mount(&mock_server)
            .await;

        let client = GitHubClient::with_base_url(&mock_server.uri(), "test-token");
        let new_number = client.transfer_issue(3, &source(), &target()).unwrap();

        assert_eq!(new_number, None);
    }

    #[tokio::test]
    async fn test_transfer_missing_issue_is_not_found() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/owner/old/issues/404"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "message": "Not Found"
            })))
            .mount(&mock_server)
            .await;

        let client = GitHubClient::with_base_url(&mock_server.uri(), "test-token");
        let err = IssueTracker::transfer_issue(&client, 404, &source(), &target()).unwrap_err();

        assert_eq!(err, TrackerError::NotFound("Not Found".to_string()));
    }

    #[tokio::test]
    async fn test_add_labels() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/repos/owner/new/issues/57/labels"))
            .and(body_json(serde_json::json!({"labels": ["bug", "ui"]})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"id": 1, "name": "bug", "color": "fc2929", "description": null},
                {"id": 2, "name": "ui", "color": "cccccc", "description": null}
            ])))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = GitHubClient::with_base_url(&mock_server.uri(), "test-token");
        let names = vec!["bug".to_string(), "ui".to_string()];
        IssueTracker::add_labels(&client, &target(), 57, &names).unwrap();
    }

    #[tokio::test]
    async fn test_unauthorized() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/owner/new/labels"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "message": "Bad credentials"
            })))
            .mount(&mock_server)
            .await;

        let client = GitHubClient::with_base_url(&mock_server.uri(), "bad-token");
        let err = IssueTracker::list_labels(&client, &target()).unwrap_err();

        assert_eq!(err, TrackerError::Unauthorized);
    }

    #[tokio::test]
    async fn test_rate_limited() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/owner/new/labels"))
            .respond_with(
                ResponseTemplate::new(403)
                    .insert_header("x-ratelimit-remaining", "0")
                    .set_body_json(serde_json::json!({"message": "API rate limit exceeded"})),
            )
            .mount(&mock_server)
            .await;

        let client = GitHubClient::with_base_url(&mock_server.uri(), "test-token");
        let err = IssueTracker::list_labels(&client, &target()).unwrap_err();

        assert_eq!(err, TrackerError::RateLimited);
    }
}
