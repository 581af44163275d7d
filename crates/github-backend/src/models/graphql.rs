use serde::{Deserialize, Serialize};

/// Mutation moving an issue to another repository
///
/// REST has no transfer endpoint, so this is the only GraphQL call the client makes.
pub const TRANSFER_ISSUE_MUTATION: &str = "mutation TransferIssue($issueId: ID!, $repositoryId: ID!) { \
transferIssue(input: {issueId: $issueId, repositoryId: $repositoryId}) { issue { number url } } }";

/// GraphQL request envelope
#[derive(Debug, Clone, Serialize)]
pub struct GraphQlRequest<V> {
    pub query: &'static str,
    pub variables: V,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferIssueVariables {
    pub issue_id: String,
    pub repository_id: String,
}

/// GraphQL response envelope
#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlError {
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferIssueData {
    pub transfer_issue: Option<TransferIssuePayload>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransferIssuePayload {
    pub issue: Option<TransferredIssue>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransferredIssue {
    pub number: Option<u64>,
    pub url: Option<String>,
}

impl GraphQlResponse<TransferIssueData> {
    /// Number of the issue in the target repository, if the response carries it
    pub fn new_issue_number(&self) -> Option<u64> {
        self.data
            .as_ref()
            .and_then(|d| d.transfer_issue.as_ref())
            .and_then(|t| t.issue.as_ref())
            .and_then(|i| i.number)
    }
}
