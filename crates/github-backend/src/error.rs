use thiserror::Error;
use tracker_core::TrackerError;

#[derive(Error, Debug)]
pub enum GitHubError {
    #[error("HTTP error: {0}")]
    Http(#[from] ureq::Error),

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Authentication failed")]
    Unauthorized,

    #[error("Rate limited")]
    RateLimited,

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("GraphQL error: {0}")]
    GraphQl(String),
}

pub type Result<T> = std::result::Result<T, GitHubError>;

impl From<GitHubError> for TrackerError {
    fn from(err: GitHubError) -> Self {
        match err {
            GitHubError::Http(e) => TrackerError::Http(e.to_string()),
            GitHubError::Parse(e) => TrackerError::Parse(e.to_string()),
            GitHubError::NotFound(what) => TrackerError::NotFound(what),
            GitHubError::Unauthorized => TrackerError::Unauthorized,
            GitHubError::RateLimited => TrackerError::RateLimited,
            GitHubError::Api { status, message } => TrackerError::Api { status, message },
            GitHubError::GraphQl(msg) => TrackerError::Api {
                status: 200,
                message: format!("GraphQL error: {}", msg),
            },
        }
    }
}
