use serde::{Deserialize, Serialize};

/// GitHub repository (only the fields needed to address it through GraphQL)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GitHubRepo {
    pub id: u64,
    pub node_id: String,
    pub name: String,
    pub full_name: String,
}
