pub mod graphql;
pub mod issue;
pub mod label;
pub mod repo;

pub use graphql::*;
pub use issue::*;
pub use label::*;
pub use repo::*;
