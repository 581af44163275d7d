pub mod error;
pub mod models;
pub mod traits;

pub use error::{Result, TrackerError};
pub use models::*;
pub use traits::IssueTracker;
