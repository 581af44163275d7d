pub mod plan;
pub mod transfer;

/// How a command ended, when it did not fail outright
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    /// The run finished but some issues were not transferred
    Partial,
}
