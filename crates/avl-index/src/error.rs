use thiserror::Error;

/// Failures reported by [`AvlTree`](crate::AvlTree) operations.
///
/// Lookup misses are not errors; `search`, `min` and `max` return `None`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AvlError {
    #[error("key already present")]
    DuplicateKey,
    #[error("key not found")]
    KeyNotFound,
    /// The caller broke the contract of `split` or `join`.
    #[error("precondition violated: {0}")]
    PreconditionViolation(&'static str),
}
