//! Error types for building canonical schema values.

/// Errors raised when a canonical value would violate a model invariant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// A qualified name was built from zero segments.
    #[error("qualified name must have at least one segment")]
    EmptyName,
}
