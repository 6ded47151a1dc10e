//! Domain-level error type shared across the workspace.

/// Errors produced by domain logic.
///
/// HTTP mapping lives in `outfred-api`; this crate only names the
/// failure classes.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CoreError {
    /// An entity lookup failed.
    #[error("{entity} with id {id} not found")]
    NotFound {
        /// Entity kind, e.g. `"ImportSession"`.
        entity: &'static str,
        /// Stringified identifier.
        id: String,
    },

    /// Caller-supplied input was rejected.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The requested operation conflicts with current state.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// An unexpected internal failure.
    #[error("Internal error: {0}")]
    Internal(String),
}
