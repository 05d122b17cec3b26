//! Domain-level error type shared across crates.

/// Errors produced by domain logic, independent of HTTP or storage.
///
/// The API crate maps each variant to an HTTP status; the worker
/// records them in job records where appropriate.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A named entity does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        entity: &'static str,
        id: String,
    },

    /// Client-supplied input failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The request conflicts with current state.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Missing or invalid credentials.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// An unexpected internal failure.
    #[error("Internal error: {0}")]
    Internal(String),
}
