//! Domain-level error type shared across the workspace.

use crate::types::DbId;

/// Errors produced by domain logic.
///
/// HTTP-facing code maps these onto status codes; see the API crate's
/// `AppError` for the mapping.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// An entity lookup by id found nothing.
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// Input failed domain validation.
    #[error("validation failed: {0}")]
    Validation(String),

    /// An invariant was violated; not attributable to caller input.
    #[error("internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for [`CoreError::NotFound`].
    pub fn not_found(entity: &'static str, id: DbId) -> Self {
        Self::NotFound { entity, id }
    }

    /// Shorthand for [`CoreError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
