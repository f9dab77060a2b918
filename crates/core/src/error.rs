//! Domain error taxonomy shared across the persistence and API layers.
//!
//! Read paths degrade "not found" to `None`/empty instead of raising;
//! write paths that require a pre-existing target (rating, saving,
//! following) surface [`CoreError::NotFound`] for the caller to translate.

use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A referenced entity (prompt, user, category, follow edge) is absent.
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// Malformed input, e.g. a rating outside [1,5] or a blank title.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The operation contradicts existing state, e.g. a duplicate follow.
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The viewer is authenticated but not allowed, e.g. editing someone
    /// else's prompt.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
