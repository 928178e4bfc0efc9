//! Error taxonomy shared by the lock and version-family managers.

use crate::types::{FamilyId, ObjectId, UserId};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Object {object_id} is locked by user {holder_user_id}")]
    LockHeldByOther {
        object_id: ObjectId,
        holder_user_id: UserId,
    },

    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Failure raised by a persistence backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Persistence failure: {0}")]
    Backend(String),

    /// A compare-and-swap save found a different stored revision.
    #[error("Family {family_id} was modified concurrently (expected revision {expected})")]
    RevisionConflict { family_id: FamilyId, expected: i64 },
}

impl StoreError {
    /// Wrap any backend error as [`StoreError::Backend`].
    pub fn backend(err: impl std::fmt::Display) -> Self {
        StoreError::Backend(err.to_string())
    }
}
