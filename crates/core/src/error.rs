use crate::types::DbId;

/// Domain error taxonomy.
///
/// Authorization errors split in two: [`CoreError::NotVisible`] means the
/// actor cannot see the target at all (evaluated before any action-specific
/// check), while [`CoreError::Forbidden`] means the actor can see it but
/// lacks the rights for the attempted mutation. The API boundary may mask
/// `NotVisible` as a plain 404 for information hiding; in-process callers
/// always observe the distinct variant.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Not visible: {entity} with id {id}")]
    NotVisible { entity: &'static str, id: DbId },

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Invalid member: {0}")]
    InvalidMember(String),

    #[error("Invalid leader: {0}")]
    InvalidLeader(String),

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
