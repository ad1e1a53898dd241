//! Comment validation and authorship rules.
//!
//! Comments are immutable once authored except that the author may revise
//! their own text; deletion is allowed to the author or an Admin.

use crate::error::CoreError;
use crate::roles::{Actor, Role};
use crate::types::DbId;

/// Maximum length for a comment body.
pub const MAX_COMMENT_LENGTH: usize = 1_000;

/// Validate a comment body: non-empty, bounded length.
pub fn validate_comment_body(body: &str) -> Result<(), CoreError> {
    if body.trim().is_empty() {
        return Err(CoreError::Validation(
            "Comment must not be empty".to_string(),
        ));
    }
    if body.len() > MAX_COMMENT_LENGTH {
        return Err(CoreError::Validation(format!(
            "Comment exceeds maximum length of {MAX_COMMENT_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Only the author may edit their comment.
pub fn authorize_comment_edit(actor: &Actor, author_id: DbId) -> Result<(), CoreError> {
    if actor.id == author_id {
        Ok(())
    } else {
        Err(CoreError::Forbidden(
            "You can only update your own comments".to_string(),
        ))
    }
}

/// The author or an Admin may delete a comment.
pub fn authorize_comment_delete(actor: &Actor, author_id: DbId) -> Result<(), CoreError> {
    if actor.id == author_id || actor.role == Role::Admin {
        Ok(())
    } else {
        Err(CoreError::Forbidden(
            "You can only delete your own comments".to_string(),
        ))
    }
}
