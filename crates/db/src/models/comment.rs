//! Task comment entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use taskhub_core::types::{DbId, Timestamp};

/// A comment row from the `task_comments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Comment {
    pub id: DbId,
    pub task_id: DbId,
    pub user_id: DbId,
    pub body: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A comment joined with its author's display name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CommentWithAuthor {
    pub id: DbId,
    pub task_id: DbId,
    pub user_id: DbId,
    pub author_name: String,
    pub body: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating or revising a comment.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateComment {
    pub body: String,
}
