//! Project membership entity model.

use serde::Serialize;
use sqlx::FromRow;
use taskhub_core::types::{DbId, Timestamp};

/// A row from the `project_members` join table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectMember {
    pub project_id: DbId,
    pub user_id: DbId,
    pub attached_at: Timestamp,
}
