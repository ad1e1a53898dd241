//! Task entity model and DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use taskhub_core::types::{DbId, Timestamp};

/// A task row from the `tasks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Task {
    pub id: DbId,
    pub project_id: DbId,
    pub title: String,
    pub description: Option<String>,
    /// Status string matching `taskhub_core::lifecycle` constants.
    pub status: String,
    pub priority: String,
    pub assignee_id: Option<DbId>,
    /// Advisory only; not checked against the project date range.
    pub due_date: Option<NaiveDate>,
    pub completed_at: Option<Timestamp>,
    pub completed_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new task. Status is not accepted on creation; new
/// tasks always start at `todo`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTask {
    pub title: String,
    pub description: Option<String>,
    /// Defaults to `medium` if omitted.
    pub priority: Option<String>,
    pub assignee_id: Option<DbId>,
    pub due_date: Option<NaiveDate>,
}

/// DTO for updating an existing task's editable fields. Status changes go
/// through the dedicated transition endpoint instead.
///
/// The nullable columns use a double `Option`: a key absent from the body
/// deserializes to `None` (keep the stored value), an explicit `null` to
/// `Some(None)` (clear it).
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateTask {
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<Option<String>>,
    pub priority: Option<String>,
    #[serde(default)]
    pub assignee_id: Option<Option<DbId>>,
    #[serde(default)]
    pub due_date: Option<Option<NaiveDate>>,
}

/// Per-project task counts for the dashboard aggregation.
#[derive(Debug, Clone, FromRow)]
pub struct TaskCounts {
    pub project_id: DbId,
    pub total_tasks: i64,
    pub completed_tasks: i64,
}
