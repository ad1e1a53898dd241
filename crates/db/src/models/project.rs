//! Project entity model and DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use taskhub_core::types::{DbId, Timestamp};

/// A project row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub name: String,
    pub description: String,
    /// Status string matching `taskhub_core::project` constants.
    pub status: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub leader_id: DbId,
    pub created_by: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new project.
///
/// `member_ids` is the initial member set; every id must belong to a
/// Team Member (validated in core before the insert).
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProject {
    pub name: String,
    pub description: String,
    /// Defaults to `planning` if omitted.
    pub status: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub leader_id: DbId,
    #[serde(default)]
    pub member_ids: Vec<DbId>,
}

/// DTO for updating an existing project. All fields are optional.
///
/// A present `leader_id` is a single combined leader replacement -- there
/// is no clear-then-set path. A present `member_ids` replaces the member
/// set atomically (sync semantics).
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProject {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub leader_id: Option<DbId>,
    pub member_ids: Option<Vec<DbId>>,
}
