//! Dashboard statistics shapes and the progress arithmetic.
//!
//! The aggregator never re-derives visibility: callers count over the
//! visible set produced by [`crate::visibility`] and only the math lives
//! here. The dashboard is fail-soft -- a data-access fault yields
//! [`DashboardStats::empty`] instead of an error page.

use serde::Serialize;

use crate::types::DbId;

/// Per-project completion tracking for the dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectProgress {
    pub id: DbId,
    pub name: String,
    pub status: String,
    pub total_tasks: i64,
    pub completed_tasks: i64,
    /// Integer percentage, rounded half-up. 0 for zero-task projects.
    pub progress: i32,
    pub leader_name: String,
}

/// Role-scoped dashboard counts plus per-project progress.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub total_projects: i64,
    pub total_tasks: i64,
    pub completed_tasks: i64,
    /// Global headcount; intentionally not scoped by role.
    pub total_users: i64,
    pub projects: Vec<ProjectProgress>,
}

impl DashboardStats {
    /// The all-zero shape returned when aggregation fails.
    pub fn empty() -> Self {
        DashboardStats {
            total_projects: 0,
            total_tasks: 0,
            completed_tasks: 0,
            total_users: 0,
            projects: Vec::new(),
        }
    }
}

/// Completion percentage as an integer, rounded half-up.
///
/// A project with zero tasks has progress 0, never NaN or a division
/// error.
pub fn progress_pct(completed_tasks: i64, total_tasks: i64) -> i32 {
    if total_tasks <= 0 {
        return 0;
    }
    ((completed_tasks as f64 / total_tasks as f64) * 100.0).round() as i32
}
