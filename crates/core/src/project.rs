//! Project status constants and creation/update validation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const PROJECT_STATUS_PLANNING: &str = "planning";
pub const PROJECT_STATUS_IN_PROGRESS: &str = "in_progress";
pub const PROJECT_STATUS_COMPLETED: &str = "completed";
pub const PROJECT_STATUS_ON_HOLD: &str = "on_hold";

/// All valid project status values.
pub const VALID_PROJECT_STATUSES: &[&str] = &[
    PROJECT_STATUS_PLANNING,
    PROJECT_STATUS_IN_PROGRESS,
    PROJECT_STATUS_COMPLETED,
    PROJECT_STATUS_ON_HOLD,
];

/// Maximum length for a project name.
pub const MAX_PROJECT_NAME_LENGTH: usize = 255;

/// Minimum length for a project description.
pub const MIN_PROJECT_DESCRIPTION_LENGTH: usize = 10;

/// Project lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Planning,
    InProgress,
    Completed,
    OnHold,
}

impl ProjectStatus {
    /// Return the database string for this status.
    pub fn as_str(self) -> &'static str {
        match self {
            ProjectStatus::Planning => PROJECT_STATUS_PLANNING,
            ProjectStatus::InProgress => PROJECT_STATUS_IN_PROGRESS,
            ProjectStatus::Completed => PROJECT_STATUS_COMPLETED,
            ProjectStatus::OnHold => PROJECT_STATUS_ON_HOLD,
        }
    }

    /// Parse a stored status string.
    pub fn parse(s: &str) -> Result<ProjectStatus, CoreError> {
        match s {
            PROJECT_STATUS_PLANNING => Ok(ProjectStatus::Planning),
            PROJECT_STATUS_IN_PROGRESS => Ok(ProjectStatus::InProgress),
            PROJECT_STATUS_COMPLETED => Ok(ProjectStatus::Completed),
            PROJECT_STATUS_ON_HOLD => Ok(ProjectStatus::OnHold),
            other => Err(CoreError::Validation(format!(
                "Invalid project status '{other}'. Must be one of: {}",
                VALID_PROJECT_STATUSES.join(", ")
            ))),
        }
    }

    /// Status badge color for the frontend.
    pub fn color(self) -> &'static str {
        match self {
            ProjectStatus::Planning => "blue",
            ProjectStatus::InProgress => "yellow",
            ProjectStatus::Completed => "green",
            ProjectStatus::OnHold => "red",
        }
    }
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validate a project name: non-empty, bounded length. Uniqueness is
/// enforced by the `uq_projects_name` constraint at the database.
pub fn validate_project_name(name: &str) -> Result<(), CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(
            "Project name must not be empty".to_string(),
        ));
    }
    if trimmed.len() > MAX_PROJECT_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "Project name exceeds maximum length of {MAX_PROJECT_NAME_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate a project description.
pub fn validate_project_description(description: &str) -> Result<(), CoreError> {
    if description.trim().len() < MIN_PROJECT_DESCRIPTION_LENGTH {
        return Err(CoreError::Validation(format!(
            "Project description must be at least {MIN_PROJECT_DESCRIPTION_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate the date invariant: `start_date <= end_date`.
pub fn validate_project_dates(start_date: NaiveDate, end_date: NaiveDate) -> Result<(), CoreError> {
    if start_date > end_date {
        return Err(CoreError::Validation(
            "Start date must be before or equal to end date".to_string(),
        ));
    }
    Ok(())
}
