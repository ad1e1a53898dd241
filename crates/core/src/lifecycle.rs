//! Task status state machine: legal transitions, who may trigger them, and
//! the completion-stamp side effects.
//!
//! The three states are freely reachable from one another; legality is
//! about the actor, not the shape of the move. Status-only transitions are
//! authorized separately from general edit rights, so an assignee with no
//! edit rights can still move their task through its lifecycle.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::roles::Actor;
use crate::types::{DbId, Timestamp};
use crate::visibility::{ProjectScope, TaskScope};

pub const STATUS_TODO: &str = "todo";
pub const STATUS_IN_PROGRESS: &str = "in_progress";
pub const STATUS_DONE: &str = "done";

/// All valid task status values.
pub const VALID_TASK_STATUSES: &[&str] = &[STATUS_TODO, STATUS_IN_PROGRESS, STATUS_DONE];

pub const PRIORITY_LOW: &str = "low";
pub const PRIORITY_MEDIUM: &str = "medium";
pub const PRIORITY_HIGH: &str = "high";

/// All valid task priority values.
pub const VALID_TASK_PRIORITIES: &[&str] = &[PRIORITY_LOW, PRIORITY_MEDIUM, PRIORITY_HIGH];

/// Task lifecycle status. New tasks always start at `ToDo`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    ToDo,
    InProgress,
    Done,
}

impl TaskStatus {
    /// Return the database string for this status.
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::ToDo => STATUS_TODO,
            TaskStatus::InProgress => STATUS_IN_PROGRESS,
            TaskStatus::Done => STATUS_DONE,
        }
    }

    /// Parse a stored status string.
    pub fn parse(s: &str) -> Result<TaskStatus, CoreError> {
        match s {
            STATUS_TODO => Ok(TaskStatus::ToDo),
            STATUS_IN_PROGRESS => Ok(TaskStatus::InProgress),
            STATUS_DONE => Ok(TaskStatus::Done),
            other => Err(CoreError::Validation(format!(
                "Invalid task status '{other}'. Must be one of: {}",
                VALID_TASK_STATUSES.join(", ")
            ))),
        }
    }

    /// Parse a requested transition target.
    ///
    /// Same value space as [`TaskStatus::parse`] but a malformed target is
    /// an [`CoreError::InvalidTransition`], matching the error taxonomy the
    /// transition endpoint exposes.
    pub fn parse_transition_target(s: &str) -> Result<TaskStatus, CoreError> {
        match s {
            STATUS_TODO => Ok(TaskStatus::ToDo),
            STATUS_IN_PROGRESS => Ok(TaskStatus::InProgress),
            STATUS_DONE => Ok(TaskStatus::Done),
            other => Err(CoreError::InvalidTransition(format!(
                "Invalid target status '{other}'. Must be one of: {}",
                VALID_TASK_STATUSES.join(", ")
            ))),
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validate a task priority string.
pub fn validate_priority(priority: &str) -> Result<(), CoreError> {
    if VALID_TASK_PRIORITIES.contains(&priority) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid priority '{priority}'. Must be one of: {}",
            VALID_TASK_PRIORITIES.join(", ")
        )))
    }
}

/// The full effect of one status transition: the new status plus the
/// completion stamp to persist. Status and stamp must commit atomically; a
/// reader must never observe `done` with a null `completed_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionOutcome {
    pub status: TaskStatus,
    pub completed_at: Option<Timestamp>,
    pub completed_by: Option<DbId>,
}

/// Check whether the actor may transition this task's status.
///
/// Only the project's leader or the task's current assignee may; everyone
/// else (the Admin role included) gets `Forbidden`. General edit rights are
/// checked elsewhere and do not grant transitions.
pub fn authorize_transition(
    actor: &Actor,
    task: &TaskScope,
    project: &ProjectScope,
) -> Result<(), CoreError> {
    if project.leader_id == actor.id || task.assignee_id == Some(actor.id) {
        Ok(())
    } else {
        Err(CoreError::Forbidden(
            "Only the project leader or the task assignee may change task status".to_string(),
        ))
    }
}

/// Compute the transition outcome for an authorized actor.
///
/// - Entering `Done` stamps `completed_at = now`, `completed_by = actor`.
/// - Leaving `Done` clears both unconditionally: the completion record
///   never survives a reopen, even if the task is later re-completed by a
///   different actor.
/// - A `Done -> Done` no-op keeps the existing stamp.
pub fn transition_effect(
    actor: &Actor,
    current: TaskStatus,
    current_completed_at: Option<Timestamp>,
    current_completed_by: Option<DbId>,
    target: TaskStatus,
    now: Timestamp,
) -> TransitionOutcome {
    match (current, target) {
        (TaskStatus::Done, TaskStatus::Done) => TransitionOutcome {
            status: TaskStatus::Done,
            completed_at: current_completed_at,
            completed_by: current_completed_by,
        },
        (_, TaskStatus::Done) => TransitionOutcome {
            status: TaskStatus::Done,
            completed_at: Some(now),
            completed_by: Some(actor.id),
        },
        (_, other) => TransitionOutcome {
            status: other,
            completed_at: None,
            completed_by: None,
        },
    }
}

/// True iff the actor may create, edit, or delete tasks in this project.
///
/// Admin, or the project's leader. Decoupled from transition rights.
pub fn can_edit_tasks(actor: &Actor, project: &ProjectScope) -> bool {
    crate::roles::can_delete_projects(actor) || project.leader_id == actor.id
}
