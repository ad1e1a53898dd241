//! Handlers for tasks nested under `/projects/{project_id}/tasks`.
//!
//! Status never changes through the generic update endpoint; it goes through
//! the dedicated transition endpoint so completion stamps stay consistent.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use taskhub_core::error::CoreError;
use taskhub_core::lifecycle::{
    self, authorize_transition, can_edit_tasks, transition_effect, TaskStatus,
};
use taskhub_core::roles::{is_project_participant, Actor};
use taskhub_core::types::DbId;
use taskhub_core::visibility::{task_visible, ProjectScope, TaskScope};
use taskhub_db::models::task::{CreateTask, Task, UpdateTask};
use taskhub_db::repositories::TaskRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::scope::{load_visible_project, load_visible_task};
use crate::state::AppState;

/// Request body for the status transition endpoint.
#[derive(Debug, Deserialize)]
pub struct TransitionRequest {
    pub status: String,
}

fn validate_title(title: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation("Task title must not be empty".into()));
    }
    Ok(())
}

/// Reject an assignee who is not a participant (leader, creator, or member)
/// of the project.
fn validate_assignee(scope: &ProjectScope, assignee_id: DbId) -> Result<(), CoreError> {
    if is_project_participant(assignee_id, scope) {
        Ok(())
    } else {
        Err(CoreError::InvalidMember(format!(
            "User {assignee_id} is not a participant of this project"
        )))
    }
}

fn require_edit_rights(actor: &Actor, scope: &ProjectScope) -> Result<(), CoreError> {
    if can_edit_tasks(actor, scope) {
        Ok(())
    } else {
        Err(CoreError::Forbidden(
            "Only Admins and the project leader may modify tasks".into(),
        ))
    }
}

/// POST /api/v1/projects/{project_id}/tasks
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreateTask>,
) -> AppResult<(StatusCode, Json<Task>)> {
    let actor = user.actor()?;
    let (_, scope) = load_visible_project(&state.pool, &actor, project_id).await?;
    require_edit_rights(&actor, &scope)?;

    validate_title(&input.title)?;
    if let Some(priority) = &input.priority {
        lifecycle::validate_priority(priority)?;
    }
    if let Some(assignee_id) = input.assignee_id {
        validate_assignee(&scope, assignee_id)?;
    }

    let task = TaskRepo::create(&state.pool, project_id, &input).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// GET /api/v1/projects/{project_id}/tasks
pub async fn list_by_project(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<Vec<Task>>> {
    let actor = user.actor()?;
    let (_, scope) = load_visible_project(&state.pool, &actor, project_id).await?;

    let policy = state.config.member_task_policy;
    let mut tasks = TaskRepo::list_by_project(&state.pool, project_id).await?;
    tasks.retain(|t| {
        let task_scope = TaskScope {
            id: t.id,
            project_id: t.project_id,
            assignee_id: t.assignee_id,
        };
        task_visible(&actor, &task_scope, &scope, policy)
    });
    Ok(Json(tasks))
}

/// GET /api/v1/projects/{project_id}/tasks/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path((project_id, id)): Path<(DbId, DbId)>,
) -> AppResult<Json<Task>> {
    let actor = user.actor()?;
    let policy = state.config.member_task_policy;
    let (task, _, _) = load_visible_task(&state.pool, &actor, project_id, id, policy).await?;
    Ok(Json(task))
}

/// PUT /api/v1/projects/{project_id}/tasks/{id}
///
/// Updates editable fields only.
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path((project_id, id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateTask>,
) -> AppResult<Json<Task>> {
    let actor = user.actor()?;
    let policy = state.config.member_task_policy;
    let (_, _, scope) = load_visible_task(&state.pool, &actor, project_id, id, policy).await?;
    require_edit_rights(&actor, &scope)?;

    if let Some(title) = &input.title {
        validate_title(title)?;
    }
    if let Some(priority) = &input.priority {
        lifecycle::validate_priority(priority)?;
    }
    if let Some(Some(assignee_id)) = input.assignee_id {
        validate_assignee(&scope, assignee_id)?;
    }

    let task = TaskRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Task", id }))?;
    Ok(Json(task))
}

/// POST /api/v1/projects/{project_id}/tasks/{id}/status
///
/// Transition a task's status. Only the project leader or the task's
/// assignee may transition; completion stamps are computed in core and
/// written atomically with the status.
pub async fn transition(
    State(state): State<AppState>,
    user: AuthUser,
    Path((project_id, id)): Path<(DbId, DbId)>,
    Json(input): Json<TransitionRequest>,
) -> AppResult<Json<Task>> {
    let actor = user.actor()?;
    let policy = state.config.member_task_policy;
    let (task, task_scope, scope) =
        load_visible_task(&state.pool, &actor, project_id, id, policy).await?;

    let target = TaskStatus::parse_transition_target(&input.status)?;
    authorize_transition(&actor, &task_scope, &scope)?;

    let current = TaskStatus::parse(&task.status)
        .map_err(|_| AppError::InternalError(format!("Unknown status stored for task {id}")))?;
    let outcome = transition_effect(
        &actor,
        current,
        task.completed_at,
        task.completed_by,
        target,
        Utc::now(),
    );

    let updated = TaskRepo::set_status(&state.pool, id, &outcome)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Task", id }))?;
    tracing::info!(
        task_id = id,
        from = %task.status,
        to = %updated.status,
        actor_id = actor.id,
        "Task status changed"
    );
    Ok(Json(updated))
}

/// DELETE /api/v1/projects/{project_id}/tasks/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path((project_id, id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    let actor = user.actor()?;
    let policy = state.config.member_task_policy;
    let (_, _, scope) = load_visible_task(&state.pool, &actor, project_id, id, policy).await?;
    require_edit_rights(&actor, &scope)?;

    let deleted = TaskRepo::delete_cascade(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: "Task", id }))
    }
}
