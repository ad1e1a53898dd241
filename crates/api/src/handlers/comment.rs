//! Handlers for comments nested under `/projects/{project_id}/tasks/{task_id}/comments`.
//!
//! Anyone who can see the task may read and add comments. Editing is
//! author-only; deletion is author-or-Admin.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use taskhub_core::comment::{
    authorize_comment_delete, authorize_comment_edit, validate_comment_body,
};
use taskhub_core::error::CoreError;
use taskhub_core::types::DbId;
use taskhub_db::models::comment::{Comment, CommentWithAuthor, CreateComment};
use taskhub_db::repositories::CommentRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::scope::load_visible_task;
use crate::state::AppState;

/// Fetch a comment and check it belongs to the given task.
async fn find_scoped_comment(
    pool: &sqlx::PgPool,
    task_id: DbId,
    id: DbId,
) -> AppResult<Comment> {
    CommentRepo::find_by_id(pool, id)
        .await?
        .filter(|c| c.task_id == task_id)
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Comment",
            id,
        }))
}

/// POST /api/v1/projects/{project_id}/tasks/{task_id}/comments
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Path((project_id, task_id)): Path<(DbId, DbId)>,
    Json(input): Json<CreateComment>,
) -> AppResult<(StatusCode, Json<Comment>)> {
    let actor = user.actor()?;
    let policy = state.config.member_task_policy;
    load_visible_task(&state.pool, &actor, project_id, task_id, policy).await?;

    validate_comment_body(&input.body)?;

    let comment = CommentRepo::create(&state.pool, task_id, actor.id, &input.body).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

/// GET /api/v1/projects/{project_id}/tasks/{task_id}/comments
pub async fn list_by_task(
    State(state): State<AppState>,
    user: AuthUser,
    Path((project_id, task_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<Vec<CommentWithAuthor>>> {
    let actor = user.actor()?;
    let policy = state.config.member_task_policy;
    load_visible_task(&state.pool, &actor, project_id, task_id, policy).await?;

    let comments = CommentRepo::list_by_task(&state.pool, task_id).await?;
    Ok(Json(comments))
}

/// PUT /api/v1/projects/{project_id}/tasks/{task_id}/comments/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path((project_id, task_id, id)): Path<(DbId, DbId, DbId)>,
    Json(input): Json<CreateComment>,
) -> AppResult<Json<Comment>> {
    let actor = user.actor()?;
    let policy = state.config.member_task_policy;
    load_visible_task(&state.pool, &actor, project_id, task_id, policy).await?;

    let comment = find_scoped_comment(&state.pool, task_id, id).await?;
    authorize_comment_edit(&actor, comment.user_id)?;
    validate_comment_body(&input.body)?;

    let updated = CommentRepo::update_body(&state.pool, id, &input.body)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Comment",
            id,
        }))?;
    Ok(Json(updated))
}

/// DELETE /api/v1/projects/{project_id}/tasks/{task_id}/comments/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path((project_id, task_id, id)): Path<(DbId, DbId, DbId)>,
) -> AppResult<StatusCode> {
    let actor = user.actor()?;
    let policy = state.config.member_task_policy;
    load_visible_task(&state.pool, &actor, project_id, task_id, policy).await?;

    let comment = find_scoped_comment(&state.pool, task_id, id).await?;
    authorize_comment_delete(&actor, comment.user_id)?;

    let deleted = CommentRepo::delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Comment",
            id,
        }))
    }
}
