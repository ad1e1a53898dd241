//! Visibility-checked entity loading.
//!
//! Handlers never query projects or tasks directly; they go through these
//! helpers so every read path evaluates the same core visibility predicate
//! against a fresh relational snapshot. Entities outside the actor's scope
//! surface as [`CoreError::NotVisible`], which the HTTP boundary masks as 404.

use sqlx::PgPool;
use taskhub_core::error::CoreError;
use taskhub_core::roles::{Actor, Role};
use taskhub_core::types::DbId;
use taskhub_core::visibility::{self, MemberTaskPolicy, ProjectScope, TaskScope};
use taskhub_db::models::project::Project;
use taskhub_db::models::task::Task;
use taskhub_db::repositories::{ProjectRepo, ScopeRepo, TaskRepo, UserRepo};

use crate::error::{AppError, AppResult};

/// Load a project the actor is allowed to see, along with its scope snapshot.
pub async fn load_visible_project(
    pool: &PgPool,
    actor: &Actor,
    project_id: DbId,
) -> AppResult<(Project, ProjectScope)> {
    let scope = ScopeRepo::load(pool, project_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: project_id,
        }))?;

    if !visibility::project_visible(actor, &scope) {
        return Err(AppError::Core(CoreError::NotVisible {
            entity: "Project",
            id: project_id,
        }));
    }

    let project =
        ProjectRepo::find_by_id(pool, project_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Project",
                id: project_id,
            }))?;

    Ok((project, scope))
}

/// Load a task the actor is allowed to see, scoped to its parent project.
///
/// A task id that exists under a different project behaves like a missing
/// task, matching the nested route shape.
pub async fn load_visible_task(
    pool: &PgPool,
    actor: &Actor,
    project_id: DbId,
    task_id: DbId,
    policy: MemberTaskPolicy,
) -> AppResult<(Task, TaskScope, ProjectScope)> {
    let project = ScopeRepo::load(pool, project_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: project_id,
        }))?;

    let task = TaskRepo::find_by_id(pool, task_id)
        .await?
        .filter(|t| t.project_id == project_id)
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Task",
            id: task_id,
        }))?;

    let task_scope = TaskScope {
        id: task.id,
        project_id: task.project_id,
        assignee_id: task.assignee_id,
    };

    if !visibility::task_visible(actor, &task_scope, &project, policy) {
        return Err(AppError::Core(CoreError::NotVisible {
            entity: "Task",
            id: task_id,
        }));
    }

    Ok((task, task_scope, project))
}

/// Resolve database roles for a member id list, for core membership checks.
///
/// An id with no matching user is reported as [`CoreError::InvalidMember`].
pub async fn resolve_member_roles(
    pool: &PgPool,
    user_ids: &[DbId],
) -> AppResult<Vec<(DbId, Role)>> {
    let rows = UserRepo::roles_for(pool, user_ids).await?;

    let mut resolved = Vec::with_capacity(user_ids.len());
    for id in user_ids {
        let row = rows.iter().find(|r| r.id == *id).ok_or_else(|| {
            AppError::Core(CoreError::InvalidMember(format!(
                "User {id} does not exist"
            )))
        })?;
        let role = Role::parse(&row.role)
            .map_err(|_| AppError::InternalError(format!("Unknown role stored for user {id}")))?;
        resolved.push((*id, role));
    }
    Ok(resolved)
}

/// Resolve one user's role for the core leader check.
///
/// A missing user is reported as [`CoreError::InvalidLeader`].
pub async fn resolve_leader_role(pool: &PgPool, user_id: DbId) -> AppResult<Role> {
    let rows = UserRepo::roles_for(pool, &[user_id]).await?;
    let row = rows.first().ok_or_else(|| {
        AppError::Core(CoreError::InvalidLeader(format!(
            "User {user_id} does not exist"
        )))
    })?;
    Role::parse(&row.role)
        .map_err(|_| AppError::InternalError(format!("Unknown role stored for user {user_id}")))
}
