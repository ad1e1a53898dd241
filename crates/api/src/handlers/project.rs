//! Handlers for the `/projects` resource.
//!
//! Every read goes through the visibility scope helpers; every mutation is
//! checked against the core capability predicates before touching the
//! database.

use std::collections::HashSet;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use taskhub_core::error::CoreError;
use taskhub_core::roles::{can_delete_projects, can_manage_projects};
use taskhub_core::types::DbId;
use taskhub_core::visibility::visible_projects;
use taskhub_core::{membership, project as project_rules};
use taskhub_db::models::project::{CreateProject, Project, UpdateProject};
use taskhub_db::repositories::{MembershipRepo, ProjectRepo, ScopeRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::scope::{load_visible_project, resolve_leader_role, resolve_member_roles};
use crate::state::AppState;

/// POST /api/v1/projects
///
/// Requires project management rights (Admin or Project Manager).
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateProject>,
) -> AppResult<(StatusCode, Json<Project>)> {
    let actor = user.actor()?;
    if !can_manage_projects(&actor) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only Admins and Project Managers may create projects".into(),
        )));
    }

    project_rules::validate_project_name(&input.name)?;
    project_rules::validate_project_description(&input.description)?;
    project_rules::validate_project_dates(input.start_date, input.end_date)?;
    if let Some(status) = &input.status {
        project_rules::ProjectStatus::parse(status)?;
    }

    let leader_role = resolve_leader_role(&state.pool, input.leader_id).await?;
    membership::validate_leader_role(input.leader_id, leader_role)?;

    if !input.member_ids.is_empty() {
        let member_roles = resolve_member_roles(&state.pool, &input.member_ids).await?;
        membership::validate_member_roles(&member_roles)?;
    }

    let project = ProjectRepo::create(&state.pool, &input, actor.id).await?;
    tracing::info!(project_id = project.id, leader_id = project.leader_id, "Project created");
    Ok((StatusCode::CREATED, Json(project)))
}

/// GET /api/v1/projects
///
/// Lists only the projects visible to the actor.
pub async fn list(State(state): State<AppState>, user: AuthUser) -> AppResult<Json<Vec<Project>>> {
    let actor = user.actor()?;

    let scopes = ScopeRepo::load_all(&state.pool).await?;
    let visible_ids: HashSet<DbId> = visible_projects(&actor, &scopes)
        .into_iter()
        .map(|s| s.id)
        .collect();

    let mut projects = ProjectRepo::list(&state.pool).await?;
    projects.retain(|p| visible_ids.contains(&p.id));
    Ok(Json(projects))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Project>> {
    let actor = user.actor()?;
    let (project, _scope) = load_visible_project(&state.pool, &actor, id).await?;
    Ok(Json(project))
}

/// GET /api/v1/projects/{id}/members
pub async fn list_members(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Vec<DbId>>> {
    let actor = user.actor()?;
    let (_, scope) = load_visible_project(&state.pool, &actor, id).await?;
    let members = MembershipRepo::list_member_ids(&state.pool, scope.id).await?;
    Ok(Json(members))
}

/// PUT /api/v1/projects/{id}
///
/// Requires project management rights on top of visibility. A present
/// `member_ids` replaces the member set; a present `leader_id` is a single
/// combined leader replacement.
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProject>,
) -> AppResult<Json<Project>> {
    let actor = user.actor()?;
    let (current, _scope) = load_visible_project(&state.pool, &actor, id).await?;

    if !can_manage_projects(&actor) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only Admins and Project Managers may edit projects".into(),
        )));
    }

    if let Some(name) = &input.name {
        project_rules::validate_project_name(name)?;
    }
    if let Some(description) = &input.description {
        project_rules::validate_project_description(description)?;
    }
    if let Some(status) = &input.status {
        project_rules::ProjectStatus::parse(status)?;
    }
    let start = input.start_date.unwrap_or(current.start_date);
    let end = input.end_date.unwrap_or(current.end_date);
    project_rules::validate_project_dates(start, end)?;

    if let Some(leader_id) = input.leader_id {
        let leader_role = resolve_leader_role(&state.pool, leader_id).await?;
        membership::validate_leader_role(leader_id, leader_role)?;
    }
    if let Some(member_ids) = &input.member_ids {
        if !member_ids.is_empty() {
            let member_roles = resolve_member_roles(&state.pool, member_ids).await?;
            membership::validate_member_roles(&member_roles)?;
        }
    }

    let project = ProjectRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;
    Ok(Json(project))
}

/// DELETE /api/v1/projects/{id}
///
/// Admin only. Removes the project and everything under it.
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let actor = user.actor()?;
    if !can_delete_projects(&actor) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only Admins may delete projects".into(),
        )));
    }

    let deleted = ProjectRepo::delete_cascade(&state.pool, id).await?;
    if deleted {
        tracing::info!(project_id = id, "Project deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))
    }
}
