//! Handler for the dashboard aggregation endpoint.
//!
//! Counts are scoped by the same visibility predicate the project list
//! uses, so the dashboard can never leak a project the actor would not see
//! in `/projects`. The endpoint is fail-soft: a data-access fault logs the
//! error and returns the all-zero shape instead of a 500.

use std::collections::HashMap;

use axum::extract::State;
use axum::Json;
use taskhub_core::roles::Actor;
use taskhub_core::stats::{progress_pct, DashboardStats, ProjectProgress};
use taskhub_core::types::DbId;
use taskhub_core::visibility::visible_projects;
use taskhub_db::repositories::{ProjectRepo, ScopeRepo, TaskRepo, UserRepo};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/dashboard
pub async fn stats(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<DashboardStats>>> {
    let actor = user.actor()?;

    let stats = match compute_stats(&state, &actor).await {
        Ok(stats) => stats,
        Err(err) => {
            tracing::error!(error = %err, user_id = actor.id, "Dashboard aggregation failed");
            DashboardStats::empty()
        }
    };

    Ok(Json(DataResponse { data: stats }))
}

async fn compute_stats(state: &AppState, actor: &Actor) -> AppResult<DashboardStats> {
    let scopes = ScopeRepo::load_all(&state.pool).await?;
    let visible: Vec<DbId> = visible_projects(actor, &scopes)
        .into_iter()
        .map(|s| s.id)
        .collect();

    let mut projects = ProjectRepo::list(&state.pool).await?;
    projects.retain(|p| visible.contains(&p.id));

    let counts = TaskRepo::counts_by_projects(&state.pool, &visible).await?;
    let counts_by_id: HashMap<DbId, (i64, i64)> = counts
        .into_iter()
        .map(|c| (c.project_id, (c.total_tasks, c.completed_tasks)))
        .collect();

    let leader_ids: Vec<DbId> = projects.iter().map(|p| p.leader_id).collect();
    let leader_names: HashMap<DbId, String> = UserRepo::names_for(&state.pool, &leader_ids)
        .await?
        .into_iter()
        .collect();

    let total_users = UserRepo::count(&state.pool).await?;

    let mut total_tasks = 0;
    let mut completed_tasks = 0;
    let progress: Vec<ProjectProgress> = projects
        .iter()
        .map(|p| {
            let (total, completed) = counts_by_id.get(&p.id).copied().unwrap_or((0, 0));
            total_tasks += total;
            completed_tasks += completed;
            ProjectProgress {
                id: p.id,
                name: p.name.clone(),
                status: p.status.clone(),
                total_tasks: total,
                completed_tasks: completed,
                progress: progress_pct(completed, total),
                leader_name: leader_names.get(&p.leader_id).cloned().unwrap_or_default(),
            }
        })
        .collect();

    Ok(DashboardStats {
        total_projects: projects.len() as i64,
        total_tasks,
        completed_tasks,
        total_users,
        projects: progress,
    })
}
