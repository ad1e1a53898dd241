//! Loads the relational snapshots the core visibility predicate evaluates.
//!
//! Every scoped read path (listing, single-record fetch, dashboard
//! counting) feeds on these snapshots, so the visibility rule itself lives
//! only in `taskhub_core::visibility`.

use std::collections::HashMap;

use sqlx::PgPool;
use taskhub_core::types::DbId;
use taskhub_core::visibility::{ProjectScope, TaskScope};

/// Loads [`ProjectScope`] / [`TaskScope`] snapshots.
pub struct ScopeRepo;

#[derive(Debug, sqlx::FromRow)]
struct ProjectRow {
    id: DbId,
    leader_id: DbId,
    created_by: DbId,
}

impl ScopeRepo {
    /// Load scopes for every project, in creation order (newest first).
    pub async fn load_all(pool: &PgPool) -> Result<Vec<ProjectScope>, sqlx::Error> {
        let projects = sqlx::query_as::<_, ProjectRow>(
            "SELECT id, leader_id, created_by FROM projects ORDER BY created_at DESC",
        )
        .fetch_all(pool)
        .await?;

        let members: Vec<(DbId, DbId)> =
            sqlx::query_as("SELECT project_id, user_id FROM project_members")
                .fetch_all(pool)
                .await?;

        let assignees: Vec<(DbId, DbId)> = sqlx::query_as(
            "SELECT DISTINCT project_id, assignee_id FROM tasks WHERE assignee_id IS NOT NULL",
        )
        .fetch_all(pool)
        .await?;

        let mut member_map: HashMap<DbId, Vec<DbId>> = HashMap::new();
        for (project_id, user_id) in members {
            member_map.entry(project_id).or_default().push(user_id);
        }
        let mut assignee_map: HashMap<DbId, Vec<DbId>> = HashMap::new();
        for (project_id, user_id) in assignees {
            assignee_map.entry(project_id).or_default().push(user_id);
        }

        Ok(projects
            .into_iter()
            .map(|p| ProjectScope {
                id: p.id,
                leader_id: p.leader_id,
                created_by: p.created_by,
                member_ids: member_map.remove(&p.id).unwrap_or_default(),
                assignee_ids: assignee_map.remove(&p.id).unwrap_or_default(),
            })
            .collect())
    }

    /// Load the scope for one project. Returns `None` if it does not exist.
    pub async fn load(pool: &PgPool, project_id: DbId) -> Result<Option<ProjectScope>, sqlx::Error> {
        let project = sqlx::query_as::<_, ProjectRow>(
            "SELECT id, leader_id, created_by FROM projects WHERE id = $1",
        )
        .bind(project_id)
        .fetch_optional(pool)
        .await?;

        let Some(p) = project else {
            return Ok(None);
        };

        let members: Vec<(DbId,)> =
            sqlx::query_as("SELECT user_id FROM project_members WHERE project_id = $1")
                .bind(project_id)
                .fetch_all(pool)
                .await?;

        let assignees: Vec<(DbId,)> = sqlx::query_as(
            "SELECT DISTINCT assignee_id FROM tasks
             WHERE project_id = $1 AND assignee_id IS NOT NULL",
        )
        .bind(project_id)
        .fetch_all(pool)
        .await?;

        Ok(Some(ProjectScope {
            id: p.id,
            leader_id: p.leader_id,
            created_by: p.created_by,
            member_ids: members.into_iter().map(|r| r.0).collect(),
            assignee_ids: assignees.into_iter().map(|r| r.0).collect(),
        }))
    }

    /// Load the scope for one task. Returns `None` if it does not exist.
    pub async fn load_task(pool: &PgPool, task_id: DbId) -> Result<Option<TaskScope>, sqlx::Error> {
        let row: Option<(DbId, DbId, Option<DbId>)> =
            sqlx::query_as("SELECT id, project_id, assignee_id FROM tasks WHERE id = $1")
                .bind(task_id)
                .fetch_optional(pool)
                .await?;

        Ok(row.map(|(id, project_id, assignee_id)| TaskScope {
            id,
            project_id,
            assignee_id,
        }))
    }
}
