//! Repository for the `projects` table.
//!
//! Creation, member sync, and deletion are multi-statement writes and run
//! inside a single transaction. Deletion cascades explicitly (comments,
//! then tasks, then memberships, then the project) instead of relying on
//! storage-level ON DELETE CASCADE.

use sqlx::PgPool;
use taskhub_core::types::DbId;

use crate::models::project::{CreateProject, Project, UpdateProject};
use crate::repositories::MembershipRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, status, start_date, end_date, \
                       leader_id, created_by, created_at, updated_at";

/// Provides CRUD operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project with its initial member set, returning the
    /// created row. Runs in one transaction so the project never exists
    /// without its members.
    ///
    /// If `status` is `None` in the input, defaults to `planning`.
    pub async fn create(
        pool: &PgPool,
        input: &CreateProject,
        created_by: DbId,
    ) -> Result<Project, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO projects (name, description, status, start_date, end_date, leader_id, created_by)
             VALUES ($1, $2, COALESCE($3, 'planning'), $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        let project = sqlx::query_as::<_, Project>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.status)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(input.leader_id)
            .bind(created_by)
            .fetch_one(&mut *tx)
            .await?;

        MembershipRepo::attach(&mut tx, project.id, &input.member_ids).await?;

        tx.commit().await?;
        Ok(project)
    }

    /// Find a project by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all projects ordered by most recently created first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects ORDER BY created_at DESC");
        sqlx::query_as::<_, Project>(&query).fetch_all(pool).await
    }

    /// Update a project. Only non-`None` fields in `input` are applied.
    ///
    /// A present `leader_id` replaces the leader in the same UPDATE, so the
    /// row never passes through a null-leader state. A present `member_ids`
    /// syncs the member set inside the same transaction. Returns `None` if
    /// no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE projects SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                status = COALESCE($4, status),
                start_date = COALESCE($5, start_date),
                end_date = COALESCE($6, end_date),
                leader_id = COALESCE($7, leader_id),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let project = sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.status)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(input.leader_id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(project) = project else {
            tx.rollback().await?;
            return Ok(None);
        };

        if let Some(desired) = &input.member_ids {
            MembershipRepo::sync_in(&mut tx, id, desired).await?;
        }

        tx.commit().await?;
        Ok(Some(project))
    }

    /// Delete a project and everything under it: comments, tasks,
    /// memberships, then the project row, all in one transaction.
    ///
    /// Returns `true` if the project existed.
    pub async fn delete_cascade(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query(
            "DELETE FROM task_comments
             WHERE task_id IN (SELECT id FROM tasks WHERE project_id = $1)",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM tasks WHERE project_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        MembershipRepo::detach_all(&mut tx, id).await?;

        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}
