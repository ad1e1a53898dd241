//! Repository for the `tasks` table.

use sqlx::PgPool;
use taskhub_core::lifecycle::TransitionOutcome;
use taskhub_core::types::DbId;

use crate::models::task::{CreateTask, Task, TaskCounts, UpdateTask};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, title, description, status, priority, assignee_id, \
                       due_date, completed_at, completed_by, created_at, updated_at";

/// Provides CRUD operations for tasks.
pub struct TaskRepo;

impl TaskRepo {
    /// Insert a new task. Status always starts at `todo`; the input carries
    /// no status field. If `priority` is `None`, defaults to `medium`.
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        input: &CreateTask,
    ) -> Result<Task, sqlx::Error> {
        let query = format!(
            "INSERT INTO tasks (project_id, title, description, priority, assignee_id, due_date)
             VALUES ($1, $2, $3, COALESCE($4, 'medium'), $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(project_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.priority)
            .bind(input.assignee_id)
            .bind(input.due_date)
            .fetch_one(pool)
            .await
    }

    /// Find a task by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Task>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tasks WHERE id = $1");
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all tasks in a project, most recently created first.
    pub async fn list_by_project(pool: &PgPool, project_id: DbId) -> Result<Vec<Task>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM tasks WHERE project_id = $1 ORDER BY created_at DESC");
        sqlx::query_as::<_, Task>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Update a task's editable fields. Only non-`None` fields in `input`
    /// are applied; the nullable columns distinguish "keep" from "clear"
    /// via their double `Option`. Status is never touched here; transitions
    /// go through [`TaskRepo::set_status`].
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTask,
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!(
            "UPDATE tasks SET
                title = COALESCE($2, title),
                priority = COALESCE($3, priority),
                description = CASE WHEN $4 THEN $5 ELSE description END,
                assignee_id = CASE WHEN $6 THEN $7 ELSE assignee_id END,
                due_date = CASE WHEN $8 THEN $9 ELSE due_date END,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.priority)
            .bind(input.description.is_some())
            .bind(input.description.clone().flatten())
            .bind(input.assignee_id.is_some())
            .bind(input.assignee_id.flatten())
            .bind(input.due_date.is_some())
            .bind(input.due_date.flatten())
            .fetch_optional(pool)
            .await
    }

    /// Apply a status transition outcome: status and completion stamp are
    /// written in a single UPDATE so a reader never observes `done` with a
    /// null `completed_at`.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        outcome: &TransitionOutcome,
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!(
            "UPDATE tasks SET
                status = $2,
                completed_at = $3,
                completed_by = $4,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(outcome.status.as_str())
            .bind(outcome.completed_at)
            .bind(outcome.completed_by)
            .fetch_optional(pool)
            .await
    }

    /// Delete a task and its comments in one transaction.
    ///
    /// Returns `true` if the task existed.
    pub async fn delete_cascade(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM task_comments WHERE task_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    /// Per-project total/completed task counts for the given project ids.
    /// Projects without tasks are absent from the result.
    pub async fn counts_by_projects(
        pool: &PgPool,
        project_ids: &[DbId],
    ) -> Result<Vec<TaskCounts>, sqlx::Error> {
        sqlx::query_as::<_, TaskCounts>(
            "SELECT
                 project_id,
                 COUNT(*) AS total_tasks,
                 COUNT(*) FILTER (WHERE status = 'done') AS completed_tasks
             FROM tasks
             WHERE project_id = ANY($1)
             GROUP BY project_id",
        )
        .bind(project_ids)
        .fetch_all(pool)
        .await
    }
}
