//! Repository for the `task_comments` table.

use sqlx::PgPool;
use taskhub_core::types::DbId;

use crate::models::comment::{Comment, CommentWithAuthor};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, task_id, user_id, body, created_at, updated_at";

/// Provides CRUD operations for task comments.
pub struct CommentRepo;

impl CommentRepo {
    /// Insert a new comment, returning the created row.
    pub async fn create(
        pool: &PgPool,
        task_id: DbId,
        user_id: DbId,
        body: &str,
    ) -> Result<Comment, sqlx::Error> {
        let query = format!(
            "INSERT INTO task_comments (task_id, user_id, body)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(task_id)
            .bind(user_id)
            .bind(body)
            .fetch_one(pool)
            .await
    }

    /// Find a comment by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Comment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM task_comments WHERE id = $1");
        sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a task's comments with author names, newest first.
    pub async fn list_by_task(
        pool: &PgPool,
        task_id: DbId,
    ) -> Result<Vec<CommentWithAuthor>, sqlx::Error> {
        sqlx::query_as::<_, CommentWithAuthor>(
            "SELECT c.id, c.task_id, c.user_id, u.name AS author_name,
                    c.body, c.created_at, c.updated_at
             FROM task_comments c
             JOIN users u ON u.id = c.user_id
             WHERE c.task_id = $1
             ORDER BY c.created_at DESC",
        )
        .bind(task_id)
        .fetch_all(pool)
        .await
    }

    /// Replace a comment's body. Returns `None` if no row exists.
    pub async fn update_body(
        pool: &PgPool,
        id: DbId,
        body: &str,
    ) -> Result<Option<Comment>, sqlx::Error> {
        let query = format!(
            "UPDATE task_comments SET body = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .bind(body)
            .fetch_optional(pool)
            .await
    }

    /// Delete a comment by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM task_comments WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
