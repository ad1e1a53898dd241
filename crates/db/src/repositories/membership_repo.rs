//! Repository for the `project_members` join table.
//!
//! The write methods take `&mut PgConnection` so project creation, update,
//! and deletion can call them inside their own transactions. [`Self::sync`]
//! wraps [`Self::sync_in`] in a transaction for standalone use.

use sqlx::{PgConnection, PgPool};
use taskhub_core::membership::{sync_diff, MemberDiff};
use taskhub_core::types::DbId;

use crate::models::membership::ProjectMember;

/// Provides membership operations for projects.
pub struct MembershipRepo;

impl MembershipRepo {
    /// List member user ids for a project.
    pub async fn list_member_ids(pool: &PgPool, project_id: DbId) -> Result<Vec<DbId>, sqlx::Error> {
        let rows: Vec<(DbId,)> = sqlx::query_as(
            "SELECT user_id FROM project_members WHERE project_id = $1 ORDER BY user_id",
        )
        .bind(project_id)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(|r| r.0).collect())
    }

    /// List full membership rows for a project, oldest attachment first.
    pub async fn list(pool: &PgPool, project_id: DbId) -> Result<Vec<ProjectMember>, sqlx::Error> {
        sqlx::query_as::<_, ProjectMember>(
            "SELECT project_id, user_id, attached_at
             FROM project_members
             WHERE project_id = $1
             ORDER BY attached_at ASC",
        )
        .bind(project_id)
        .fetch_all(pool)
        .await
    }

    /// Attach users to a project. Already-attached users are left untouched
    /// (their `attached_at` is not reset).
    pub async fn attach(
        conn: &mut PgConnection,
        project_id: DbId,
        user_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        for user_id in user_ids {
            sqlx::query(
                "INSERT INTO project_members (project_id, user_id)
                 VALUES ($1, $2)
                 ON CONFLICT ON CONSTRAINT uq_project_members_pair DO NOTHING",
            )
            .bind(project_id)
            .bind(user_id)
            .execute(&mut *conn)
            .await?;
        }
        Ok(())
    }

    /// Replace the member set atomically. Members absent from `desired`
    /// are removed, new ones added, retained ones left untouched. Returns
    /// the applied diff.
    pub async fn sync(
        pool: &PgPool,
        project_id: DbId,
        desired: &[DbId],
    ) -> Result<MemberDiff, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let diff = Self::sync_in(&mut tx, project_id, desired).await?;
        tx.commit().await?;
        Ok(diff)
    }

    /// Like [`Self::sync`] but on an existing connection, for callers that
    /// already hold a transaction.
    pub async fn sync_in(
        conn: &mut PgConnection,
        project_id: DbId,
        desired: &[DbId],
    ) -> Result<MemberDiff, sqlx::Error> {
        let current: Vec<(DbId,)> =
            sqlx::query_as("SELECT user_id FROM project_members WHERE project_id = $1")
                .bind(project_id)
                .fetch_all(&mut *conn)
                .await?;
        let current: Vec<DbId> = current.into_iter().map(|r| r.0).collect();
        let diff = sync_diff(&current, desired);

        if !diff.to_remove.is_empty() {
            sqlx::query("DELETE FROM project_members WHERE project_id = $1 AND user_id = ANY($2)")
                .bind(project_id)
                .bind(&diff.to_remove)
                .execute(&mut *conn)
                .await?;
        }
        Self::attach(conn, project_id, &diff.to_add).await?;

        Ok(diff)
    }

    /// Remove every member from a project. Idempotent; part of the project
    /// delete cascade.
    pub async fn detach_all(conn: &mut PgConnection, project_id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM project_members WHERE project_id = $1")
            .bind(project_id)
            .execute(conn)
            .await?;
        Ok(())
    }
}
