//! Integration tests for the repository layer against a real database:
//! - Project creation with initial members
//! - Membership sync (diff-based, idempotent)
//! - Task status transitions and completion stamps
//! - Keep-vs-clear semantics on nullable task fields
//! - Cascade deletes (project and task)
//! - Unique constraint violations
//! - Dashboard task counts

use chrono::{NaiveDate, Utc};
use sqlx::PgPool;
use taskhub_core::lifecycle::{TaskStatus, TransitionOutcome};
use taskhub_db::models::project::{CreateProject, UpdateProject};
use taskhub_db::models::task::{CreateTask, UpdateTask};
use taskhub_db::models::user::CreateUser;
use taskhub_db::repositories::{
    CommentRepo, MembershipRepo, ProjectRepo, ScopeRepo, TaskRepo, UserRepo,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_user(username: &str, role: &str) -> CreateUser {
    CreateUser {
        name: format!("User {username}"),
        username: username.to_string(),
        email: format!("{username}@example.com"),
        password_hash: "$argon2id$fake".to_string(),
        role: role.to_string(),
    }
}

fn new_project(name: &str, leader_id: i64, member_ids: Vec<i64>) -> CreateProject {
    CreateProject {
        name: name.to_string(),
        description: "A project used in repository tests".to_string(),
        status: None,
        start_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2026, 12, 31).unwrap(),
        leader_id,
        member_ids,
    }
}

fn new_task(title: &str, assignee_id: Option<i64>) -> CreateTask {
    CreateTask {
        title: title.to_string(),
        description: None,
        priority: None,
        assignee_id,
        due_date: None,
    }
}

// ---------------------------------------------------------------------------
// Test: Project creation attaches initial members
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_create_project_with_members(pool: PgPool) {
    let leader = UserRepo::create(&pool, &new_user("lead", "project_manager"))
        .await
        .unwrap();
    let alice = UserRepo::create(&pool, &new_user("alice", "team_member"))
        .await
        .unwrap();
    let bob = UserRepo::create(&pool, &new_user("bob", "team_member"))
        .await
        .unwrap();

    let project = ProjectRepo::create(
        &pool,
        &new_project("Member Test", leader.id, vec![alice.id, bob.id]),
        leader.id,
    )
    .await
    .unwrap();
    assert_eq!(project.status, "planning"); // default
    assert_eq!(project.leader_id, leader.id);

    let members = MembershipRepo::list_member_ids(&pool, project.id)
        .await
        .unwrap();
    assert_eq!(members, vec![alice.id, bob.id]);
}

// ---------------------------------------------------------------------------
// Test: Membership sync adds and removes the right rows, idempotently
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_membership_sync(pool: PgPool) {
    let leader = UserRepo::create(&pool, &new_user("lead", "project_manager"))
        .await
        .unwrap();
    let alice = UserRepo::create(&pool, &new_user("alice", "team_member"))
        .await
        .unwrap();
    let bob = UserRepo::create(&pool, &new_user("bob", "team_member"))
        .await
        .unwrap();
    let carol = UserRepo::create(&pool, &new_user("carol", "team_member"))
        .await
        .unwrap();

    let project = ProjectRepo::create(
        &pool,
        &new_project("Sync Test", leader.id, vec![alice.id, bob.id]),
        leader.id,
    )
    .await
    .unwrap();

    let before = MembershipRepo::list(&pool, project.id).await.unwrap();
    let alice_attached_at = before
        .iter()
        .find(|m| m.user_id == alice.id)
        .unwrap()
        .attached_at;

    // Replace bob with carol, keep alice.
    let diff = MembershipRepo::sync(&pool, project.id, &[alice.id, carol.id])
        .await
        .unwrap();
    assert_eq!(diff.to_add, vec![carol.id]);
    assert_eq!(diff.to_remove, vec![bob.id]);

    let members = MembershipRepo::list_member_ids(&pool, project.id)
        .await
        .unwrap();
    assert_eq!(members, vec![alice.id, carol.id]);

    // Retained members keep their original attachment timestamp.
    let after = MembershipRepo::list(&pool, project.id).await.unwrap();
    let alice_row = after.iter().find(|m| m.user_id == alice.id).unwrap();
    assert_eq!(alice_row.attached_at, alice_attached_at);

    // Same desired set again: no changes.
    let diff = MembershipRepo::sync(&pool, project.id, &[carol.id, alice.id])
        .await
        .unwrap();
    assert!(diff.is_empty());
}

// ---------------------------------------------------------------------------
// Test: Status transitions stamp and clear completion metadata
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_task_status_stamps(pool: PgPool) {
    let leader = UserRepo::create(&pool, &new_user("lead", "project_manager"))
        .await
        .unwrap();
    let project = ProjectRepo::create(
        &pool,
        &new_project("Stamp Test", leader.id, vec![]),
        leader.id,
    )
    .await
    .unwrap();

    let task = TaskRepo::create(&pool, project.id, &new_task("Write docs", None))
        .await
        .unwrap();
    assert_eq!(task.status, "todo"); // always starts here
    assert!(task.completed_at.is_none());

    let now = Utc::now();
    let done = TaskRepo::set_status(
        &pool,
        task.id,
        &TransitionOutcome {
            status: TaskStatus::Done,
            completed_at: Some(now),
            completed_by: Some(leader.id),
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(done.status, "done");
    assert_eq!(done.completed_by, Some(leader.id));
    assert!(done.completed_at.is_some());

    // Reopening clears the stamp.
    let reopened = TaskRepo::set_status(
        &pool,
        task.id,
        &TransitionOutcome {
            status: TaskStatus::InProgress,
            completed_at: None,
            completed_by: None,
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(reopened.status, "in_progress");
    assert!(reopened.completed_at.is_none());
    assert!(reopened.completed_by.is_none());
}

// ---------------------------------------------------------------------------
// Test: Task update distinguishes "keep" from "clear" on nullable fields
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_task_update_clears_nullable_fields(pool: PgPool) {
    let leader = UserRepo::create(&pool, &new_user("lead", "project_manager"))
        .await
        .unwrap();
    let alice = UserRepo::create(&pool, &new_user("alice", "team_member"))
        .await
        .unwrap();
    let project = ProjectRepo::create(
        &pool,
        &new_project("Unassign Test", leader.id, vec![alice.id]),
        leader.id,
    )
    .await
    .unwrap();

    let mut input = new_task("Handled", Some(alice.id));
    input.due_date = NaiveDate::from_ymd_opt(2026, 6, 1);
    let task = TaskRepo::create(&pool, project.id, &input).await.unwrap();
    assert_eq!(task.assignee_id, Some(alice.id));

    // Absent fields leave the stored values alone.
    let kept = TaskRepo::update(
        &pool,
        task.id,
        &UpdateTask {
            title: Some("Handled still".to_string()),
            description: None,
            priority: None,
            assignee_id: None,
            due_date: None,
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(kept.assignee_id, Some(alice.id));
    assert_eq!(kept.due_date, NaiveDate::from_ymd_opt(2026, 6, 1));

    // Explicit nulls clear them back to the unassigned state.
    let cleared = TaskRepo::update(
        &pool,
        task.id,
        &UpdateTask {
            title: None,
            description: None,
            priority: None,
            assignee_id: Some(None),
            due_date: Some(None),
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert!(cleared.assignee_id.is_none());
    assert!(cleared.due_date.is_none());
    assert_eq!(cleared.title, "Handled still");
}

// ---------------------------------------------------------------------------
// Test: Cascade delete project removes tasks, comments, and memberships
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_cascade_delete_project(pool: PgPool) {
    let leader = UserRepo::create(&pool, &new_user("lead", "project_manager"))
        .await
        .unwrap();
    let alice = UserRepo::create(&pool, &new_user("alice", "team_member"))
        .await
        .unwrap();

    let project = ProjectRepo::create(
        &pool,
        &new_project("Cascade Test", leader.id, vec![alice.id]),
        leader.id,
    )
    .await
    .unwrap();
    let task = TaskRepo::create(&pool, project.id, &new_task("Doomed", Some(alice.id)))
        .await
        .unwrap();
    let comment = CommentRepo::create(&pool, task.id, alice.id, "last words")
        .await
        .unwrap();

    let deleted = ProjectRepo::delete_cascade(&pool, project.id).await.unwrap();
    assert!(deleted);

    assert!(TaskRepo::find_by_id(&pool, task.id).await.unwrap().is_none());
    assert!(CommentRepo::find_by_id(&pool, comment.id)
        .await
        .unwrap()
        .is_none());
    assert!(MembershipRepo::list_member_ids(&pool, project.id)
        .await
        .unwrap()
        .is_empty());
    // The member user itself survives.
    assert!(UserRepo::find_by_id(&pool, alice.id).await.unwrap().is_some());
}

// ---------------------------------------------------------------------------
// Test: Unique constraint violations
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_duplicate_project_name_rejected(pool: PgPool) {
    let leader = UserRepo::create(&pool, &new_user("lead", "project_manager"))
        .await
        .unwrap();
    ProjectRepo::create(&pool, &new_project("UniqueProj", leader.id, vec![]), leader.id)
        .await
        .unwrap();
    let result =
        ProjectRepo::create(&pool, &new_project("UniqueProj", leader.id, vec![]), leader.id).await;
    assert!(result.is_err(), "Duplicate project name should fail");
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_duplicate_username_rejected(pool: PgPool) {
    UserRepo::create(&pool, &new_user("dupe", "team_member"))
        .await
        .unwrap();
    let mut second = new_user("dupe", "team_member");
    second.email = "other@example.com".to_string();
    let result = UserRepo::create(&pool, &second).await;
    assert!(result.is_err(), "Duplicate username should fail");
}

// ---------------------------------------------------------------------------
// Test: Leader replacement and scope snapshots
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_update_leader_and_scope(pool: PgPool) {
    let old_lead = UserRepo::create(&pool, &new_user("old_lead", "project_manager"))
        .await
        .unwrap();
    let new_lead = UserRepo::create(&pool, &new_user("new_lead", "project_manager"))
        .await
        .unwrap();
    let alice = UserRepo::create(&pool, &new_user("alice", "team_member"))
        .await
        .unwrap();

    let project = ProjectRepo::create(
        &pool,
        &new_project("Handover", old_lead.id, vec![alice.id]),
        old_lead.id,
    )
    .await
    .unwrap();

    let task = TaskRepo::create(&pool, project.id, &new_task("Assigned", Some(alice.id)))
        .await
        .unwrap();

    let updated = ProjectRepo::update(
        &pool,
        project.id,
        &UpdateProject {
            name: None,
            description: None,
            status: Some("in_progress".to_string()),
            start_date: None,
            end_date: None,
            leader_id: Some(new_lead.id),
            member_ids: None,
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(updated.leader_id, new_lead.id);
    assert_eq!(updated.status, "in_progress");

    let scope = ScopeRepo::load(&pool, project.id).await.unwrap().unwrap();
    assert_eq!(scope.leader_id, new_lead.id);
    assert_eq!(scope.created_by, old_lead.id);
    assert_eq!(scope.member_ids, vec![alice.id]);
    assert_eq!(scope.assignee_ids, vec![alice.id]);

    let task_scope = ScopeRepo::load_task(&pool, task.id).await.unwrap().unwrap();
    assert_eq!(task_scope.project_id, project.id);
    assert_eq!(task_scope.assignee_id, Some(alice.id));
}

// ---------------------------------------------------------------------------
// Test: Per-project task counts for the dashboard
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_counts_by_projects(pool: PgPool) {
    let leader = UserRepo::create(&pool, &new_user("lead", "project_manager"))
        .await
        .unwrap();
    let project = ProjectRepo::create(
        &pool,
        &new_project("Counting", leader.id, vec![]),
        leader.id,
    )
    .await
    .unwrap();

    let t1 = TaskRepo::create(&pool, project.id, &new_task("One", None))
        .await
        .unwrap();
    TaskRepo::create(&pool, project.id, &new_task("Two", None))
        .await
        .unwrap();
    TaskRepo::create(&pool, project.id, &new_task("Three", None))
        .await
        .unwrap();

    TaskRepo::set_status(
        &pool,
        t1.id,
        &TransitionOutcome {
            status: TaskStatus::Done,
            completed_at: Some(Utc::now()),
            completed_by: Some(leader.id),
        },
    )
    .await
    .unwrap();

    let counts = TaskRepo::counts_by_projects(&pool, &[project.id])
        .await
        .unwrap();
    assert_eq!(counts.len(), 1);
    assert_eq!(counts[0].project_id, project.id);
    assert_eq!(counts[0].total_tasks, 3);
    assert_eq!(counts[0].completed_tasks, 1);

    // Empty id set short-circuits to no rows.
    let none = TaskRepo::counts_by_projects(&pool, &[]).await.unwrap();
    assert!(none.is_empty());
}
