//! Integration tests for task CRUD, status transitions, and comments.

mod common;

use axum::http::{Method, StatusCode};
use common::{delete, expect_json, get, post, put, send, token_for};
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Test: Task creation is leader-gated; fields validated
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn task_create_rules(pool: PgPool) {
    let pm = common::seed_user(&pool, "lead", "project_manager").await;
    let alice = common::seed_user(&pool, "alice", "team_member").await;
    let outsider = common::seed_user(&pool, "eve", "team_member").await;

    let project = common::seed_project(&pool, "Alpha", pm.id, vec![alice.id]).await;
    let app = common::build_test_app(pool);

    let pm_token = token_for(pm.id, &pm.role);
    let tasks_uri = format!("/api/v1/projects/{}/tasks", project.id);

    // Members cannot create tasks, only the leader (or an admin).
    let response = post(
        app.clone(),
        &tasks_uri,
        &token_for(alice.id, &alice.role),
        json!({ "title": "Denied" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Assignee must belong to the project.
    let response = post(
        app.clone(),
        &tasks_uri,
        &pm_token,
        json!({ "title": "Wrong assignee", "assignee_id": outsider.id }),
    )
    .await;
    let body = expect_json(response, StatusCode::UNPROCESSABLE_ENTITY).await;
    assert_eq!(body["code"], "INVALID_MEMBER");

    // Invalid priority rejected.
    let response = post(
        app.clone(),
        &tasks_uri,
        &pm_token,
        json!({ "title": "Bad priority", "priority": "urgent" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Valid creation: always starts at `todo` with `medium` priority.
    let response = post(
        app,
        &tasks_uri,
        &pm_token,
        json!({ "title": "Write the report", "assignee_id": alice.id }),
    )
    .await;
    let body = expect_json(response, StatusCode::CREATED).await;
    assert_eq!(body["status"], "todo");
    assert_eq!(body["priority"], "medium");
    assert_eq!(body["assignee_id"].as_i64().unwrap(), alice.id);
    assert!(body["completed_at"].is_null());
}

// ---------------------------------------------------------------------------
// Test: Status transitions, completion stamps, and transition authorization
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn task_transitions_and_stamps(pool: PgPool) {
    let pm = common::seed_user(&pool, "lead", "project_manager").await;
    let alice = common::seed_user(&pool, "alice", "team_member").await;
    let bob = common::seed_user(&pool, "bob", "team_member").await;

    let project = common::seed_project(&pool, "Alpha", pm.id, vec![alice.id, bob.id]).await;
    let task = common::seed_task(&pool, project.id, "Ship it", Some(alice.id)).await;
    let app = common::build_test_app(pool);

    let status_uri = format!("/api/v1/projects/{}/tasks/{}/status", project.id, task.id);

    // A member who is neither leader nor assignee may not transition.
    let response = post(
        app.clone(),
        &status_uri,
        &token_for(bob.id, &bob.role),
        json!({ "status": "in_progress" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // An unknown target status is an invalid transition.
    let response = post(
        app.clone(),
        &status_uri,
        &token_for(alice.id, &alice.role),
        json!({ "status": "archived" }),
    )
    .await;
    let body = expect_json(response, StatusCode::UNPROCESSABLE_ENTITY).await;
    assert_eq!(body["code"], "INVALID_TRANSITION");

    // The assignee completes the task: stamp recorded.
    let response = post(
        app.clone(),
        &status_uri,
        &token_for(alice.id, &alice.role),
        json!({ "status": "done" }),
    )
    .await;
    let body = expect_json(response, StatusCode::OK).await;
    assert_eq!(body["status"], "done");
    assert_eq!(body["completed_by"].as_i64().unwrap(), alice.id);
    assert!(body["completed_at"].is_string());

    // The leader reopens it: stamp cleared.
    let response = post(
        app.clone(),
        &status_uri,
        &token_for(pm.id, &pm.role),
        json!({ "status": "todo" }),
    )
    .await;
    let body = expect_json(response, StatusCode::OK).await;
    assert_eq!(body["status"], "todo");
    assert!(body["completed_at"].is_null());
    assert!(body["completed_by"].is_null());

    // The leader re-completes: the stamp now names the leader.
    let response = post(
        app,
        &status_uri,
        &token_for(pm.id, &pm.role),
        json!({ "status": "done" }),
    )
    .await;
    let body = expect_json(response, StatusCode::OK).await;
    assert_eq!(body["completed_by"].as_i64().unwrap(), pm.id);
}

// ---------------------------------------------------------------------------
// Test: Task visibility follows project membership and assignment
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn task_visibility(pool: PgPool) {
    let pm = common::seed_user(&pool, "lead", "project_manager").await;
    let alice = common::seed_user(&pool, "alice", "team_member").await;
    let carol = common::seed_user(&pool, "carol", "team_member").await;

    // Carol is assigned a task but is NOT a project member.
    let project = common::seed_project(&pool, "Alpha", pm.id, vec![alice.id]).await;
    let member_task = common::seed_task(&pool, project.id, "Member work", Some(alice.id)).await;
    let assignee_task = common::seed_task(&pool, project.id, "Carol work", Some(carol.id)).await;
    let app = common::build_test_app(pool);

    // A member sees every task in the project (project-wide policy).
    let response = get(
        app.clone(),
        &format!("/api/v1/projects/{}/tasks", project.id),
        &token_for(alice.id, &alice.role),
    )
    .await;
    let body = expect_json(response, StatusCode::OK).await;
    assert_eq!(body.as_array().unwrap().len(), 2);

    // Carol sees her own task through her assignment.
    let response = get(
        app.clone(),
        &format!("/api/v1/projects/{}/tasks/{}", project.id, assignee_task.id),
        &token_for(carol.id, &carol.role),
    )
    .await;
    expect_json(response, StatusCode::OK).await;

    // But not a task assigned to someone else in a project she is no
    // member of: masked as 404.
    let response = get(
        app,
        &format!("/api/v1/projects/{}/tasks/{}", project.id, member_task.id),
        &token_for(carol.id, &carol.role),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Test: Any project participant can be the assignee, including the creator
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn task_assignee_may_be_project_creator(pool: PgPool) {
    let admin = common::seed_user(&pool, "root", "admin").await;
    let pm = common::seed_user(&pool, "lead", "project_manager").await;
    let app = common::build_test_app(pool);

    let admin_token = token_for(admin.id, &admin.role);

    // The admin creates the project, so they are its creator without being
    // the leader or on the member list.
    let response = post(
        app.clone(),
        "/api/v1/projects",
        &admin_token,
        json!({
            "name": "Founded",
            "description": "A project created through the API",
            "start_date": "2026-02-01",
            "end_date": "2026-11-30",
            "leader_id": pm.id,
            "member_ids": [],
        }),
    )
    .await;
    let project = expect_json(response, StatusCode::CREATED).await;
    let tasks_uri = format!("/api/v1/projects/{}/tasks", project["id"].as_i64().unwrap());

    let response = post(
        app,
        &tasks_uri,
        &admin_token,
        json!({ "title": "Self-assigned", "assignee_id": admin.id }),
    )
    .await;
    let task = expect_json(response, StatusCode::CREATED).await;
    assert_eq!(task["assignee_id"].as_i64(), Some(admin.id));
}

// ---------------------------------------------------------------------------
// Test: Task update is leader-gated and never changes status
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn task_update_and_delete(pool: PgPool) {
    let pm = common::seed_user(&pool, "lead", "project_manager").await;
    let alice = common::seed_user(&pool, "alice", "team_member").await;

    let project = common::seed_project(&pool, "Alpha", pm.id, vec![alice.id]).await;
    let task = common::seed_task(&pool, project.id, "Original", Some(alice.id)).await;
    let app = common::build_test_app(pool);

    let task_uri = format!("/api/v1/projects/{}/tasks/{}", project.id, task.id);

    // Members cannot edit task fields.
    let response = put(
        app.clone(),
        &task_uri,
        &token_for(alice.id, &alice.role),
        json!({ "title": "Hijacked" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // The leader edits fields; a status key in the body is simply ignored
    // by the update shape.
    let response = put(
        app.clone(),
        &task_uri,
        &token_for(pm.id, &pm.role),
        json!({ "title": "Revised", "priority": "high", "status": "done" }),
    )
    .await;
    let body = expect_json(response, StatusCode::OK).await;
    assert_eq!(body["title"], "Revised");
    assert_eq!(body["priority"], "high");
    assert_eq!(body["status"], "todo", "status must not change via update");
    // Keys absent from the body leave their fields alone.
    assert_eq!(body["assignee_id"].as_i64(), Some(alice.id));

    // An explicit null clears the assignee back to unassigned.
    let response = put(
        app.clone(),
        &task_uri,
        &token_for(pm.id, &pm.role),
        json!({ "assignee_id": null, "due_date": null }),
    )
    .await;
    let body = expect_json(response, StatusCode::OK).await;
    assert!(body["assignee_id"].is_null());
    assert!(body["due_date"].is_null());
    assert_eq!(body["title"], "Revised");

    // Delete is leader-gated too.
    let response = send(
        app.clone(),
        Method::DELETE,
        &task_uri,
        Some(&token_for(alice.id, &alice.role)),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = delete(app.clone(), &task_uri, &token_for(pm.id, &pm.role)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(app, &task_uri, &token_for(pm.id, &pm.role)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Test: Comment lifecycle and authorship rules
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn comment_authorship_rules(pool: PgPool) {
    let admin = common::seed_user(&pool, "root", "admin").await;
    let pm = common::seed_user(&pool, "lead", "project_manager").await;
    let alice = common::seed_user(&pool, "alice", "team_member").await;

    let project = common::seed_project(&pool, "Alpha", pm.id, vec![alice.id]).await;
    let task = common::seed_task(&pool, project.id, "Discuss", None).await;
    let app = common::build_test_app(pool);

    let comments_uri = format!(
        "/api/v1/projects/{}/tasks/{}/comments",
        project.id, task.id
    );

    // A member posts a comment.
    let response = post(
        app.clone(),
        &comments_uri,
        &token_for(alice.id, &alice.role),
        json!({ "body": "Looks good to me" }),
    )
    .await;
    let body = expect_json(response, StatusCode::CREATED).await;
    let comment_id = body["id"].as_i64().unwrap();

    // An over-long comment is rejected.
    let response = post(
        app.clone(),
        &comments_uri,
        &token_for(alice.id, &alice.role),
        json!({ "body": "x".repeat(1001) }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // The listing includes the author's display name.
    let response = get(app.clone(), &comments_uri, &token_for(pm.id, &pm.role)).await;
    let body = expect_json(response, StatusCode::OK).await;
    assert_eq!(body[0]["author_name"], "User alice");

    let comment_uri = format!("{comments_uri}/{comment_id}");

    // Only the author may edit, not even the leader.
    let response = put(
        app.clone(),
        &comment_uri,
        &token_for(pm.id, &pm.role),
        json!({ "body": "Rewritten" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = put(
        app.clone(),
        &comment_uri,
        &token_for(alice.id, &alice.role),
        json!({ "body": "Edited by author" }),
    )
    .await;
    let body = expect_json(response, StatusCode::OK).await;
    assert_eq!(body["body"], "Edited by author");

    // The leader may not delete someone else's comment; an admin may.
    let response = delete(app.clone(), &comment_uri, &token_for(pm.id, &pm.role)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = delete(app, &comment_uri, &token_for(admin.id, &admin.role)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}
