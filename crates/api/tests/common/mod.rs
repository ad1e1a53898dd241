//! Shared harness for API integration tests.
//!
//! Builds the real application router (same middleware stack as `main.rs`)
//! on top of a per-test database, plus seeding and request helpers.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response, StatusCode};
use axum::Router;
use chrono::NaiveDate;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::PgPool;
use taskhub_core::types::DbId;
use taskhub_core::visibility::MemberTaskPolicy;
use taskhub_db::models::project::{CreateProject, Project};
use taskhub_db::models::task::{CreateTask, Task};
use taskhub_db::models::user::{CreateUser, User};
use taskhub_db::repositories::{ProjectRepo, TaskRepo, UserRepo};
use tower::ServiceExt;

use taskhub_api::auth::jwt::{generate_access_token, JwtConfig};
use taskhub_api::auth::password::hash_password;
use taskhub_api::config::ServerConfig;
use taskhub_api::router::build_app_router;
use taskhub_api::state::AppState;

/// Password used for every seeded user.
pub const TEST_PASSWORD: &str = "correct-horse-battery";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        member_task_policy: MemberTaskPolicy::ProjectWide,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 60,
        },
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool. Mirrors the production router construction.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// Generate a valid bearer token for the given user id and role string.
pub fn token_for(user_id: DbId, role: &str) -> String {
    generate_access_token(user_id, role, &test_config().jwt)
        .expect("token generation should succeed")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Send a request with optional bearer token and JSON body.
pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post(app: Router, uri: &str, token: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put(app: Router, uri: &str, token: &str, body: Value) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// Collect a response body into JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be valid JSON")
}

/// Assert status and return the JSON body in one step.
pub async fn expect_json(response: Response<Body>, status: StatusCode) -> Value {
    assert_eq!(response.status(), status);
    body_json(response).await
}

// ---------------------------------------------------------------------------
// Seeding helpers
// ---------------------------------------------------------------------------

/// Insert a user with [`TEST_PASSWORD`] and the given role.
pub async fn seed_user(pool: &PgPool, username: &str, role: &str) -> User {
    let password_hash = hash_password(TEST_PASSWORD).expect("hashing should succeed");
    UserRepo::create(
        pool,
        &CreateUser {
            name: format!("User {username}"),
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash,
            role: role.to_string(),
        },
    )
    .await
    .expect("user seed should succeed")
}

/// Insert a project led by `leader_id` with the given members.
pub async fn seed_project(
    pool: &PgPool,
    name: &str,
    leader_id: DbId,
    member_ids: Vec<DbId>,
) -> Project {
    ProjectRepo::create(
        pool,
        &CreateProject {
            name: name.to_string(),
            description: "Seeded project for integration tests".to_string(),
            status: None,
            start_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 12, 31).unwrap(),
            leader_id,
            member_ids,
        },
        leader_id,
    )
    .await
    .expect("project seed should succeed")
}

/// Insert a task in the given project.
pub async fn seed_task(
    pool: &PgPool,
    project_id: DbId,
    title: &str,
    assignee_id: Option<DbId>,
) -> Task {
    TaskRepo::create(
        pool,
        project_id,
        &CreateTask {
            title: title.to_string(),
            description: None,
            priority: None,
            assignee_id,
            due_date: None,
        },
    )
    .await
    .expect("task seed should succeed")
}
