pub mod admin;
pub mod auth;
pub mod dashboard;
pub mod health;
pub mod project;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                                          login (public)
/// /auth/register                                       sign-up (public)
/// /auth/me                                             current user
///
/// /admin/users                                         list, create (admin only)
/// /admin/users/{id}                                    get, update, delete
///
/// /projects                                            list, create
/// /projects/{id}                                       get, update, delete
/// /projects/{id}/members                               list member ids
/// /projects/{project_id}/tasks                         list, create
/// /projects/{project_id}/tasks/{id}                    get, update, delete
/// /projects/{project_id}/tasks/{id}/status             transition (POST)
/// /projects/{project_id}/tasks/{task_id}/comments      list, create
/// /projects/{project_id}/tasks/{task_id}/comments/{id} update, delete
///
/// /dashboard                                           role-scoped stats
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/admin", admin::router())
        .nest("/projects", project::router())
        .nest("/dashboard", dashboard::router())
}
