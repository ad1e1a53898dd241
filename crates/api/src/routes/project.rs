//! Route definitions for the `/projects` resource.
//!
//! Also nests task and comment routes under `/projects/{project_id}/...`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{comment, project, task};
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /                                        -> list
/// POST   /                                        -> create
/// GET    /{id}                                    -> get_by_id
/// PUT    /{id}                                    -> update
/// DELETE /{id}                                    -> delete
/// GET    /{id}/members                            -> list_members
///
/// GET    /{project_id}/tasks                      -> list_by_project
/// POST   /{project_id}/tasks                      -> create
/// GET    /{project_id}/tasks/{id}                 -> get_by_id
/// PUT    /{project_id}/tasks/{id}                 -> update
/// DELETE /{project_id}/tasks/{id}                 -> delete
/// POST   /{project_id}/tasks/{id}/status          -> transition
///
/// GET    /{project_id}/tasks/{task_id}/comments       -> list_by_task
/// POST   /{project_id}/tasks/{task_id}/comments       -> create
/// PUT    /{project_id}/tasks/{task_id}/comments/{id}  -> update
/// DELETE /{project_id}/tasks/{task_id}/comments/{id}  -> delete
/// ```
pub fn router() -> Router<AppState> {
    let comment_routes = Router::new()
        .route("/", get(comment::list_by_task).post(comment::create))
        .route(
            "/{id}",
            axum::routing::put(comment::update).delete(comment::delete),
        );

    let task_routes = Router::new()
        .route("/", get(task::list_by_project).post(task::create))
        .route(
            "/{id}",
            get(task::get_by_id).put(task::update).delete(task::delete),
        )
        .route("/{id}/status", post(task::transition))
        .nest("/{task_id}/comments", comment_routes);

    Router::new()
        .route("/", get(project::list).post(project::create))
        .route(
            "/{id}",
            get(project::get_by_id)
                .put(project::update)
                .delete(project::delete),
        )
        .route("/{id}/members", get(project::list_members))
        .nest("/{project_id}/tasks", task_routes)
}
