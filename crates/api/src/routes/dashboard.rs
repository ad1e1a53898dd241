//! Route definitions for the dashboard endpoint.

use axum::routing::get;
use axum::Router;

use crate::handlers::dashboard;
use crate::state::AppState;

/// Routes mounted at `/dashboard`.
///
/// ```text
/// GET  /   -> stats (role-scoped, fail-soft)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(dashboard::stats))
}
