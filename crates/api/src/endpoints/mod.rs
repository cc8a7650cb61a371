//! API endpoints.

mod auth;
mod notifications;
mod swaps;
mod timetables;

use axum::Router;

use crate::middleware::AppState;

/// Liveness check served at the site root.
pub async fn health() -> &'static str {
    "Lectro API is running!"
}

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/swaps", swaps::router())
        .nest("/notifications", notifications::router())
        .nest("/timetables", timetables::router())
}
