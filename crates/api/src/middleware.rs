//! API middleware.

#![allow(missing_docs)]

use axum::{
    body::Body,
    extract::State,
    http::{Request, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use lectro_core::{AuthService, NotificationService, SwapService, TimetableService};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: AuthService,
    pub swap_service: SwapService,
    pub notification_service: NotificationService,
    pub timetable_service: TimetableService,
}

/// Authentication middleware.
///
/// Attaches verified [`lectro_core::Claims`] to the request. Requests
/// without a valid token pass through untouched and are turned away by
/// the [`crate::extractors::AuthUser`] extractor where a login is required.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get(AUTHORIZATION)
        && let Ok(auth_str) = auth_header.to_str()
    {
        // The "Bearer " prefix is optional.
        let token = auth_str.strip_prefix("Bearer ").unwrap_or(auth_str).trim();

        match state.auth_service.verify_token(token) {
            Ok(claims) => {
                req.extensions_mut().insert(claims);
            }
            Err(e) => tracing::debug!(error = %e, "Rejected bearer token"),
        }
    }

    next.run(req).await
}
