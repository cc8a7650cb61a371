//! Notifications endpoints.

use axum::{
    Router,
    extract::{Path, State},
    routing::{get, patch},
};
use lectro_common::AppResult;
use lectro_db::entities::notification::Model as NotificationModel;
use serde::Serialize;

use crate::{
    extractors::AuthUser,
    middleware::AppState,
    response::{ApiResponse, MessageResponse},
};

/// Mark all as read response.
#[derive(Serialize)]
pub struct MarkAllAsReadResponse {
    pub message: String,
    pub count: u64,
}

/// Unread count response.
#[derive(Serialize)]
pub struct UnreadCountResponse {
    pub count: u64,
}

/// Most recent notifications for the authenticated user.
async fn get_notifications(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<NotificationModel>>> {
    let notifications = state.notification_service.list_for_user(user.id()).await?;
    Ok(ApiResponse::ok(notifications))
}

/// Mark a notification as read.
async fn mark_as_read(
    user: AuthUser,
    State(state): State<AppState>,
    Path(notification_id): Path<String>,
) -> AppResult<ApiResponse<MessageResponse>> {
    state
        .notification_service
        .mark_as_read(user.id(), &notification_id)
        .await?;
    Ok(ApiResponse::ok(MessageResponse::new(
        "Notification marked as read",
    )))
}

/// Mark all notifications as read.
async fn mark_all_as_read(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<MarkAllAsReadResponse>> {
    let count = state
        .notification_service
        .mark_all_as_read(user.id())
        .await?;
    Ok(ApiResponse::ok(MarkAllAsReadResponse {
        message: "All notifications marked as read".to_string(),
        count,
    }))
}

/// Get unread notification count.
async fn unread_count(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<UnreadCountResponse>> {
    let count = state.notification_service.count_unread(user.id()).await?;
    Ok(ApiResponse::ok(UnreadCountResponse { count }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_notifications))
        .route("/unread-count", get(unread_count))
        .route("/read-all", patch(mark_all_as_read))
        .route("/{notification_id}/read", patch(mark_as_read))
}
