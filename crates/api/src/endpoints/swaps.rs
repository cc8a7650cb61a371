//! Swap request endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch, post},
};
use lectro_common::AppResult;
use lectro_core::{CreateSwapInput, SwapDecision, SwapOutcome, SwapResponder};
use lectro_db::{
    entities::{swap_request, user::UserRole},
    repositories::PendingSwapRow,
};
use serde::Deserialize;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Answer to a swap request.
#[derive(Debug, Deserialize)]
pub struct RespondRequest {
    pub status: SwapDecision,
}

/// Propose a swap for one of the caller's classes.
async fn create_swap(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateSwapInput>,
) -> AppResult<(StatusCode, ApiResponse<swap_request::Model>)> {
    user.require_role(&[UserRole::Lecturer])?;

    let swap = state.swap_service.create(user.id(), input).await?;

    Ok(ApiResponse::created(swap))
}

/// Requests waiting on the caller.
async fn pending_swaps(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<PendingSwapRow>>> {
    let responder = SwapResponder::from_role(user.id(), user.role())?;

    let rows = state.swap_service.list_pending(&responder).await?;

    Ok(ApiResponse::ok(rows))
}

/// Accept or reject a swap request.
async fn respond_to_swap(
    user: AuthUser,
    State(state): State<AppState>,
    Path(swap_id): Path<String>,
    Json(req): Json<RespondRequest>,
) -> AppResult<ApiResponse<SwapOutcome>> {
    let responder = SwapResponder::from_role(user.id(), user.role())?;

    let outcome = state
        .swap_service
        .respond(&swap_id, &responder, req.status)
        .await?;

    Ok(ApiResponse::ok(outcome))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_swap))
        .route("/pending", get(pending_swaps))
        .route("/{swap_id}/respond", patch(respond_to_swap))
}
