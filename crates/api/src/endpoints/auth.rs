//! Authentication endpoints.

use axum::{Json, Router, extract::State, routing::post};
use lectro_common::AppResult;
use lectro_core::SignInResponse;
use serde::Deserialize;
use validator::Validate;

use crate::{middleware::AppState, response::ApiResponse};

/// Signin request.
#[derive(Debug, Deserialize, Validate)]
pub struct SigninRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

/// Sign in with email and password.
async fn signin(
    State(state): State<AppState>,
    Json(req): Json<SigninRequest>,
) -> AppResult<ApiResponse<SignInResponse>> {
    req.validate()?;

    let response = state
        .auth_service
        .sign_in(&req.email, &req.password)
        .await?;

    Ok(ApiResponse::ok(response))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/signin", post(signin))
}
