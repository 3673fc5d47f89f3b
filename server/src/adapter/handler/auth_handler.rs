use axum::extract::State;
use axum::http::{header, HeaderMap};
use axum::response::IntoResponse;
use axum::{Extension, Json};
use serde::Deserialize;
use validator::Validate;

use super::{ok, AppState};
use crate::adapter::extract::ValidatedJson;
use crate::domain::entity::principal::Principal;
use crate::domain::error::AppError;

#[utoipa::path(
    get,
    path = "/healthz",
    responses(
        (status = 200, description = "Health check OK"),
    )
)]
pub async fn healthz() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// POST /api/v1/auth/login のリクエストボディ。
#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct LoginRequest {
    #[validate(
        required(message = "email is required"),
        email(message = "email must be a valid email address")
    )]
    pub email: Option<String>,
    #[validate(required(message = "password is required"))]
    pub password: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login succeeded, session in data"),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Invalid credentials"),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    // required() 検証済みなので unwrap_or_default は到達しない既定値。
    let email = req.email.unwrap_or_default();
    let password = req.password.unwrap_or_default();

    let session = state.session_uc.login(&email, &password).await?;
    Ok(ok(session))
}

/// POST /api/v1/auth/refresh のリクエストボディ。
#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    #[validate(required(message = "refreshToken is required"))]
    pub refresh_token: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/refresh",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "New session in data"),
        (status = 401, description = "Invalid refresh token"),
    )
)]
pub async fn refresh(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RefreshRequest>,
) -> Result<impl IntoResponse, AppError> {
    let refresh_token = req.refresh_token.unwrap_or_default();
    let session = state.session_uc.refresh(&refresh_token).await?;
    Ok(ok(session))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    responses(
        (status = 200, description = "Logged out"),
        (status = 401, description = "Not authenticated"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn logout(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    // auth_middleware を通過済みなのでヘッダーは必ず Bearer 形式。
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .unwrap_or_default();

    state.session_uc.logout(token).await?;
    tracing::info!(user_id = %principal.id, "user logged out");

    Ok(ok(serde_json::json!({ "message": "Logged out successfully" })))
}
