use std::future::Future;
use std::pin::Pin;

use axum::{body::Body, http::Request, middleware::Next, response::Response};

use crate::domain::entity::principal::Principal;
use crate::domain::error::{AppError, AuthError};
use crate::domain::service::AccessPolicy;

/// require_role はルート登録時に許可ロール一覧を宣言するためのミドルウェア
/// ファクトリ。allow-list は静的に宣言され、動的には計算しない。
pub fn require_role(
    allowed: &'static [&'static str],
) -> impl Fn(
    Request<Body>,
    Next,
) -> Pin<Box<dyn Future<Output = Result<Response, AppError>> + Send>>
       + Clone {
    move |req: Request<Body>, next: Next| Box::pin(role_check(req, next, allowed))
}

/// Core role check logic. Called from require_role.
pub async fn role_check(
    req: Request<Body>,
    next: Next,
    allowed: &'static [&'static str],
) -> Result<Response, AppError> {
    let principal = req
        .extensions()
        .get::<Principal>()
        .cloned()
        .ok_or_else(|| {
            AppError::Auth(AuthError::unauthorized(
                "Authentication is required. Please provide a valid Bearer token.",
                None,
            ))
        })?;

    if AccessPolicy::is_allowed(principal.role(), allowed) {
        Ok(next.run(req).await)
    } else {
        tracing::warn!(
            user_id = %principal.id,
            role = ?principal.role(),
            required = ?allowed,
            "role not in allow-list"
        );
        Err(AppError::Auth(AuthError::denied(
            "Insufficient permissions for the requested resource",
            Some(serde_json::json!({
                "required": allowed,
                "role": principal.role(),
            })),
        )))
    }
}
