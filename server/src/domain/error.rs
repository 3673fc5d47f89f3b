use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// AuthErrorKind は認証・認可エラーの詳細種別を表す。
/// エラーレスポンスの `subErrorType` フィールドにそのまま載る。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorKind {
    MissingToken,
    InvalidToken,
    Unauthorized,
    AuthorizationDenied,
}

impl AuthErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingToken => "MissingToken",
            Self::InvalidToken => "InvalidToken",
            Self::Unauthorized => "Unauthorized",
            Self::AuthorizationDenied => "AuthorizationDenied",
        }
    }
}

/// AuthError は認証・認可に関するエラーを表す。
#[derive(Debug, Error)]
#[error("{message}")]
pub struct AuthError {
    pub kind: AuthErrorKind,
    pub message: String,
    pub context: Option<serde_json::Value>,
}

impl AuthError {
    pub fn missing_token() -> Self {
        Self {
            kind: AuthErrorKind::MissingToken,
            message: "Authorization header with a Bearer token is required".to_string(),
            context: None,
        }
    }

    pub fn invalid_token() -> Self {
        Self {
            kind: AuthErrorKind::InvalidToken,
            message: "Invalid authorization header format".to_string(),
            context: None,
        }
    }

    pub fn unauthorized(message: impl Into<String>, context: Option<serde_json::Value>) -> Self {
        Self {
            kind: AuthErrorKind::Unauthorized,
            message: message.into(),
            context,
        }
    }

    pub fn denied(message: impl Into<String>, context: Option<serde_json::Value>) -> Self {
        Self {
            kind: AuthErrorKind::AuthorizationDenied,
            message: message.into(),
            context,
        }
    }
}

/// AppError はアプリケーション全体のエラー分類を表すクローズドな集合。
/// どの層で失敗しても最終的にここへ集約され、`IntoResponse` が唯一の
/// エラーレスポンス出口になる。
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Auth(#[from] AuthError),

    #[error("{message}")]
    Validation {
        message: String,
        context: Option<serde_json::Value>,
    },

    #[error("database error: {0}")]
    Database(String),

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>, context: Option<serde_json::Value>) -> Self {
        Self::Validation {
            message: message.into(),
            context,
        }
    }

    /// 見つからないリソースは AppError ファミリ（400 系）として扱う。
    /// 404 への写像は現時点では導入しない。
    pub fn not_found(resource: &str, id: &str) -> Self {
        Self::Validation {
            message: format!("{resource} not found"),
            context: Some(serde_json::json!({ "id": id })),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

const FALLBACK_MESSAGE: &str = "An unexpected error occurred";

/// ErrorEnvelope は失敗レスポンスの固定ワイヤ形式。
/// フィールド名の大文字小文字はフロントエンドが期待する形に一致させる。
#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub success: bool,
    pub status: u16,
    pub data: Option<serde_json::Value>,
    #[serde(rename = "ErrorType")]
    pub error_type: &'static str,
    #[serde(rename = "subErrorType", skip_serializing_if = "Option::is_none")]
    pub sub_error_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<serde_json::Value>,
    #[serde(rename = "UserMessage")]
    pub user_message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // 分類は AuthError → AppError ファミリ → それ以外、の順で確定させる。
        let envelope = match self {
            AppError::Auth(err) => {
                tracing::warn!(
                    sub_error_type = err.kind.as_str(),
                    context = ?err.context,
                    "auth error: {}",
                    err.message
                );
                ErrorEnvelope {
                    success: false,
                    status: 401,
                    data: None,
                    error_type: "AuthenticationError",
                    sub_error_type: Some(err.kind.as_str()),
                    context: err.context,
                    user_message: err.message,
                }
            }
            AppError::Validation { message, context } => {
                tracing::warn!(context = ?context, "validation error: {}", message);
                ErrorEnvelope {
                    success: false,
                    status: 400,
                    data: None,
                    error_type: "ValidationError",
                    sub_error_type: None,
                    context,
                    user_message: message,
                }
            }
            AppError::Database(message) | AppError::Internal(message) => {
                tracing::error!("internal server error: {}", message);
                ErrorEnvelope {
                    success: false,
                    status: 500,
                    data: None,
                    error_type: "InternalServerError",
                    sub_error_type: None,
                    context: None,
                    user_message: if message.is_empty() {
                        FALLBACK_MESSAGE.to_string()
                    } else {
                        message
                    },
                }
            }
        };

        let status =
            StatusCode::from_u16(envelope.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(envelope)).into_response()
    }
}
