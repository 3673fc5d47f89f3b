use async_trait::async_trait;
use axum::extract::{FromRequest, Request};
use axum::Json;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

use crate::domain::error::AppError;

/// ValidatedJson は JSON ボディの逆直列化とスキーマ検証をハンドラ前段で行う
/// extractor。検証に失敗したフィールドは最初の 1 件ではなく全件を
/// ValidationError の context に載せる。ハンドラには検証済みボディだけが届く。
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|err| {
            AppError::validation(
                "Request body is not valid JSON",
                Some(serde_json::json!({ "body": [err.body_text()] })),
            )
        })?;

        value.validate().map_err(into_validation_error)?;

        Ok(ValidatedJson(value))
    }
}

/// validator のフィールド別エラーを `field -> [messages]` の context に変換する。
fn into_validation_error(errors: ValidationErrors) -> AppError {
    let mut fields = serde_json::Map::new();
    for (field, kind) in errors.errors() {
        if let ValidationErrorsKind::Field(field_errors) = kind {
            let messages: Vec<serde_json::Value> = field_errors
                .iter()
                .map(|e| {
                    serde_json::Value::String(
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| e.code.to_string()),
                    )
                })
                .collect();
            fields.insert(field.to_string(), serde_json::Value::Array(messages));
        }
    }
    AppError::validation(
        "Request validation failed",
        Some(serde_json::Value::Object(fields)),
    )
}
