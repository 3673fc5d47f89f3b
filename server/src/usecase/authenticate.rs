use std::sync::Arc;

use crate::domain::entity::principal::Principal;
use crate::domain::error::AuthError;
use crate::infrastructure::IdentityProvider;

/// 診断用にトークン先頭から残す最大文字数。完全な資格情報はログにも
/// レスポンスにも載せない。
const TOKEN_PREFIX_LEN: usize = 10;

/// AuthenticateUseCase はアクセストークンの検証ユースケース。
/// 外部プロバイダへの呼び出しはこのユースケース経由の 1 回だけ。
pub struct AuthenticateUseCase {
    provider: Arc<dyn IdentityProvider>,
}

impl AuthenticateUseCase {
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        Self { provider }
    }

    /// トークンを検証して Principal を返す。
    /// プロバイダがエラーを返した場合・主体が得られない場合は Unauthorized
    /// とし、トークンは先頭 10 文字だけを文脈に残す。
    pub async fn execute(&self, token: &str) -> Result<Principal, AuthError> {
        match self.provider.verify_token(token).await {
            Ok(principal) => {
                tracing::info!(user_id = %principal.id, "user authenticated");
                Ok(principal)
            }
            Err(err) => {
                tracing::warn!(error = %err, "unauthorized access attempt");
                let prefix: String = token.chars().take(TOKEN_PREFIX_LEN).collect();
                Err(AuthError::unauthorized(
                    "Unauthorized access",
                    Some(serde_json::json!({ "token": prefix })),
                ))
            }
        }
    }
}
