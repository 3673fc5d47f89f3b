use std::sync::Arc;

use crate::domain::error::{AppError, AuthError};
use crate::infrastructure::{IdentityProvider, ProviderSession};

/// SessionUseCase はログイン・リフレッシュ・ログアウトのユースケース。
pub struct SessionUseCase {
    provider: Arc<dyn IdentityProvider>,
}

impl SessionUseCase {
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        Self { provider }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<ProviderSession, AppError> {
        self.provider
            .sign_in(email, password)
            .await
            .map_err(|err| {
                tracing::warn!(error = %err, "login failed");
                AppError::Auth(AuthError::unauthorized("Invalid login credentials", None))
            })
    }

    pub async fn refresh(&self, refresh_token: &str) -> Result<ProviderSession, AppError> {
        self.provider
            .refresh_session(refresh_token)
            .await
            .map_err(|err| {
                tracing::warn!(error = %err, "token refresh failed");
                AppError::Auth(AuthError::unauthorized("Invalid refresh token", None))
            })
    }

    pub async fn logout(&self, access_token: &str) -> Result<(), AppError> {
        self.provider
            .sign_out(access_token)
            .await
            .map_err(|err| AppError::internal(err.to_string()))
    }
}
