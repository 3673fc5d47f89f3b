pub mod supabase;

pub use supabase::{SupabaseClient, SupabaseConfig};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::entity::principal::Principal;

/// ProviderSession は認証基盤が発行するセッション（トークン一式）を表す。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProviderSession {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub refresh_token: String,
    pub user: Principal,
}

/// IdentityProvider はトークン検証とセッション操作を外部認証基盤へ委譲する
/// ための境界トレイト。リクエストあたりの呼び出しは高々 1 回。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// アクセストークンを検証し、認証主体を返す。
    async fn verify_token(&self, access_token: &str) -> anyhow::Result<Principal>;

    /// メールアドレスとパスワードでサインインし、セッションを発行する。
    async fn sign_in(&self, email: &str, password: &str) -> anyhow::Result<ProviderSession>;

    /// リフレッシュトークンからセッションを再発行する。
    async fn refresh_session(&self, refresh_token: &str) -> anyhow::Result<ProviderSession>;

    /// 提示されたアクセストークンのセッションを失効させる。
    async fn sign_out(&self, access_token: &str) -> anyhow::Result<()>;

    /// 管理 API で認証ユーザーを作成し、ユーザー ID を返す。
    async fn admin_create_user(&self, email: &str, password: &str) -> anyhow::Result<String>;
}
