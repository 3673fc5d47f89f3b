use serde::{Deserialize, Serialize};

/// Principal は検証済みトークンから得られた認証主体を表す。
/// リクエストごとにプロバイダのレスポンスから生成され、request extensions
/// 経由で下流へ渡される。永続化はしない。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Principal {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    /// プロバイダが返した生のクレーム一式。
    #[serde(default)]
    pub claims: serde_json::Value,
}

impl Principal {
    /// プロバイダのユーザーオブジェクトから Principal を組み立てる。
    /// `id` を持たないレスポンスは主体不在として None を返す。
    pub fn from_claims(claims: serde_json::Value) -> Option<Self> {
        let id = claims.get("id")?.as_str()?.to_string();
        if id.is_empty() {
            return None;
        }
        let email = claims
            .get("email")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string());
        Some(Self { id, email, claims })
    }

    /// アプリケーションロールを返す。
    /// `user_metadata.role` を優先し、`app_metadata.role` にフォールバックする。
    /// どちらにも無い場合は None（認可されない）。
    pub fn role(&self) -> Option<&str> {
        self.claims
            .pointer("/user_metadata/role")
            .and_then(|v| v.as_str())
            .or_else(|| {
                self.claims
                    .pointer("/app_metadata/role")
                    .and_then(|v| v.as_str())
            })
    }
}
