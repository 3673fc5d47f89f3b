use thiserror::Error;

/// ApiError はサーバのエラーエンベロープから正規化した 1 つのエラー形式。
/// どのバックエンドエラーが元でも、呼び出し側はこの形だけを扱えばよい。
#[derive(Debug, Clone, Error)]
#[error("{error_type}: {message} (status {status})")]
pub struct ApiError {
    /// UserMessage に相当する、人が読むメッセージ。
    pub message: String,
    /// ErrorType に相当する機械判別用の種別。
    pub error_type: String,
    /// context に相当するフィールド別詳細など。
    pub details: Option<serde_json::Value>,
    /// subErrorType に相当するヒント（例: MissingToken）。
    pub hint: Option<String>,
    pub status: u16,
}

impl ApiError {
    /// 認証エラーかどうか。UI はこれでログイン画面への誘導を判断できる。
    pub fn is_authentication_error(&self) -> bool {
        self.error_type == "AuthenticationError"
    }
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("接続エラー: {0}")]
    Connection(String),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("無効なレスポンス: {0}")]
    InvalidResponse(String),
}
