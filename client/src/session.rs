use std::sync::Mutex;

/// SessionStore は保存済み資格情報（bearer トークン）への明示的な境界。
/// クライアントはコンストラクタでこのストアを受け取り、隠れた
/// グローバル状態には依存しない。プロセス内共有の実装はあくまで
/// このトレイトの一実装にすぎない。
#[cfg_attr(feature = "mock", mockall::automock)]
pub trait SessionStore: Send + Sync {
    /// 保存済みトークンを返す。無ければ None（エラーではない）。
    fn token(&self) -> Option<String>;

    fn store(&self, token: &str);

    /// 保存済みトークンを破棄する。既に無い状態で呼んでも安全。
    fn clear(&self);
}

/// MemorySession はプロセス内メモリに 1 つのトークンを持つ実装。
#[derive(Debug, Default)]
pub struct MemorySession {
    token: Mutex<Option<String>>,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySession {
    fn token(&self) -> Option<String> {
        self.token.lock().ok().and_then(|guard| guard.clone())
    }

    fn store(&self, token: &str) {
        if let Ok(mut guard) = self.token.lock() {
            *guard = Some(token.to_string());
        }
    }

    fn clear(&self) {
        if let Ok(mut guard) = self.token.lock() {
            *guard = None;
        }
    }
}
