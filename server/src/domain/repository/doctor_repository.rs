use async_trait::async_trait;

use crate::domain::entity::doctor::{Doctor, DoctorUpdate, NewDoctor};

/// DoctorRepository は医師情報の永続化境界を表すリポジトリトレイト。
/// 実装は外部データ基盤（認証ユーザー + profiles + doctors）に書き込む。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DoctorRepository: Send + Sync {
    /// 認証ユーザーの作成を含めて医師を登録する。
    async fn create(&self, doctor: &NewDoctor, password: &str) -> anyhow::Result<Doctor>;

    async fn find_by_id(&self, id: &str) -> anyhow::Result<Option<Doctor>>;

    async fn list(&self) -> anyhow::Result<Vec<Doctor>>;

    async fn update(&self, id: &str, update: &DoctorUpdate) -> anyhow::Result<Option<Doctor>>;

    /// 削除できた場合は true、対象が存在しない場合は false を返す。
    async fn delete(&self, id: &str) -> anyhow::Result<bool>;
}
