use async_trait::async_trait;

use crate::domain::entity::patient::{NewPatient, Patient, PatientUpdate};

/// PatientRepository は患者情報の永続化境界を表すリポジトリトレイト。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PatientRepository: Send + Sync {
    async fn create(&self, patient: &NewPatient) -> anyhow::Result<Patient>;

    async fn find_by_id(&self, id: &str) -> anyhow::Result<Option<Patient>>;

    async fn list(&self) -> anyhow::Result<Vec<Patient>>;

    async fn update(&self, id: &str, update: &PatientUpdate) -> anyhow::Result<Option<Patient>>;

    async fn delete(&self, id: &str) -> anyhow::Result<bool>;
}
