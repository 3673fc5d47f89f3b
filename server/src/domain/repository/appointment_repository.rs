use async_trait::async_trait;

use crate::domain::entity::appointment::{Appointment, AppointmentUpdate, NewAppointment};

/// AppointmentRepository は予約情報の永続化境界を表すリポジトリトレイト。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    async fn create(&self, appointment: &NewAppointment) -> anyhow::Result<Appointment>;

    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<Appointment>>;

    async fn list(&self) -> anyhow::Result<Vec<Appointment>>;

    async fn update(
        &self,
        id: i64,
        update: &AppointmentUpdate,
    ) -> anyhow::Result<Option<Appointment>>;

    async fn delete(&self, id: i64) -> anyhow::Result<bool>;
}
