use std::sync::Arc;

use crate::domain::entity::appointment::{Appointment, AppointmentUpdate, NewAppointment};
use crate::domain::error::AppError;
use crate::domain::repository::AppointmentRepository;

/// AppointmentUseCases は予約リソースの CRUD ユースケース。
pub struct AppointmentUseCases {
    repo: Arc<dyn AppointmentRepository>,
}

impl AppointmentUseCases {
    pub fn new(repo: Arc<dyn AppointmentRepository>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, appointment: NewAppointment) -> Result<Appointment, AppError> {
        self.repo
            .create(&appointment)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    pub async fn get(&self, id: i64) -> Result<Appointment, AppError> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::not_found("appointment", &id.to_string()))
    }

    pub async fn list(&self) -> Result<Vec<Appointment>, AppError> {
        self.repo
            .list()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    pub async fn update(&self, id: i64, update: AppointmentUpdate) -> Result<Appointment, AppError> {
        self.repo
            .update(id, &update)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::not_found("appointment", &id.to_string()))
    }

    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        let deleted = self
            .repo
            .delete(id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        if deleted {
            Ok(())
        } else {
            Err(AppError::not_found("appointment", &id.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repository::appointment_repository::MockAppointmentRepository;

    #[tokio::test]
    async fn test_delete_reports_missing_target() {
        let mut mock = MockAppointmentRepository::new();
        mock.expect_delete().returning(|_| Ok(false));

        let uc = AppointmentUseCases::new(Arc::new(mock));
        assert!(uc.delete(42).await.is_err());
    }
}
