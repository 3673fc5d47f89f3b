use std::sync::Arc;

use crate::domain::entity::patient::{NewPatient, Patient, PatientUpdate};
use crate::domain::error::AppError;
use crate::domain::repository::PatientRepository;

/// PatientUseCases は患者リソースの CRUD ユースケース。
pub struct PatientUseCases {
    repo: Arc<dyn PatientRepository>,
}

impl PatientUseCases {
    pub fn new(repo: Arc<dyn PatientRepository>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, patient: NewPatient) -> Result<Patient, AppError> {
        self.repo
            .create(&patient)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    pub async fn get(&self, id: &str) -> Result<Patient, AppError> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::not_found("patient", id))
    }

    pub async fn list(&self) -> Result<Vec<Patient>, AppError> {
        self.repo
            .list()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    pub async fn update(&self, id: &str, update: PatientUpdate) -> Result<Patient, AppError> {
        self.repo
            .update(id, &update)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::not_found("patient", id))
    }

    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        let deleted = self
            .repo
            .delete(id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        if deleted {
            Ok(())
        } else {
            Err(AppError::not_found("patient", id))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repository::patient_repository::MockPatientRepository;

    #[tokio::test]
    async fn test_get_unknown_id_is_not_found() {
        let mut mock = MockPatientRepository::new();
        mock.expect_find_by_id().returning(|_| Ok(None));

        let uc = PatientUseCases::new(Arc::new(mock));
        let err = uc.get("missing-id").await.unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_list_maps_repository_failure_to_database_error() {
        let mut mock = MockPatientRepository::new();
        mock.expect_list()
            .returning(|| Err(anyhow::anyhow!("connection refused")));

        let uc = PatientUseCases::new(Arc::new(mock));
        assert!(matches!(
            uc.list().await.unwrap_err(),
            AppError::Database(_)
        ));
    }
}
