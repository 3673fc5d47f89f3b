use std::sync::Arc;

use crate::domain::entity::doctor::{Doctor, DoctorUpdate, NewDoctor};
use crate::domain::error::AppError;
use crate::domain::repository::DoctorRepository;

/// DoctorUseCases は医師リソースの CRUD ユースケース。
/// データ基盤の失敗は DatabaseError としてエラー分類へ写像する。
pub struct DoctorUseCases {
    repo: Arc<dyn DoctorRepository>,
}

impl DoctorUseCases {
    pub fn new(repo: Arc<dyn DoctorRepository>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, doctor: NewDoctor, password: &str) -> Result<Doctor, AppError> {
        self.repo
            .create(&doctor, password)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    pub async fn get(&self, id: &str) -> Result<Doctor, AppError> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::not_found("doctor", id))
    }

    pub async fn list(&self) -> Result<Vec<Doctor>, AppError> {
        self.repo
            .list()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    pub async fn update(&self, id: &str, update: DoctorUpdate) -> Result<Doctor, AppError> {
        self.repo
            .update(id, &update)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::not_found("doctor", id))
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
            Err(AppError::not_found("doctor", id))
        }
    }
}
