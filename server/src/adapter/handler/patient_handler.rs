use axum::extract::{Path, State};
use axum::response::IntoResponse;
use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use super::{created, ok, AppState};
use crate::adapter::extract::ValidatedJson;
use crate::domain::entity::patient::{NewPatient, PatientUpdate};
use crate::domain::error::AppError;

/// POST /api/v1/patients のリクエストボディ。
/// フィールド名はフロントエンドの PatientFormData（snake_case）に合わせる。
#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct CreatePatientRequest {
    pub patient_id: Option<String>,
    #[validate(required(message = "name is required"))]
    pub name: Option<String>,
    #[validate(required(message = "address is required"))]
    pub address: Option<String>,
    #[validate(required(message = "phone_number is required"))]
    pub phone_number: Option<String>,
    #[validate(required(message = "profession is required"))]
    pub profession: Option<String>,
    #[validate(
        required(message = "children_number is required"),
        range(min = 0, message = "children_number cannot be negative")
    )]
    pub children_number: Option<i32>,
    #[validate(required(message = "family_situation is required"))]
    pub family_situation: Option<String>,
    #[validate(required(message = "birth_date is required"))]
    pub birth_date: Option<NaiveDate>,
}

/// PUT /api/v1/patients/{id} のリクエストボディ。部分更新。
#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct UpdatePatientRequest {
    #[validate(length(min = 1, message = "name cannot be empty"))]
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone_number: Option<String>,
    pub profession: Option<String>,
    #[validate(range(min = 0, message = "children_number cannot be negative"))]
    pub children_number: Option<i32>,
    pub family_situation: Option<String>,
    pub birth_date: Option<NaiveDate>,
}

#[utoipa::path(
    post,
    path = "/api/v1/patients",
    request_body = CreatePatientRequest,
    responses(
        (status = 201, description = "Patient created"),
        (status = 400, description = "Validation failed"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_patient(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreatePatientRequest>,
) -> Result<impl IntoResponse, AppError> {
    let patient = NewPatient {
        patient_id: req.patient_id,
        name: req.name.unwrap_or_default(),
        address: req.address.unwrap_or_default(),
        phone_number: req.phone_number.unwrap_or_default(),
        profession: req.profession.unwrap_or_default(),
        children_number: req.children_number.unwrap_or_default(),
        family_situation: req.family_situation.unwrap_or_default(),
        birth_date: req.birth_date.unwrap_or_default(),
    };

    let patient = state.patient_uc.create(patient).await?;
    Ok(created(patient))
}

#[utoipa::path(
    get,
    path = "/api/v1/patients",
    responses(
        (status = 200, description = "All patients"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_patients(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let patients = state.patient_uc.list().await?;
    Ok(ok(patients))
}

#[utoipa::path(
    get,
    path = "/api/v1/patients/{id}",
    params(("id" = String, Path, description = "Patient ID")),
    responses(
        (status = 200, description = "Patient found"),
        (status = 400, description = "Patient not found"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let patient = state.patient_uc.get(&id).await?;
    Ok(ok(patient))
}

#[utoipa::path(
    put,
    path = "/api/v1/patients/{id}",
    params(("id" = String, Path, description = "Patient ID")),
    request_body = UpdatePatientRequest,
    responses(
        (status = 200, description = "Patient updated"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdatePatientRequest>,
) -> Result<impl IntoResponse, AppError> {
    let update = PatientUpdate {
        name: req.name,
        address: req.address,
        phone_number: req.phone_number,
        profession: req.profession,
        children_number: req.children_number,
        family_situation: req.family_situation,
        birth_date: req.birth_date,
    };

    let patient = state.patient_uc.update(&id, update).await?;
    Ok(ok(patient))
}

#[utoipa::path(
    delete,
    path = "/api/v1/patients/{id}",
    params(("id" = String, Path, description = "Patient ID")),
    responses(
        (status = 200, description = "Patient deleted"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.patient_uc.delete(&id).await?;
    Ok(ok(serde_json::json!({ "message": "Patient deleted successfully" })))
}
