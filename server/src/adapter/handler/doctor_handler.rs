use axum::extract::{Path, State};
use axum::response::IntoResponse;
use serde::Deserialize;
use validator::Validate;

use super::{created, ok, AppState};
use crate::adapter::extract::ValidatedJson;
use crate::domain::entity::doctor::{DoctorUpdate, NewDoctor};
use crate::domain::error::AppError;

/// POST /api/v1/doctors のリクエストボディ。
/// フィールド名はフロントエンドの camelCase に合わせる。
#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDoctorRequest {
    #[validate(required(message = "firstName is required"))]
    pub first_name: Option<String>,
    #[validate(required(message = "lastName is required"))]
    pub last_name: Option<String>,
    #[validate(
        required(message = "email is required"),
        email(message = "email must be a valid email address")
    )]
    pub email: Option<String>,
    #[validate(
        required(message = "password is required"),
        length(min = 8, message = "password must be at least 8 characters")
    )]
    pub password: Option<String>,
    #[validate(required(message = "role is required"))]
    pub role: Option<String>,
    #[validate(required(message = "salary is required"))]
    pub salary: Option<f64>,
    #[validate(required(message = "isMedicalDirector is required"))]
    pub is_medical_director: Option<bool>,
    #[validate(required(message = "specialization is required"))]
    pub specialization: Option<String>,
}

/// PUT /api/v1/doctors/{id} のリクエストボディ。部分更新。
#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDoctorRequest {
    #[validate(length(min = 1, message = "firstName cannot be empty"))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, message = "lastName cannot be empty"))]
    pub last_name: Option<String>,
    pub salary: Option<f64>,
    pub is_medical_director: Option<bool>,
    #[validate(length(min = 1, message = "specialization cannot be empty"))]
    pub specialization: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/v1/doctors",
    request_body = CreateDoctorRequest,
    responses(
        (status = 201, description = "Doctor created"),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Not authenticated or role not allowed"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_doctor(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateDoctorRequest>,
) -> Result<impl IntoResponse, AppError> {
    let password = req.password.unwrap_or_default();
    let doctor = NewDoctor {
        first_name: req.first_name.unwrap_or_default(),
        last_name: req.last_name.unwrap_or_default(),
        email: req.email.unwrap_or_default(),
        role: req.role.unwrap_or_default(),
        salary: req.salary.unwrap_or_default(),
        is_medical_director: req.is_medical_director.unwrap_or_default(),
        specialization: req.specialization.unwrap_or_default(),
    };

    let doctor = state.doctor_uc.create(doctor, &password).await?;
    Ok(created(doctor))
}

#[utoipa::path(
    get,
    path = "/api/v1/doctors",
    responses(
        (status = 200, description = "All doctors"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_doctors(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let doctors = state.doctor_uc.list().await?;
    Ok(ok(doctors))
}

#[utoipa::path(
    get,
    path = "/api/v1/doctors/{id}",
    params(("id" = String, Path, description = "Doctor ID")),
    responses(
        (status = 200, description = "Doctor found"),
        (status = 400, description = "Doctor not found"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_doctor(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let doctor = state.doctor_uc.get(&id).await?;
    Ok(ok(doctor))
}

#[utoipa::path(
    put,
    path = "/api/v1/doctors/{id}",
    params(("id" = String, Path, description = "Doctor ID")),
    request_body = UpdateDoctorRequest,
    responses(
        (status = 200, description = "Doctor updated"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_doctor(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateDoctorRequest>,
) -> Result<impl IntoResponse, AppError> {
    let update = DoctorUpdate {
        first_name: req.first_name,
        last_name: req.last_name,
        salary: req.salary,
        is_medical_director: req.is_medical_director,
        specialization: req.specialization,
    };

    let doctor = state.doctor_uc.update(&id, update).await?;
    Ok(ok(doctor))
}

#[utoipa::path(
    delete,
    path = "/api/v1/doctors/{id}",
    params(("id" = String, Path, description = "Doctor ID")),
    responses(
        (status = 200, description = "Doctor deleted"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_doctor(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.doctor_uc.delete(&id).await?;
    Ok(ok(serde_json::json!({ "message": "Doctor deleted successfully" })))
}
