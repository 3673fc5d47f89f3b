use axum::extract::{Path, State};
use axum::response::IntoResponse;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::Validate;

use super::{created, ok, AppState};
use crate::adapter::extract::ValidatedJson;
use crate::domain::entity::appointment::{AppointmentUpdate, NewAppointment};
use crate::domain::error::AppError;

/// POST /api/v1/appointments のリクエストボディ。
#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct CreateAppointmentRequest {
    #[validate(required(message = "date is required"))]
    pub date: Option<DateTime<Utc>>,
    #[validate(required(message = "doctor_id is required"))]
    pub doctor_id: Option<String>,
    #[validate(required(message = "patient_id is required"))]
    pub patient_id: Option<String>,
    pub estimated_duration: Option<String>,
    pub room_number: Option<i32>,
    pub status: Option<String>,
    pub reason: Option<String>,
}

/// PUT /api/v1/appointments/{id} のリクエストボディ。部分更新。
#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct UpdateAppointmentRequest {
    pub date: Option<DateTime<Utc>>,
    pub estimated_duration: Option<String>,
    pub room_number: Option<i32>,
    pub status: Option<String>,
    pub reason: Option<String>,
}

/// 予約 ID は数値連番。パスから取り出して検証エラーに写像する。
fn parse_appointment_id(id: &str) -> Result<i64, AppError> {
    id.parse::<i64>().map_err(|_| {
        AppError::validation(
            "invalid appointment id",
            Some(serde_json::json!({ "id": id })),
        )
    })
}

#[utoipa::path(
    post,
    path = "/api/v1/appointments",
    request_body = CreateAppointmentRequest,
    responses(
        (status = 201, description = "Appointment created"),
        (status = 400, description = "Validation failed"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_appointment(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateAppointmentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let appointment = NewAppointment {
        date: req.date.unwrap_or_default(),
        doctor_id: req.doctor_id.unwrap_or_default(),
        patient_id: req.patient_id.unwrap_or_default(),
        estimated_duration: req.estimated_duration,
        room_number: req.room_number,
        status: req.status,
        reason: req.reason,
    };

    let appointment = state.appointment_uc.create(appointment).await?;
    Ok(created(appointment))
}

#[utoipa::path(
    get,
    path = "/api/v1/appointments",
    responses(
        (status = 200, description = "All appointments"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_appointments(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let appointments = state.appointment_uc.list().await?;
    Ok(ok(appointments))
}

#[utoipa::path(
    get,
    path = "/api/v1/appointments/{id}",
    params(("id" = String, Path, description = "Appointment ID")),
    responses(
        (status = 200, description = "Appointment found"),
        (status = 400, description = "Appointment not found"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_appointment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_appointment_id(&id)?;
    let appointment = state.appointment_uc.get(id).await?;
    Ok(ok(appointment))
}

#[utoipa::path(
    put,
    path = "/api/v1/appointments/{id}",
    params(("id" = String, Path, description = "Appointment ID")),
    request_body = UpdateAppointmentRequest,
    responses(
        (status = 200, description = "Appointment updated"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_appointment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateAppointmentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_appointment_id(&id)?;
    let update = AppointmentUpdate {
        date: req.date,
        estimated_duration: req.estimated_duration,
        room_number: req.room_number,
        status: req.status,
        reason: req.reason,
    };

    let appointment = state.appointment_uc.update(id, update).await?;
    Ok(ok(appointment))
}

#[utoipa::path(
    delete,
    path = "/api/v1/appointments/{id}",
    params(("id" = String, Path, description = "Appointment ID")),
    responses(
        (status = 200, description = "Appointment deleted"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_appointment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_appointment_id(&id)?;
    state.appointment_uc.delete(id).await?;
    Ok(ok(
        serde_json::json!({ "message": "Appointment deleted successfully" }),
    ))
}
