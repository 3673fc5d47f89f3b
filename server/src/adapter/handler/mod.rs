pub mod appointment_handler;
pub mod auth_handler;
pub mod doctor_handler;
pub mod patient_handler;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::middleware;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::adapter::middleware::auth::auth_middleware;
use crate::adapter::middleware::rbac::require_role;
use crate::domain::repository::{AppointmentRepository, DoctorRepository, PatientRepository};
use crate::infrastructure::IdentityProvider;
use crate::usecase::{
    AppointmentUseCases, AuthenticateUseCase, DoctorUseCases, PatientUseCases, SessionUseCase,
};

/// AppState はアプリケーション全体の共有状態を表す。
#[derive(Clone)]
pub struct AppState {
    pub authenticate_uc: Arc<AuthenticateUseCase>,
    pub session_uc: Arc<SessionUseCase>,
    pub doctor_uc: Arc<DoctorUseCases>,
    pub patient_uc: Arc<PatientUseCases>,
    pub appointment_uc: Arc<AppointmentUseCases>,
}

impl AppState {
    pub fn new(
        identity_provider: Arc<dyn IdentityProvider>,
        doctor_repo: Arc<dyn DoctorRepository>,
        patient_repo: Arc<dyn PatientRepository>,
        appointment_repo: Arc<dyn AppointmentRepository>,
    ) -> Self {
        Self {
            authenticate_uc: Arc::new(AuthenticateUseCase::new(identity_provider.clone())),
            session_uc: Arc::new(SessionUseCase::new(identity_provider)),
            doctor_uc: Arc::new(DoctorUseCases::new(doctor_repo)),
            patient_uc: Arc::new(PatientUseCases::new(patient_repo)),
            appointment_uc: Arc::new(AppointmentUseCases::new(appointment_repo)),
        }
    }
}

/// Build the REST API router.
///
/// 許可ロールはルート登録時に宣言する。実行順は
/// auth_middleware → require_role → ValidatedJson → handler で固定。
pub fn router(state: AppState) -> Router {
    // Doctors: 作成・更新・削除は admin のみ。閲覧は臨床スタッフ全員。
    let doctor_write = Router::new()
        .route("/api/v1/doctors", post(doctor_handler::create_doctor))
        .route(
            "/api/v1/doctors/:id",
            put(doctor_handler::update_doctor).delete(doctor_handler::delete_doctor),
        )
        .route_layer(middleware::from_fn(require_role(&["admin"])));

    let doctor_read = Router::new()
        .route("/api/v1/doctors", get(doctor_handler::list_doctors))
        .route("/api/v1/doctors/:id", get(doctor_handler::get_doctor))
        .route_layer(middleware::from_fn(require_role(&[
            "admin", "doctor", "nurse",
        ])));

    let patient_routes = Router::new()
        .route(
            "/api/v1/patients",
            get(patient_handler::list_patients).post(patient_handler::create_patient),
        )
        .route(
            "/api/v1/patients/:id",
            get(patient_handler::get_patient)
                .put(patient_handler::update_patient)
                .delete(patient_handler::delete_patient),
        )
        .route_layer(middleware::from_fn(require_role(&[
            "admin", "doctor", "nurse",
        ])));

    let appointment_routes = Router::new()
        .route(
            "/api/v1/appointments",
            get(appointment_handler::list_appointments)
                .post(appointment_handler::create_appointment),
        )
        .route(
            "/api/v1/appointments/:id",
            get(appointment_handler::get_appointment)
                .put(appointment_handler::update_appointment)
                .delete(appointment_handler::delete_appointment),
        )
        .route_layer(middleware::from_fn(require_role(&[
            "admin", "doctor", "nurse",
        ])));

    // Protected routes share auth_middleware for Bearer token validation
    let protected = Router::new()
        .merge(doctor_write)
        .merge(doctor_read)
        .merge(patient_routes)
        .merge(appointment_routes)
        .route("/api/v1/auth/logout", post(auth_handler::logout))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Public endpoints (no auth required)
    let public = Router::new()
        .route("/healthz", get(auth_handler::healthz))
        .route("/api/v1/auth/login", post(auth_handler::login))
        .route("/api/v1/auth/refresh", post(auth_handler::refresh));

    Router::new()
        .merge(protected)
        .merge(public)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// ApiResponse は成功レスポンスの固定ワイヤ形式。
/// `error` は常に null（成功と失敗でちょうど一方だけが埋まる）。
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub status: u16,
    pub data: T,
    pub error: Option<serde_json::Value>,
}

pub fn ok<T: Serialize>(data: T) -> (StatusCode, Json<ApiResponse<T>>) {
    (
        StatusCode::OK,
        Json(ApiResponse {
            success: true,
            status: 200,
            data,
            error: None,
        }),
    )
}

pub fn created<T: Serialize>(data: T) -> (StatusCode, Json<ApiResponse<T>>) {
    (
        StatusCode::CREATED,
        Json(ApiResponse {
            success: true,
            status: 201,
            data,
            error: None,
        }),
    )
}
