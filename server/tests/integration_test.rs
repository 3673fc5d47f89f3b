use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use clinica_server::adapter::handler::{router, AppState};
use clinica_server::domain::entity::appointment::{Appointment, AppointmentUpdate, NewAppointment};
use clinica_server::domain::entity::doctor::{Doctor, DoctorUpdate, NewDoctor};
use clinica_server::domain::entity::patient::{NewPatient, Patient, PatientUpdate};
use clinica_server::domain::entity::principal::Principal;
use clinica_server::domain::repository::{
    AppointmentRepository, DoctorRepository, PatientRepository,
};
use clinica_server::infrastructure::{IdentityProvider, ProviderSession};

// --- Test doubles ---

struct TestIdentityProvider {
    should_succeed: bool,
    role: Option<&'static str>,
    verify_calls: Arc<AtomicUsize>,
}

impl TestIdentityProvider {
    fn accepting(role: Option<&'static str>) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                should_succeed: true,
                role,
                verify_calls: calls.clone(),
            },
            calls,
        )
    }

    fn rejecting() -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                should_succeed: false,
                role: None,
                verify_calls: calls.clone(),
            },
            calls,
        )
    }
}

#[async_trait::async_trait]
impl IdentityProvider for TestIdentityProvider {
    async fn verify_token(&self, _access_token: &str) -> anyhow::Result<Principal> {
        self.verify_calls.fetch_add(1, Ordering::SeqCst);
        if self.should_succeed {
            let mut claims = serde_json::json!({
                "id": "test-user-1",
                "email": "staff@clinic.example.com",
            });
            if let Some(role) = self.role {
                claims["user_metadata"] = serde_json::json!({ "role": role });
            }
            Principal::from_claims(claims).ok_or_else(|| anyhow::anyhow!("unreachable"))
        } else {
            anyhow::bail!("token verification failed")
        }
    }

    async fn sign_in(&self, email: &str, _password: &str) -> anyhow::Result<ProviderSession> {
        if !self.should_succeed {
            anyhow::bail!("invalid_grant");
        }
        Ok(ProviderSession {
            access_token: "issued-access-token".to_string(),
            token_type: "bearer".to_string(),
            expires_in: 3600,
            refresh_token: "issued-refresh-token".to_string(),
            user: Principal::from_claims(serde_json::json!({
                "id": "test-user-1",
                "email": email,
            }))
            .ok_or_else(|| anyhow::anyhow!("unreachable"))?,
        })
    }

    async fn refresh_session(&self, _refresh_token: &str) -> anyhow::Result<ProviderSession> {
        anyhow::bail!("not used in these tests")
    }

    async fn sign_out(&self, _access_token: &str) -> anyhow::Result<()> {
        Ok(())
    }

    async fn admin_create_user(&self, _email: &str, _password: &str) -> anyhow::Result<String> {
        Ok("created-user-id".to_string())
    }
}

/// ビジネスハンドラが呼ばれたかどうかを create 呼び出し回数で観測する。
struct TestDoctorRepository {
    create_calls: Arc<AtomicUsize>,
}

impl TestDoctorRepository {
    fn new() -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                create_calls: calls.clone(),
            },
            calls,
        )
    }
}

#[async_trait::async_trait]
impl DoctorRepository for TestDoctorRepository {
    async fn create(&self, doctor: &NewDoctor, _password: &str) -> anyhow::Result<Doctor> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        Ok(Doctor {
            id: "created-doctor-id".to_string(),
            first_name: doctor.first_name.clone(),
            last_name: doctor.last_name.clone(),
            email: doctor.email.clone(),
            role: doctor.role.clone(),
            salary: doctor.salary,
            is_medical_director: doctor.is_medical_director,
            specialization: doctor.specialization.clone(),
        })
    }

    async fn find_by_id(&self, _id: &str) -> anyhow::Result<Option<Doctor>> {
        Ok(None)
    }

    async fn list(&self) -> anyhow::Result<Vec<Doctor>> {
        Ok(vec![])
    }

    async fn update(&self, _id: &str, _update: &DoctorUpdate) -> anyhow::Result<Option<Doctor>> {
        Ok(None)
    }

    async fn delete(&self, _id: &str) -> anyhow::Result<bool> {
        Ok(false)
    }
}

struct TestPatientRepository;

#[async_trait::async_trait]
impl PatientRepository for TestPatientRepository {
    async fn create(&self, patient: &NewPatient) -> anyhow::Result<Patient> {
        Ok(Patient {
            id: "created-patient-id".to_string(),
            patient_id: patient.patient_id.clone(),
            name: patient.name.clone(),
            address: patient.address.clone(),
            phone_number: patient.phone_number.clone(),
            profession: patient.profession.clone(),
            children_number: patient.children_number,
            family_situation: patient.family_situation.clone(),
            birth_date: patient.birth_date,
        })
    }

    async fn find_by_id(&self, _id: &str) -> anyhow::Result<Option<Patient>> {
        Ok(None)
    }

    async fn list(&self) -> anyhow::Result<Vec<Patient>> {
        Ok(vec![])
    }

    async fn update(
        &self,
        _id: &str,
        _update: &PatientUpdate,
    ) -> anyhow::Result<Option<Patient>> {
        Ok(None)
    }

    async fn delete(&self, _id: &str) -> anyhow::Result<bool> {
        Ok(false)
    }
}

struct TestAppointmentRepository;

#[async_trait::async_trait]
impl AppointmentRepository for TestAppointmentRepository {
    async fn create(&self, _appointment: &NewAppointment) -> anyhow::Result<Appointment> {
        anyhow::bail!("not used in these tests")
    }

    async fn find_by_id(&self, _id: i64) -> anyhow::Result<Option<Appointment>> {
        Ok(None)
    }

    async fn list(&self) -> anyhow::Result<Vec<Appointment>> {
        Ok(vec![])
    }

    async fn update(
        &self,
        _id: i64,
        _update: &AppointmentUpdate,
    ) -> anyhow::Result<Option<Appointment>> {
        Ok(None)
    }

    async fn delete(&self, _id: i64) -> anyhow::Result<bool> {
        Ok(false)
    }
}

// --- Helpers ---

fn make_app(
    provider: TestIdentityProvider,
    doctor_repo: TestDoctorRepository,
) -> axum::Router {
    let state = AppState::new(
        Arc::new(provider),
        Arc::new(doctor_repo),
        Arc::new(TestPatientRepository),
        Arc::new(TestAppointmentRepository),
    );
    router(state)
}

fn valid_doctor_body() -> serde_json::Value {
    serde_json::json!({
        "firstName": "Imane",
        "lastName": "Alaoui",
        "email": "i.alaoui@clinic.example.com",
        "password": "initial-password",
        "role": "doctor",
        "salary": 90000.0,
        "isMedicalDirector": false,
        "specialization": "Nephrology",
    })
}

fn post_json(uri: &str, auth: Option<&str>, body: &serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(auth) = auth {
        builder = builder.header("Authorization", auth);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn body_json(resp: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

// --- Auth Verifier ---

#[tokio::test]
async fn test_missing_authorization_header_never_touches_the_provider() {
    let (provider, verify_calls) = TestIdentityProvider::accepting(Some("admin"));
    let (doctor_repo, _) = TestDoctorRepository::new();
    let app = make_app(provider, doctor_repo);

    let req = Request::builder()
        .uri("/api/v1/doctors")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(resp).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["status"], 401);
    assert_eq!(json["data"], serde_json::Value::Null);
    assert_eq!(json["ErrorType"], "AuthenticationError");
    assert_eq!(json["subErrorType"], "MissingToken");
    assert_eq!(verify_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_non_bearer_scheme_is_invalid_token_without_provider_call() {
    let (provider, verify_calls) = TestIdentityProvider::accepting(Some("admin"));
    let (doctor_repo, _) = TestDoctorRepository::new();
    let app = make_app(provider, doctor_repo);

    let req = Request::builder()
        .uri("/api/v1/doctors")
        .header("Authorization", "Token abc")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(resp).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["status"], 401);
    assert_eq!(json["ErrorType"], "AuthenticationError");
    assert_eq!(json["subErrorType"], "InvalidToken");
    assert_eq!(verify_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_provider_rejected_token_returns_truncated_diagnostic() {
    let (provider, verify_calls) = TestIdentityProvider::rejecting();
    let (doctor_repo, _) = TestDoctorRepository::new();
    let app = make_app(provider, doctor_repo);

    let token = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.rejected-token";
    let req = Request::builder()
        .uri("/api/v1/doctors")
        .header("Authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(resp).await;
    assert_eq!(json["subErrorType"], "Unauthorized");

    let context_token = json["context"]["token"].as_str().unwrap();
    assert!(context_token.len() <= 10);
    assert_eq!(context_token, &token[..10]);
    assert_eq!(verify_calls.load(Ordering::SeqCst), 1);
}

// --- Role Guard ---

#[tokio::test]
async fn test_nurse_cannot_create_doctor_and_handler_is_not_invoked() {
    let (provider, _) = TestIdentityProvider::accepting(Some("nurse"));
    let (doctor_repo, create_calls) = TestDoctorRepository::new();
    let app = make_app(provider, doctor_repo);

    let resp = app
        .oneshot(post_json(
            "/api/v1/doctors",
            Some("Bearer valid-token"),
            &valid_doctor_body(),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(resp).await;
    assert_eq!(json["ErrorType"], "AuthenticationError");
    assert_eq!(json["subErrorType"], "AuthorizationDenied");
    assert_eq!(create_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_principal_without_role_claim_is_denied() {
    let (provider, _) = TestIdentityProvider::accepting(None);
    let (doctor_repo, create_calls) = TestDoctorRepository::new();
    let app = make_app(provider, doctor_repo);

    let resp = app
        .oneshot(post_json(
            "/api/v1/doctors",
            Some("Bearer valid-token"),
            &valid_doctor_body(),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(create_calls.load(Ordering::SeqCst), 0);
}

// --- Request Validator ---

#[tokio::test]
async fn test_empty_login_body_lists_every_missing_field() {
    let (provider, _) = TestIdentityProvider::accepting(None);
    let (doctor_repo, _) = TestDoctorRepository::new();
    let app = make_app(provider, doctor_repo);

    let resp = app
        .oneshot(post_json("/api/v1/auth/login", None, &serde_json::json!({})))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let json = body_json(resp).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["status"], 400);
    assert_eq!(json["ErrorType"], "ValidationError");
    assert_eq!(json["context"]["email"][0], "email is required");
    assert_eq!(json["context"]["password"][0], "password is required");
}

#[tokio::test]
async fn test_invalid_doctor_body_short_circuits_before_the_handler() {
    let (provider, _) = TestIdentityProvider::accepting(Some("admin"));
    let (doctor_repo, create_calls) = TestDoctorRepository::new();
    let app = make_app(provider, doctor_repo);

    let resp = app
        .oneshot(post_json(
            "/api/v1/doctors",
            Some("Bearer valid-token"),
            &serde_json::json!({}),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let json = body_json(resp).await;
    assert_eq!(json["ErrorType"], "ValidationError");
    // 最初の 1 件ではなく全フィールドが列挙される。
    assert!(json["context"].get("first_name").is_some());
    assert!(json["context"].get("last_name").is_some());
    assert!(json["context"].get("email").is_some());
    assert!(json["context"].get("password").is_some());
    assert_eq!(create_calls.load(Ordering::SeqCst), 0);
}

// --- Success envelope ---

#[tokio::test]
async fn test_admin_creates_doctor_with_exact_success_envelope() {
    let (provider, _) = TestIdentityProvider::accepting(Some("admin"));
    let (doctor_repo, create_calls) = TestDoctorRepository::new();
    let app = make_app(provider, doctor_repo);

    let resp = app
        .oneshot(post_json(
            "/api/v1/doctors",
            Some("Bearer valid-token"),
            &valid_doctor_body(),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let json = body_json(resp).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["status"], 201);
    assert_eq!(json["error"], serde_json::Value::Null);
    assert_eq!(json["data"]["id"], "created-doctor-id");
    assert_eq!(json["data"]["first_name"], "Imane");
    assert_eq!(create_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_login_returns_session_in_success_envelope() {
    let (provider, _) = TestIdentityProvider::accepting(None);
    let (doctor_repo, _) = TestDoctorRepository::new();
    let app = make_app(provider, doctor_repo);

    let resp = app
        .oneshot(post_json(
            "/api/v1/auth/login",
            None,
            &serde_json::json!({
                "email": "admin@clinic.example.com",
                "password": "secret-password",
            }),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["access_token"], "issued-access-token");
    assert_eq!(json["data"]["user"]["id"], "test-user-1");
}

#[tokio::test]
async fn test_login_with_bad_credentials_is_authentication_error() {
    let (provider, _) = TestIdentityProvider::rejecting();
    let (doctor_repo, _) = TestDoctorRepository::new();
    let app = make_app(provider, doctor_repo);

    let resp = app
        .oneshot(post_json(
            "/api/v1/auth/login",
            None,
            &serde_json::json!({
                "email": "admin@clinic.example.com",
                "password": "wrong-password",
            }),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(resp).await;
    assert_eq!(json["ErrorType"], "AuthenticationError");
    assert_eq!(json["UserMessage"], "Invalid login credentials");
}

// --- Error Responder: unknown id / repository behavior ---

#[tokio::test]
async fn test_unknown_doctor_id_is_an_app_error_family_response() {
    let (provider, _) = TestIdentityProvider::accepting(Some("nurse"));
    let (doctor_repo, _) = TestDoctorRepository::new();
    let app = make_app(provider, doctor_repo);

    let req = Request::builder()
        .uri("/api/v1/doctors/missing-id")
        .header("Authorization", "Bearer valid-token")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let json = body_json(resp).await;
    assert_eq!(json["ErrorType"], "ValidationError");
    assert_eq!(json["context"]["id"], "missing-id");
}

#[tokio::test]
async fn test_healthz_is_public() {
    let (provider, verify_calls) = TestIdentityProvider::accepting(None);
    let (doctor_repo, _) = TestDoctorRepository::new();
    let app = make_app(provider, doctor_repo);

    let req = Request::builder()
        .uri("/healthz")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(verify_calls.load(Ordering::SeqCst), 0);
}
