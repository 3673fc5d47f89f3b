use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use clinica_client::{ApiClient, ClientConfig, ClientError, MemorySession, SessionStore};

fn make_client(server: &MockServer, session: Arc<MemorySession>) -> ApiClient {
    ApiClient::new(ClientConfig::new(server.uri()), session).unwrap()
}

fn patient_json() -> serde_json::Value {
    serde_json::json!({
        "id": "patient-1",
        "patient_id": "HD-2024-1234",
        "name": "John Doe",
        "address": "123 Main St, City, State 12345",
        "phone_number": "+1 (555) 111-2222",
        "profession": "Engineer",
        "children_number": 2,
        "family_situation": "Married",
        "birth_date": "1985-03-15",
    })
}

#[tokio::test]
async fn test_success_envelope_is_unwrapped_to_plain_data() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/patients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "status": 200,
            "data": [patient_json()],
            "error": null,
        })))
        .mount(&server)
        .await;

    let client = make_client(&server, Arc::new(MemorySession::new()));
    let patients = client.get_patients().await.unwrap();

    // 呼び出し側にはエンベロープではなく data のみが見える。
    assert_eq!(patients.len(), 1);
    assert_eq!(patients[0].id, "patient-1");
    assert_eq!(patients[0].name, "John Doe");
    assert_eq!(patients[0].patient_id.as_deref(), Some("HD-2024-1234"));
}

#[tokio::test]
async fn test_round_trip_preserves_data_unchanged() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/patients/patient-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "status": 200,
            "data": patient_json(),
            "error": null,
        })))
        .mount(&server)
        .await;

    let client = make_client(&server, Arc::new(MemorySession::new()));
    let patient = client.get_patient_by_id("patient-1").await.unwrap();

    assert_eq!(serde_json::to_value(&patient).unwrap(), patient_json());
}

#[tokio::test]
async fn test_failure_envelope_is_normalized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/patients"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "success": false,
            "status": 400,
            "data": null,
            "ErrorType": "ValidationError",
            "context": { "name": ["name is required"] },
            "UserMessage": "Request validation failed",
        })))
        .mount(&server)
        .await;

    let client = make_client(&server, Arc::new(MemorySession::new()));
    let err = client.get_patients().await.unwrap_err();

    match err {
        ClientError::Api(api_err) => {
            assert_eq!(api_err.message, "Request validation failed");
            assert_eq!(api_err.error_type, "ValidationError");
            assert_eq!(api_err.status, 400);
            assert_eq!(api_err.hint, None);
            assert_eq!(
                api_err.details.clone().unwrap()["name"][0],
                "name is required"
            );
            assert!(!api_err.is_authentication_error());
        }
        other => unreachable!("unexpected error in test: {:?}", other),
    }
}

#[tokio::test]
async fn test_401_clears_credential_and_invokes_hook_idempotently() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/patients"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "success": false,
            "status": 401,
            "data": null,
            "ErrorType": "AuthenticationError",
            "subErrorType": "Unauthorized",
            "UserMessage": "Unauthorized access",
        })))
        .mount(&server)
        .await;

    let session = Arc::new(MemorySession::new());
    session.store("stale-token");

    let hook_calls = Arc::new(AtomicUsize::new(0));
    let hook_calls_in_client = hook_calls.clone();
    let client = make_client(&server, session.clone()).with_on_unauthorized(move || {
        hook_calls_in_client.fetch_add(1, Ordering::SeqCst);
    });

    let err = client.get_patients().await.unwrap_err();
    match &err {
        ClientError::Api(api_err) => {
            assert!(api_err.is_authentication_error());
            assert_eq!(api_err.hint.as_deref(), Some("Unauthorized"));
        }
        other => unreachable!("unexpected error in test: {:?}", other),
    }
    assert_eq!(session.token(), None);
    assert_eq!(hook_calls.load(Ordering::SeqCst), 1);

    // 資格情報が消えた状態でもう一度呼んでも落ちない。
    let second = client.get_patients().await;
    assert!(second.is_err());
    assert_eq!(session.token(), None);
    assert_eq!(hook_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_stored_credential_is_attached_as_bearer() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/patients"))
        .and(header("authorization", "Bearer stored-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "status": 200,
            "data": [],
            "error": null,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let session = Arc::new(MemorySession::new());
    session.store("stored-token");

    let client = make_client(&server, session);
    client.get_patients().await.unwrap();
}

#[tokio::test]
async fn test_missing_credential_sends_unauthenticated_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/patients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "status": 200,
            "data": [],
            "error": null,
        })))
        .mount(&server)
        .await;

    let client = make_client(&server, Arc::new(MemorySession::new()));
    // トークンが無いことはこの層ではエラーではない。
    client.get_patients().await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_login_stores_issued_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "status": 200,
            "data": {
                "access_token": "issued-access-token",
                "token_type": "bearer",
                "expires_in": 3600,
                "refresh_token": "issued-refresh-token",
                "user": { "id": "user-1" },
            },
            "error": null,
        })))
        .mount(&server)
        .await;

    let session = Arc::new(MemorySession::new());
    let client = make_client(&server, session.clone());

    let auth = client
        .login("admin@clinic.example.com", "secret-password")
        .await
        .unwrap();

    assert_eq!(auth.access_token, "issued-access-token");
    assert_eq!(session.token(), Some("issued-access-token".to_string()));
}

#[tokio::test]
async fn test_non_envelope_body_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/patients"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway error</html>"))
        .mount(&server)
        .await;

    let client = make_client(&server, Arc::new(MemorySession::new()));
    let err = client.get_patients().await.unwrap_err();
    assert!(matches!(err, ClientError::InvalidResponse(_)));
}
