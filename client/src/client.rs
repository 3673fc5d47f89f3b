use std::sync::Arc;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ClientConfig;
use crate::error::{ApiError, ClientError};
use crate::model::{
    Appointment, AppointmentData, AuthSession, Doctor, DoctorData, Envelope, Patient, PatientData,
};
use crate::session::SessionStore;

/// ApiClient は clinica API サーバとやり取りする HTTP クライアント。
///
/// - 送信時: SessionStore にトークンがあれば Authorization ヘッダーに載せる。
///   無くてもエラーにはしない（認可判断はサーバ側が行う）。
/// - 受信時: エンベロープを解いて成功なら data だけを返し、失敗なら
///   正規化した ApiError で reject する。
/// - 401 を観測したら保存済み資格情報を破棄し、設定されたフック
///   （ログイン画面への誘導など）を呼ぶ。
pub struct ApiClient {
    http_client: reqwest::Client,
    base_url: String,
    session: Arc<dyn SessionStore>,
    on_unauthorized: Option<Arc<dyn Fn() + Send + Sync>>,
}

impl ApiClient {
    pub fn new(config: ClientConfig, session: Arc<dyn SessionStore>) -> Result<Self, ClientError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClientError::Connection(e.to_string()))?;
        Ok(Self {
            http_client,
            base_url: config.base_url,
            session,
            on_unauthorized: None,
        })
    }

    /// 401 観測時に呼ばれるフックを設定する（例: ログイン画面への遷移）。
    pub fn with_on_unauthorized(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_unauthorized = Some(Arc::new(hook));
        self
    }

    fn prepare(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut req = self.http_client.request(method, &url);
        if let Some(token) = self.session.token() {
            req = req.bearer_auth(token);
        }
        req
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
    ) -> Result<T, ClientError> {
        self.execute(self.prepare(method, path)).await
    }

    async fn request_json<T, B>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.execute(self.prepare(method, path).json(body)).await
    }

    /// 送信してエンベロープを解く。クライアント全体で唯一の受信経路。
    async fn execute<T: DeserializeOwned>(
        &self,
        req: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        let resp = req
            .send()
            .await
            .map_err(|e| ClientError::Connection(e.to_string()))?;

        let transport_status = resp.status();
        if transport_status == reqwest::StatusCode::UNAUTHORIZED {
            self.handle_unauthorized();
        }

        let envelope: Envelope<T> = resp
            .json()
            .await
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;

        if envelope.success {
            envelope.data.ok_or_else(|| {
                ClientError::InvalidResponse("missing data in success envelope".to_string())
            })
        } else {
            Err(ClientError::Api(ApiError {
                message: envelope
                    .user_message
                    .unwrap_or_else(|| "An unexpected error occurred".to_string()),
                error_type: envelope
                    .error_type
                    .unwrap_or_else(|| "InternalServerError".to_string()),
                details: envelope.context,
                hint: envelope.sub_error_type,
                status: envelope.status.unwrap_or_else(|| transport_status.as_u16()),
            }))
        }
    }

    /// 保存済み資格情報を破棄してフックを呼ぶ。
    /// 資格情報が無い状態で呼ばれても安全（冪等）。
    fn handle_unauthorized(&self) {
        self.session.clear();
        if let Some(hook) = &self.on_unauthorized {
            hook();
        }
    }

    // --- auth ---

    /// ログインし、得られたアクセストークンを SessionStore に保存する。
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession, ClientError> {
        let session: AuthSession = self
            .request_json(
                Method::POST,
                "/api/v1/auth/login",
                &serde_json::json!({ "email": email, "password": password }),
            )
            .await?;
        self.session.store(&session.access_token);
        Ok(session)
    }

    pub async fn logout(&self) -> Result<(), ClientError> {
        let _: serde_json::Value = self.request(Method::POST, "/api/v1/auth/logout").await?;
        self.session.clear();
        Ok(())
    }

    pub async fn refresh(&self, refresh_token: &str) -> Result<AuthSession, ClientError> {
        let session: AuthSession = self
            .request_json(
                Method::POST,
                "/api/v1/auth/refresh",
                &serde_json::json!({ "refreshToken": refresh_token }),
            )
            .await?;
        self.session.store(&session.access_token);
        Ok(session)
    }

    // --- patients ---

    pub async fn get_patients(&self) -> Result<Vec<Patient>, ClientError> {
        self.request(Method::GET, "/api/v1/patients").await
    }

    pub async fn get_patient_by_id(&self, id: &str) -> Result<Patient, ClientError> {
        self.request(Method::GET, &format!("/api/v1/patients/{}", id))
            .await
    }

    pub async fn create_patient(&self, data: &PatientData) -> Result<Patient, ClientError> {
        self.request_json(Method::POST, "/api/v1/patients", data)
            .await
    }

    pub async fn update_patient(
        &self,
        id: &str,
        data: &serde_json::Value,
    ) -> Result<Patient, ClientError> {
        self.request_json(Method::PUT, &format!("/api/v1/patients/{}", id), data)
            .await
    }

    pub async fn delete_patient(&self, id: &str) -> Result<(), ClientError> {
        let _: serde_json::Value = self
            .request(Method::DELETE, &format!("/api/v1/patients/{}", id))
            .await?;
        Ok(())
    }

    // --- doctors ---

    pub async fn get_doctors(&self) -> Result<Vec<Doctor>, ClientError> {
        self.request(Method::GET, "/api/v1/doctors").await
    }

    pub async fn get_doctor_by_id(&self, id: &str) -> Result<Doctor, ClientError> {
        self.request(Method::GET, &format!("/api/v1/doctors/{}", id))
            .await
    }

    pub async fn create_doctor(&self, data: &DoctorData) -> Result<Doctor, ClientError> {
        self.request_json(Method::POST, "/api/v1/doctors", data)
            .await
    }

    pub async fn delete_doctor(&self, id: &str) -> Result<(), ClientError> {
        let _: serde_json::Value = self
            .request(Method::DELETE, &format!("/api/v1/doctors/{}", id))
            .await?;
        Ok(())
    }

    // --- appointments ---

    pub async fn get_appointments(&self) -> Result<Vec<Appointment>, ClientError> {
        self.request(Method::GET, "/api/v1/appointments").await
    }

    pub async fn create_appointment(
        &self,
        data: &AppointmentData,
    ) -> Result<Appointment, ClientError> {
        self.request_json(Method::POST, "/api/v1/appointments", data)
            .await
    }

    pub async fn delete_appointment(&self, id: i64) -> Result<(), ClientError> {
        let _: serde_json::Value = self
            .request(Method::DELETE, &format!("/api/v1/appointments/{}", id))
            .await?;
        Ok(())
    }
}
