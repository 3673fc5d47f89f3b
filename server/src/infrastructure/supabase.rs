use anyhow::Context;
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::domain::entity::appointment::{Appointment, AppointmentUpdate, NewAppointment};
use crate::domain::entity::doctor::{Doctor, DoctorUpdate, NewDoctor};
use crate::domain::entity::patient::{NewPatient, Patient, PatientUpdate};
use crate::domain::entity::principal::Principal;
use crate::domain::repository::{AppointmentRepository, DoctorRepository, PatientRepository};
use crate::infrastructure::{IdentityProvider, ProviderSession};

/// SupabaseConfig は Supabase 接続の設定を表す。
#[derive(Debug, Clone, serde::Deserialize)]
pub struct SupabaseConfig {
    pub url: String,
    pub anon_key: String,
    pub service_role_key: SecretString,
}

/// SupabaseClient は Supabase の Auth (GoTrue) / REST (PostgREST) API クライアント。
/// トークン検証・セッション操作と、profiles / doctors / patients / appointments
/// テーブルへの読み書きを担う。
pub struct SupabaseClient {
    config: SupabaseConfig,
    http_client: reqwest::Client,
}

impl SupabaseClient {
    pub fn new(config: SupabaseConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(10))
                .build()
                .unwrap(),
        }
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1{}", self.config.url, path)
    }

    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.config.url, table)
    }

    fn service_key(&self) -> &str {
        self.config.service_role_key.expose_secret()
    }

    /// セッションレスポンス (token grant) を ProviderSession へ変換する。
    fn session_from_value(body: serde_json::Value) -> anyhow::Result<ProviderSession> {
        let user = Principal::from_claims(body.get("user").cloned().unwrap_or_default())
            .context("missing user in session response")?;
        Ok(ProviderSession {
            access_token: body
                .get("access_token")
                .and_then(|v| v.as_str())
                .context("missing access_token in session response")?
                .to_string(),
            token_type: body
                .get("token_type")
                .and_then(|v| v.as_str())
                .unwrap_or("bearer")
                .to_string(),
            expires_in: body
                .get("expires_in")
                .and_then(|v| v.as_i64())
                .unwrap_or(3600),
            refresh_token: body
                .get("refresh_token")
                .and_then(|v| v.as_str())
                .context("missing refresh_token in session response")?
                .to_string(),
            user,
        })
    }

    async fn token_grant(
        &self,
        grant_type: &str,
        body: serde_json::Value,
    ) -> anyhow::Result<ProviderSession> {
        let url = format!("{}?grant_type={}", self.auth_url("/token"), grant_type);
        let resp = self
            .http_client
            .post(&url)
            .header("apikey", &self.config.anon_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            anyhow::bail!("token grant failed ({}): {}", status, message);
        }

        Self::session_from_value(resp.json().await?)
    }

    // --- PostgREST helpers ---

    async fn rest_insert<T, R>(&self, table: &str, row: &T) -> anyhow::Result<R>
    where
        T: Serialize + Sync,
        R: DeserializeOwned,
    {
        let resp = self
            .http_client
            .post(self.rest_url(table))
            .header("apikey", self.service_key())
            .bearer_auth(self.service_key())
            .header("Prefer", "return=representation")
            .json(row)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            anyhow::bail!("insert into {} failed ({}): {}", table, status, message);
        }

        let mut rows: Vec<R> = resp.json().await?;
        if rows.is_empty() {
            anyhow::bail!("insert into {} returned no rows", table);
        }
        Ok(rows.remove(0))
    }

    async fn rest_select<R>(&self, table: &str, query: &str) -> anyhow::Result<Vec<R>>
    where
        R: DeserializeOwned,
    {
        let url = format!("{}?{}", self.rest_url(table), query);
        let resp = self
            .http_client
            .get(&url)
            .header("apikey", self.service_key())
            .bearer_auth(self.service_key())
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            anyhow::bail!("select from {} failed ({}): {}", table, status, message);
        }

        Ok(resp.json().await?)
    }

    async fn rest_update<T, R>(&self, table: &str, filter: &str, patch: &T) -> anyhow::Result<Vec<R>>
    where
        T: Serialize + Sync,
        R: DeserializeOwned,
    {
        let url = format!("{}?{}", self.rest_url(table), filter);
        let resp = self
            .http_client
            .patch(&url)
            .header("apikey", self.service_key())
            .bearer_auth(self.service_key())
            .header("Prefer", "return=representation")
            .json(patch)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            anyhow::bail!("update {} failed ({}): {}", table, status, message);
        }

        Ok(resp.json().await?)
    }

    async fn rest_delete(&self, table: &str, filter: &str) -> anyhow::Result<bool> {
        let url = format!("{}?{}", self.rest_url(table), filter);
        let resp = self
            .http_client
            .delete(&url)
            .header("apikey", self.service_key())
            .bearer_auth(self.service_key())
            .header("Prefer", "return=representation")
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            anyhow::bail!("delete from {} failed ({}): {}", table, status, message);
        }

        let rows: Vec<serde_json::Value> = resp.json().await?;
        Ok(!rows.is_empty())
    }

    fn id_filter(id: &str) -> String {
        format!("id=eq.{}", urlencoding::encode(id))
    }
}

#[async_trait]
impl IdentityProvider for SupabaseClient {
    async fn verify_token(&self, access_token: &str) -> anyhow::Result<Principal> {
        let resp = self
            .http_client
            .get(self.auth_url("/user"))
            .header("apikey", &self.config.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            anyhow::bail!("identity provider rejected the token ({}): {}", status, message);
        }

        let claims: serde_json::Value = resp.json().await?;
        Principal::from_claims(claims).context("empty principal in provider response")
    }

    async fn sign_in(&self, email: &str, password: &str) -> anyhow::Result<ProviderSession> {
        self.token_grant(
            "password",
            serde_json::json!({ "email": email, "password": password }),
        )
        .await
    }

    async fn refresh_session(&self, refresh_token: &str) -> anyhow::Result<ProviderSession> {
        self.token_grant(
            "refresh_token",
            serde_json::json!({ "refresh_token": refresh_token }),
        )
        .await
    }

    async fn sign_out(&self, access_token: &str) -> anyhow::Result<()> {
        let resp = self
            .http_client
            .post(self.auth_url("/logout"))
            .header("apikey", &self.config.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;
        resp.error_for_status()?;
        Ok(())
    }

    async fn admin_create_user(&self, email: &str, password: &str) -> anyhow::Result<String> {
        let resp = self
            .http_client
            .post(self.auth_url("/admin/users"))
            .header("apikey", self.service_key())
            .bearer_auth(self.service_key())
            .json(&serde_json::json!({
                "email": email,
                "password": password,
                "email_confirm": true,
            }))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            anyhow::bail!("admin user creation failed ({}): {}", status, message);
        }

        let user: serde_json::Value = resp.json().await?;
        user.get("id")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .context("missing id in created user response")
    }
}

/// DoctorRow は doctors テーブルと埋め込み profiles の行表現。
#[derive(Debug, serde::Deserialize)]
struct DoctorRow {
    id: String,
    salary: f64,
    is_medical_director: bool,
    specialization: String,
    profiles: ProfileRow,
}

#[derive(Debug, serde::Deserialize)]
struct ProfileRow {
    email: String,
    first_name: String,
    last_name: String,
    role: String,
}

impl From<DoctorRow> for Doctor {
    fn from(row: DoctorRow) -> Self {
        Doctor {
            id: row.id,
            first_name: row.profiles.first_name,
            last_name: row.profiles.last_name,
            email: row.profiles.email,
            role: row.profiles.role,
            salary: row.salary,
            is_medical_director: row.is_medical_director,
            specialization: row.specialization,
        }
    }
}

const DOCTOR_SELECT: &str = "select=id,salary,is_medical_director,specialization,profiles(email,first_name,last_name,role)";

#[async_trait]
impl DoctorRepository for SupabaseClient {
    async fn create(&self, doctor: &NewDoctor, password: &str) -> anyhow::Result<Doctor> {
        // 認証ユーザー → profiles → doctors の順に作成する。
        let user_id = self
            .admin_create_user(&doctor.email, password)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "auth user not created");
                e
            })?;

        let _: serde_json::Value = self
            .rest_insert(
                "profiles",
                &serde_json::json!({
                    "id": user_id,
                    "email": doctor.email,
                    "first_name": doctor.first_name,
                    "last_name": doctor.last_name,
                    "role": doctor.role,
                }),
            )
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "profile not created");
                e
            })?;

        let _: serde_json::Value = self
            .rest_insert(
                "doctors",
                &serde_json::json!({
                    "id": user_id,
                    "salary": doctor.salary,
                    "is_medical_director": doctor.is_medical_director,
                    "specialization": doctor.specialization,
                }),
            )
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "doctor not created");
                e
            })?;

        Ok(Doctor {
            id: user_id,
            first_name: doctor.first_name.clone(),
            last_name: doctor.last_name.clone(),
            email: doctor.email.clone(),
            role: doctor.role.clone(),
            salary: doctor.salary,
            is_medical_director: doctor.is_medical_director,
            specialization: doctor.specialization.clone(),
        })
    }

    async fn find_by_id(&self, id: &str) -> anyhow::Result<Option<Doctor>> {
        let query = format!("{}&{}", DOCTOR_SELECT, Self::id_filter(id));
        let rows: Vec<DoctorRow> = self.rest_select("doctors", &query).await?;
        Ok(rows.into_iter().next().map(Doctor::from))
    }

    async fn list(&self) -> anyhow::Result<Vec<Doctor>> {
        let rows: Vec<DoctorRow> = self.rest_select("doctors", DOCTOR_SELECT).await?;
        Ok(rows.into_iter().map(Doctor::from).collect())
    }

    async fn update(&self, id: &str, update: &DoctorUpdate) -> anyhow::Result<Option<Doctor>> {
        let filter = Self::id_filter(id);

        let mut profile_patch = serde_json::Map::new();
        if let Some(first_name) = &update.first_name {
            profile_patch.insert("first_name".to_string(), first_name.clone().into());
        }
        if let Some(last_name) = &update.last_name {
            profile_patch.insert("last_name".to_string(), last_name.clone().into());
        }
        if !profile_patch.is_empty() {
            let _: Vec<serde_json::Value> = self
                .rest_update("profiles", &filter, &serde_json::Value::Object(profile_patch))
                .await?;
        }

        let mut doctor_patch = serde_json::Map::new();
        if let Some(salary) = update.salary {
            doctor_patch.insert("salary".to_string(), salary.into());
        }
        if let Some(is_medical_director) = update.is_medical_director {
            doctor_patch.insert("is_medical_director".to_string(), is_medical_director.into());
        }
        if let Some(specialization) = &update.specialization {
            doctor_patch.insert("specialization".to_string(), specialization.clone().into());
        }
        if !doctor_patch.is_empty() {
            let _: Vec<serde_json::Value> = self
                .rest_update("doctors", &filter, &serde_json::Value::Object(doctor_patch))
                .await?;
        }

        DoctorRepository::find_by_id(self, id).await
    }

    async fn delete(&self, id: &str) -> anyhow::Result<bool> {
        let filter = Self::id_filter(id);
        let deleted = self.rest_delete("doctors", &filter).await?;
        if !deleted {
            return Ok(false);
        }

        self.rest_delete("profiles", &filter).await?;

        let url = format!("{}/{}", self.auth_url("/admin/users"), urlencoding::encode(id));
        let resp = self
            .http_client
            .delete(&url)
            .header("apikey", self.service_key())
            .bearer_auth(self.service_key())
            .send()
            .await?;
        resp.error_for_status()?;

        Ok(true)
    }
}

#[async_trait]
impl PatientRepository for SupabaseClient {
    async fn create(&self, patient: &NewPatient) -> anyhow::Result<Patient> {
        self.rest_insert("patients", patient).await
    }

    async fn find_by_id(&self, id: &str) -> anyhow::Result<Option<Patient>> {
        let query = format!("select=*&{}", Self::id_filter(id));
        let rows: Vec<Patient> = self.rest_select("patients", &query).await?;
        Ok(rows.into_iter().next())
    }

    async fn list(&self) -> anyhow::Result<Vec<Patient>> {
        self.rest_select("patients", "select=*").await
    }

    async fn update(&self, id: &str, update: &PatientUpdate) -> anyhow::Result<Option<Patient>> {
        let rows: Vec<Patient> = self
            .rest_update("patients", &Self::id_filter(id), update)
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn delete(&self, id: &str) -> anyhow::Result<bool> {
        self.rest_delete("patients", &Self::id_filter(id)).await
    }
}

#[async_trait]
impl AppointmentRepository for SupabaseClient {
    async fn create(&self, appointment: &NewAppointment) -> anyhow::Result<Appointment> {
        self.rest_insert("appointments", appointment).await
    }

    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<Appointment>> {
        let query = format!("select=*&id=eq.{}", id);
        let rows: Vec<Appointment> = self.rest_select("appointments", &query).await?;
        Ok(rows.into_iter().next())
    }

    async fn list(&self) -> anyhow::Result<Vec<Appointment>> {
        self.rest_select("appointments", "select=*").await
    }

    async fn update(
        &self,
        id: i64,
        update: &AppointmentUpdate,
    ) -> anyhow::Result<Option<Appointment>> {
        let rows: Vec<Appointment> = self
            .rest_update("appointments", &format!("id=eq.{}", id), update)
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn delete(&self, id: i64) -> anyhow::Result<bool> {
        self.rest_delete("appointments", &format!("id=eq.{}", id))
            .await
    }
}
