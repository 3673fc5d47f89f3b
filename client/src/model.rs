use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Envelope はサーバの成功・失敗レスポンス共通のワイヤ形式。
/// 成功時は `data` が、失敗時は `ErrorType` / `UserMessage` 側が埋まる。
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default)]
    pub status: Option<u16>,
    #[serde(default)]
    pub data: Option<T>,
    #[serde(rename = "ErrorType", default)]
    pub error_type: Option<String>,
    #[serde(rename = "subErrorType", default)]
    pub sub_error_type: Option<String>,
    #[serde(default)]
    pub context: Option<serde_json::Value>,
    #[serde(rename = "UserMessage", default)]
    pub user_message: Option<String>,
}

/// AuthSession はログイン・リフレッシュで得られるセッション。
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AuthSession {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub refresh_token: String,
    pub user: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Doctor {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: String,
    pub salary: f64,
    pub is_medical_director: bool,
    pub specialization: String,
}

/// DoctorData は医師作成フォームの入力（サーバは camelCase を期待する）。
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DoctorData {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub role: String,
    pub salary: f64,
    pub is_medical_director: bool,
    pub specialization: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Patient {
    pub id: String,
    #[serde(default)]
    pub patient_id: Option<String>,
    pub name: String,
    pub address: String,
    pub phone_number: String,
    pub profession: String,
    pub children_number: i32,
    pub family_situation: String,
    pub birth_date: NaiveDate,
}

/// PatientData は患者フォームの入力。
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PatientData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<String>,
    pub name: String,
    pub address: String,
    pub phone_number: String,
    pub profession: String,
    pub children_number: i32,
    pub family_situation: String,
    pub birth_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Appointment {
    pub id: i64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub estimated_duration: Option<String>,
    pub doctor_id: String,
    pub patient_id: String,
    #[serde(default)]
    pub room_number: Option<i32>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
}

/// AppointmentData は予約フォームの入力。
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AppointmentData {
    pub date: DateTime<Utc>,
    pub doctor_id: String,
    pub patient_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_number: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}
