use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Appointment は診察予約を表すドメインエンティティ。
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

/// NewAppointment は予約作成時の入力を表す。
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewAppointment {
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

/// AppointmentUpdate は部分更新の入力を表す。None のフィールドは変更しない。
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct AppointmentUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_number: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}
