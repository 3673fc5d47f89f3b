use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Patient は患者を表すドメインエンティティ。
/// フィールド名はデータ基盤のカラム名に一致させる。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Patient {
    pub id: String,
    /// 院内患者番号（例: HD-2024-1234）。
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

/// NewPatient は患者作成時の入力を表す。
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewPatient {
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

/// PatientUpdate は部分更新の入力を表す。None のフィールドは変更しない。
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct PatientUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profession: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children_number: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family_situation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,
}
