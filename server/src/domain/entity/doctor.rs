use serde::{Deserialize, Serialize};

/// Doctor は医師を表すドメインエンティティ。
/// `id` は認証基盤のユーザー ID と一致する（プロフィール・医師行が同じ ID を共有する）。
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

/// NewDoctor は医師作成時の入力を表す。
#[derive(Debug, Clone, PartialEq)]
pub struct NewDoctor {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: String,
    pub salary: f64,
    pub is_medical_director: bool,
    pub specialization: String,
}

/// DoctorUpdate は部分更新の入力を表す。None のフィールドは変更しない。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DoctorUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub salary: Option<f64>,
    pub is_medical_director: Option<bool>,
    pub specialization: Option<String>,
}
