use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserModel {
    pub userid: i64,
    pub username: Option<String>,
    pub saldo: i64,
    pub role: Option<String>,
    pub tanggal_daftar: Option<NaiveDateTime>,
    pub status: Option<String>,
}
