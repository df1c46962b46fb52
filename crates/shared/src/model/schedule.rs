use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

/// One pre-authorized future purchase. `waktu_pembelian` is a naive
/// wall-clock timestamp interpreted in the reference timezone (Asia/Jakarta).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ScheduledTransactionModel {
    pub id: i64,
    pub userid: i64,
    pub produk_id: String,
    pub produk_nama: String,
    pub kategori: String,
    pub harga_jual: i64,
    pub metode_pembayaran: String,
    pub msisdn: String,
    pub waktu_pembelian: NaiveDateTime,
    pub status: String,
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduleStatus {
    Pending,
    Sukses,
    Failed,
}

impl ScheduleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScheduleStatus::Pending => "pending",
            ScheduleStatus::Sukses => "sukses",
            ScheduleStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for ScheduleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    Balance,
    Dana,
    Gopay,
    Shopeepay,
    Qris,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Balance => "BALANCE",
            PaymentMethod::Dana => "DANA",
            PaymentMethod::Gopay => "GOPAY",
            PaymentMethod::Shopeepay => "SHOPEEPAY",
            PaymentMethod::Qris => "QRIS",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.to_uppercase().as_str() {
            "BALANCE" => Some(PaymentMethod::Balance),
            "DANA" => Some(PaymentMethod::Dana),
            "GOPAY" => Some(PaymentMethod::Gopay),
            "SHOPEEPAY" => Some(PaymentMethod::Shopeepay),
            "QRIS" => Some(PaymentMethod::Qris),
            _ => None,
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
