use serde::{Deserialize, Serialize};
use validator::Validate;

/// Creation request for a scheduled purchase. `waktu_pembelian` is the raw
/// user input; the command service parses and normalizes it before any
/// balance mutation happens.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateScheduledTransactionRequest {
    #[validate(range(min = 1, message = "userid must be positive"))]
    pub userid: i64,

    #[validate(length(min = 1, message = "produk_id is required"))]
    pub produk_id: String,

    #[validate(length(min = 1, message = "produk_nama is required"))]
    pub produk_nama: String,

    pub kategori: String,

    #[validate(range(min = 0, message = "harga_jual must not be negative"))]
    pub harga_jual: i64,

    #[validate(length(min = 1, message = "metode_pembayaran is required"))]
    pub metode_pembayaran: String,

    #[validate(length(min = 10, message = "msisdn too short"))]
    pub msisdn: String,

    #[validate(length(min = 1, message = "waktu_pembelian is required"))]
    pub waktu_pembelian: String,
}

/// Validated and normalized creation data handed to the command repository.
/// `waktu_pembelian` has already been parsed into a wall-clock timestamp and
/// `msisdn` normalized to the 62-prefixed form.
#[derive(Debug, Clone)]
pub struct CreateScheduleRow {
    pub userid: i64,
    pub produk_id: String,
    pub produk_nama: String,
    pub kategori: String,
    pub harga_jual: i64,
    pub metode_pembayaran: String,
    pub msisdn: String,
    pub waktu_pembelian: chrono::NaiveDateTime,
}

#[derive(Debug, Clone)]
pub struct FindSchedulesByUser {
    pub userid: i64,
    pub limit: i64,
}
