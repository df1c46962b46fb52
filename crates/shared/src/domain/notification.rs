use serde::{Deserialize, Serialize};

/// Payload for the single success notification emitted per settled purchase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessNotification {
    pub user_id: i64,
    pub username: Option<String>,
    pub produk_nama: String,
    pub harga: i64,
    pub msisdn: String,
    pub trx_id: String,
    pub metode_pembayaran: String,
    pub saldo_akhir: i64,
    pub payment_link: Option<String>,
    pub qr_string: Option<String>,
}

/// Payload for the single failure notification emitted per refunded purchase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureNotification {
    pub user_id: i64,
    pub username: Option<String>,
    pub produk_nama: String,
    pub harga: i64,
    pub msisdn: String,
    pub trx_id: String,
    pub metode_pembayaran: String,
    pub saldo_sebelum: Option<i64>,
    pub saldo_akhir: i64,
    pub refunded_amount: i64,
    pub reason: String,
    pub provider_message: Option<String>,
}
