use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Append-only record of a balance-affecting event. `amount_charged` is 0 for
/// a refund entry; `saldo_tersisa` snapshots the balance after the event.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RiwayatModel {
    pub id: i64,
    pub user_id: String,
    pub msisdn: String,
    pub produk_id: String,
    pub produk_nama: String,
    pub kategori: String,
    pub harga_jual: i64,
    pub metode_pembayaran: String,
    pub amount_charged: i64,
    pub saldo_tersisa: i64,
    pub trx_id: String,
    pub status: String,
    pub waktu: Option<NaiveDateTime>,
    pub keterangan: Option<String>,
}
