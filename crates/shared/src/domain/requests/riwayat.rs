use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsertRiwayatRequest {
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
    pub keterangan: Option<String>,
}
