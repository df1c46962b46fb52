use crate::{
    abstract_trait::riwayat::repository::command::RiwayatCommandRepositoryTrait,
    config::ConnectionPool,
    domain::requests::riwayat::InsertRiwayatRequest,
    errors::RepositoryError,
    model::riwayat::RiwayatModel,
};
use anyhow::Result;
use async_trait::async_trait;
use tracing::error;

pub struct RiwayatCommandRepository {
    db: ConnectionPool,
}

impl RiwayatCommandRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RiwayatCommandRepositoryTrait for RiwayatCommandRepository {
    async fn insert(&self, req: &InsertRiwayatRequest) -> Result<RiwayatModel, RepositoryError> {
        let record = sqlx::query_as::<_, RiwayatModel>(
            r#"
            INSERT INTO riwayat_transaksi (
                user_id, msisdn, produk_id, produk_nama, kategori, harga_jual,
                metode_pembayaran, amount_charged, saldo_tersisa, trx_id,
                status, keterangan
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING
                id, user_id, msisdn, produk_id, produk_nama, kategori,
                harga_jual, metode_pembayaran, amount_charged, saldo_tersisa,
                trx_id, status, waktu, keterangan
            "#,
        )
        .bind(&req.user_id)
        .bind(&req.msisdn)
        .bind(&req.produk_id)
        .bind(&req.produk_nama)
        .bind(&req.kategori)
        .bind(req.harga_jual)
        .bind(&req.metode_pembayaran)
        .bind(req.amount_charged)
        .bind(req.saldo_tersisa)
        .bind(&req.trx_id)
        .bind(&req.status)
        .bind(&req.keterangan)
        .fetch_one(&self.db)
        .await
        .map_err(|e| {
            error!("❌ Database error in insert riwayat: {e:?}");
            RepositoryError::Sqlx(e)
        })?;

        Ok(record)
    }
}
