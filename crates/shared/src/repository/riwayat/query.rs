use crate::{
    abstract_trait::riwayat::repository::query::RiwayatQueryRepositoryTrait,
    config::ConnectionPool, errors::RepositoryError, model::riwayat::RiwayatModel,
};
use anyhow::Result;
use async_trait::async_trait;
use tracing::error;

pub struct RiwayatQueryRepository {
    db: ConnectionPool,
}

impl RiwayatQueryRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RiwayatQueryRepositoryTrait for RiwayatQueryRepository {
    async fn find_by_user(
        &self,
        user_id: &str,
        limit: i64,
    ) -> Result<Vec<RiwayatModel>, RepositoryError> {
        let limit = limit.clamp(1, 100);

        let rows = sqlx::query_as::<_, RiwayatModel>(
            r#"
            SELECT
                id, user_id, msisdn, produk_id, produk_nama, kategori,
                harga_jual, metode_pembayaran, amount_charged, saldo_tersisa,
                trx_id, status, waktu, keterangan
            FROM riwayat_transaksi
            WHERE user_id = $1
            ORDER BY waktu DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.db)
        .await
        .map_err(|e| {
            error!("❌ Database error fetching riwayat for user {user_id}: {e:?}");
            RepositoryError::Sqlx(e)
        })?;

        Ok(rows)
    }

    async fn find_by_trx_id(&self, trx_id: &str) -> Result<Option<RiwayatModel>, RepositoryError> {
        let row = sqlx::query_as::<_, RiwayatModel>(
            r#"
            SELECT
                id, user_id, msisdn, produk_id, produk_nama, kategori,
                harga_jual, metode_pembayaran, amount_charged, saldo_tersisa,
                trx_id, status, waktu, keterangan
            FROM riwayat_transaksi
            WHERE trx_id = $1
            "#,
        )
        .bind(trx_id)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| {
            error!("❌ Database error fetching riwayat trx {trx_id}: {e:?}");
            RepositoryError::Sqlx(e)
        })?;

        Ok(row)
    }
}
