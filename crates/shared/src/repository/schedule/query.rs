use crate::{
    abstract_trait::schedule::repository::query::ScheduleQueryRepositoryTrait,
    config::ConnectionPool,
    domain::requests::schedule::FindSchedulesByUser,
    errors::RepositoryError,
    model::schedule::ScheduledTransactionModel,
};
use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use tracing::error;

pub struct ScheduleQueryRepository {
    db: ConnectionPool,
}

impl ScheduleQueryRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }

    async fn get_conn(
        &self,
    ) -> Result<sqlx::pool::PoolConnection<sqlx::Postgres>, RepositoryError> {
        self.db.acquire().await.map_err(|e| {
            error!("❌ Failed to acquire DB connection: {e:?}");
            RepositoryError::from(e)
        })
    }
}

#[async_trait]
impl ScheduleQueryRepositoryTrait for ScheduleQueryRepository {
    async fn find_by_id(
        &self,
        id: i64,
    ) -> Result<Option<ScheduledTransactionModel>, RepositoryError> {
        let mut conn = self.get_conn().await?;

        let row = sqlx::query_as::<_, ScheduledTransactionModel>(
            r#"
            SELECT
                id, userid, produk_id, produk_nama, kategori, harga_jual,
                metode_pembayaran, msisdn, waktu_pembelian, status, created_at
            FROM transaksi_terjadwal
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Database error when fetching scheduled tx {id}: {e:?}");
            RepositoryError::Sqlx(e)
        })?;

        Ok(row)
    }

    async fn find_by_user(
        &self,
        req: &FindSchedulesByUser,
    ) -> Result<Vec<ScheduledTransactionModel>, RepositoryError> {
        let mut conn = self.get_conn().await?;

        let limit = req.limit.clamp(1, 100);

        let rows = sqlx::query_as::<_, ScheduledTransactionModel>(
            r#"
            SELECT
                id, userid, produk_id, produk_nama, kategori, harga_jual,
                metode_pembayaran, msisdn, waktu_pembelian, status, created_at
            FROM transaksi_terjadwal
            WHERE userid = $1
            ORDER BY waktu_pembelian DESC
            LIMIT $2
            "#,
        )
        .bind(req.userid)
        .bind(limit)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| {
            error!(
                "❌ Database error when fetching schedules for user {}: {e:?}",
                req.userid
            );
            RepositoryError::Sqlx(e)
        })?;

        Ok(rows)
    }

    async fn list_pending_due(
        &self,
        cutoff: NaiveDateTime,
    ) -> Result<Vec<ScheduledTransactionModel>, RepositoryError> {
        let mut conn = self.get_conn().await?;

        let rows = sqlx::query_as::<_, ScheduledTransactionModel>(
            r#"
            SELECT
                id, userid, produk_id, produk_nama, kategori, harga_jual,
                metode_pembayaran, msisdn, waktu_pembelian, status, created_at
            FROM transaksi_terjadwal
            WHERE status = 'pending' AND waktu_pembelian <= $1
            ORDER BY waktu_pembelian ASC
            "#,
        )
        .bind(cutoff)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Database error when listing due schedules: {e:?}");
            RepositoryError::Sqlx(e)
        })?;

        Ok(rows)
    }
}
