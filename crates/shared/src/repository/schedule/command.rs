use crate::{
    abstract_trait::schedule::repository::command::{
        CreatedSchedule, ScheduleCommandRepositoryTrait,
    },
    config::ConnectionPool,
    domain::requests::schedule::CreateScheduleRow,
    errors::RepositoryError,
    model::schedule::{ScheduleStatus, ScheduledTransactionModel},
};
use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;
use tracing::error;

pub struct ScheduleCommandRepository {
    db: ConnectionPool,
}

impl ScheduleCommandRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ScheduleCommandRepositoryTrait for ScheduleCommandRepository {
    async fn create_with_debit(
        &self,
        req: &CreateScheduleRow,
    ) -> Result<CreatedSchedule, RepositoryError> {
        let mut tx = self.db.begin().await.map_err(|e| {
            error!("❌ Failed to begin creation transaction: {e:?}");
            RepositoryError::Sqlx(e)
        })?;

        // Debit first, clamped at zero. The row insert and the audit entry
        // commit together with it or not at all.
        let saldo_after: i64 = sqlx::query(
            r#"
            UPDATE users
            SET saldo = GREATEST(0, saldo - $2)
            WHERE userid = $1
            RETURNING saldo
            "#,
        )
        .bind(req.userid)
        .bind(req.harga_jual)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            error!(
                "❌ Database error while debiting user {} at creation: {e:?}",
                req.userid
            );
            RepositoryError::Sqlx(e)
        })?
        .map(|row| row.get("saldo"))
        .ok_or(RepositoryError::NotFound)?;

        let record = sqlx::query_as::<_, ScheduledTransactionModel>(
            r#"
            INSERT INTO transaksi_terjadwal (
                userid, produk_id, produk_nama, kategori, harga_jual,
                metode_pembayaran, msisdn, waktu_pembelian, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 'pending')
            RETURNING
                id, userid, produk_id, produk_nama, kategori, harga_jual,
                metode_pembayaran, msisdn, waktu_pembelian, status, created_at
            "#,
        )
        .bind(req.userid)
        .bind(&req.produk_id)
        .bind(&req.produk_nama)
        .bind(&req.kategori)
        .bind(req.harga_jual)
        .bind(&req.metode_pembayaran)
        .bind(&req.msisdn)
        .bind(req.waktu_pembelian)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            error!("❌ Database error in create scheduled tx: {e:?}");
            RepositoryError::Sqlx(e)
        })?;

        let trx_id = format!("local_{}_{}", record.id, Utc::now().timestamp());

        sqlx::query(
            r#"
            INSERT INTO riwayat_transaksi (
                user_id, msisdn, produk_id, produk_nama, kategori, harga_jual,
                metode_pembayaran, amount_charged, saldo_tersisa, trx_id,
                status, keterangan
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, 'sukses', $11)
            "#,
        )
        .bind(req.userid.to_string())
        .bind(&req.msisdn)
        .bind(&req.produk_id)
        .bind(&req.produk_nama)
        .bind(&req.kategori)
        .bind(req.harga_jual)
        .bind(&req.metode_pembayaran)
        .bind(req.harga_jual)
        .bind(saldo_after)
        .bind(&trx_id)
        .bind(format!(
            "Saldo dipotong saat menyimpan transaksi terjadwal id={}",
            record.id
        ))
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            error!(
                "❌ Database error writing creation audit for tx {}: {e:?}",
                record.id
            );
            RepositoryError::Sqlx(e)
        })?;

        tx.commit().await.map_err(|e| {
            error!("❌ Failed to commit creation transaction: {e:?}");
            RepositoryError::Sqlx(e)
        })?;

        Ok(CreatedSchedule {
            transaction: record,
            saldo_after,
        })
    }

    async fn update_status(
        &self,
        id: i64,
        status: ScheduleStatus,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE transaksi_terjadwal
            SET status = $2
            WHERE id = $1 AND status = 'pending'
            "#,
        )
        .bind(id)
        .bind(status.as_str())
        .execute(&self.db)
        .await
        .map_err(|e| {
            error!("❌ Database error in update_status for tx {id}: {e:?}");
            RepositoryError::Sqlx(e)
        })?;

        Ok(result.rows_affected() > 0)
    }
}
