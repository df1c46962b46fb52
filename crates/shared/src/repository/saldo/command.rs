use crate::{
    abstract_trait::saldo::repository::command::SaldoCommandRepositoryTrait,
    config::ConnectionPool, errors::RepositoryError,
};
use anyhow::Result;
use async_trait::async_trait;
use sqlx::Row;
use tracing::{error, warn};

pub struct SaldoCommandRepository {
    db: ConnectionPool,
}

impl SaldoCommandRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }

    async fn read_balance(&self, userid: i64) -> Result<i64, RepositoryError> {
        let row = sqlx::query("SELECT saldo FROM users WHERE userid = $1")
            .bind(userid)
            .fetch_optional(&self.db)
            .await
            .map_err(|e| {
                error!("❌ Database error reading saldo for user {userid}: {e:?}");
                RepositoryError::Sqlx(e)
            })?;

        row.map(|r| r.get("saldo")).ok_or(RepositoryError::NotFound)
    }

    async fn write_balance(&self, userid: i64, saldo: i64) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE users SET saldo = $2 WHERE userid = $1")
            .bind(userid)
            .bind(saldo)
            .execute(&self.db)
            .await
            .map_err(|e| {
                error!("❌ Database error writing saldo for user {userid}: {e:?}");
                RepositoryError::Sqlx(e)
            })?;

        Ok(())
    }

    /// Write the expected balance, re-read, retry the write once on mismatch.
    /// A second mismatch is logged as a consistency anomaly and the last read
    /// value is returned; execution continues.
    async fn write_verified(
        &self,
        userid: i64,
        expected: i64,
    ) -> Result<i64, RepositoryError> {
        self.write_balance(userid, expected).await?;
        let mut observed = self.read_balance(userid).await?;

        if observed != expected {
            warn!(
                "⚠️ Saldo write for user {userid} did not verify (expected={expected} observed={observed}); retrying once"
            );
            self.write_balance(userid, expected).await?;
            observed = self.read_balance(userid).await?;

            if observed != expected {
                warn!(
                    "⚠️ Saldo consistency anomaly for user {userid}: expected={expected} observed={observed}"
                );
            }
        }

        Ok(observed)
    }
}

/// Debits floor-clamp at zero instead of erroring on insufficient balance.
/// When a clamp fires, the books no longer reflect the full amount taken; a
/// later refund of the same amount then over-credits by the clamped part.
pub fn clamped_debit(current: i64, amount: i64) -> i64 {
    (current - amount).max(0)
}

#[async_trait]
impl SaldoCommandRepositoryTrait for SaldoCommandRepository {
    async fn debit(&self, userid: i64, amount: i64) -> Result<i64, RepositoryError> {
        let current = self.read_balance(userid).await?;
        let expected = clamped_debit(current, amount);
        self.write_verified(userid, expected).await
    }

    async fn credit(&self, userid: i64, amount: i64) -> Result<i64, RepositoryError> {
        let current = self.read_balance(userid).await?;
        let expected = current + amount;
        self.write_verified(userid, expected).await
    }
}
