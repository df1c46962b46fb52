use crate::errors::RepositoryError;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub type DynSaldoCommandRepository = Arc<dyn SaldoCommandRepositoryTrait + Send + Sync>;

/// Ledger writes. Both operations follow the write-then-verify protocol: the
/// new balance is written, re-read, and on mismatch the write is retried once
/// before logging a consistency warning. Debits floor-clamp at zero.
#[async_trait]
pub trait SaldoCommandRepositoryTrait {
    async fn debit(&self, userid: i64, amount: i64) -> Result<i64, RepositoryError>;

    async fn credit(&self, userid: i64, amount: i64) -> Result<i64, RepositoryError>;
}
