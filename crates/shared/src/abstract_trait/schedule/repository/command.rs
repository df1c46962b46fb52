use crate::{
    domain::requests::schedule::CreateScheduleRow, errors::RepositoryError,
    model::schedule::{ScheduleStatus, ScheduledTransactionModel},
};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub type DynScheduleCommandRepository = Arc<dyn ScheduleCommandRepositoryTrait + Send + Sync>;

/// Result of the atomic creation unit: the inserted row plus the balance
/// left after the debit it carries.
#[derive(Debug, Clone)]
pub struct CreatedSchedule {
    pub transaction: ScheduledTransactionModel,
    pub saldo_after: i64,
}

#[async_trait]
pub trait ScheduleCommandRepositoryTrait {
    /// Debits the user's balance, inserts the pending row and the creation
    /// audit entry in one database transaction. A crash can never leave a
    /// debit without its schedule row.
    async fn create_with_debit(
        &self,
        req: &CreateScheduleRow,
    ) -> Result<CreatedSchedule, RepositoryError>;

    /// Transitions a row out of `pending`. Returns false without touching the
    /// row when it is already terminal, which makes the pending→terminal
    /// transition single-writer.
    async fn update_status(
        &self,
        id: i64,
        status: ScheduleStatus,
    ) -> Result<bool, RepositoryError>;
}
