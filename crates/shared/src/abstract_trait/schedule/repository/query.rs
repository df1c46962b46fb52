use crate::{
    domain::requests::schedule::FindSchedulesByUser, errors::RepositoryError,
    model::schedule::ScheduledTransactionModel,
};
use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use std::sync::Arc;

pub type DynScheduleQueryRepository = Arc<dyn ScheduleQueryRepositoryTrait + Send + Sync>;

#[async_trait]
pub trait ScheduleQueryRepositoryTrait {
    async fn find_by_id(
        &self,
        id: i64,
    ) -> Result<Option<ScheduledTransactionModel>, RepositoryError>;

    async fn find_by_user(
        &self,
        req: &FindSchedulesByUser,
    ) -> Result<Vec<ScheduledTransactionModel>, RepositoryError>;

    /// Pending rows whose scheduled time is at or before `cutoff`, ascending
    /// by scheduled time.
    async fn list_pending_due(
        &self,
        cutoff: NaiveDateTime,
    ) -> Result<Vec<ScheduledTransactionModel>, RepositoryError>;
}
