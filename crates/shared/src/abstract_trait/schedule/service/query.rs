use crate::{
    domain::requests::schedule::FindSchedulesByUser, errors::ServiceError,
    model::schedule::ScheduledTransactionModel,
};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub type DynScheduleQueryService = Arc<dyn ScheduleQueryServiceTrait + Send + Sync>;

#[async_trait]
pub trait ScheduleQueryServiceTrait {
    async fn find_by_id(&self, id: i64) -> Result<ScheduledTransactionModel, ServiceError>;

    async fn find_by_user(
        &self,
        req: &FindSchedulesByUser,
    ) -> Result<Vec<ScheduledTransactionModel>, ServiceError>;
}
