use crate::{
    abstract_trait::schedule::repository::command::CreatedSchedule,
    domain::requests::schedule::CreateScheduledTransactionRequest, errors::ServiceError,
};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub type DynScheduleCommandService = Arc<dyn ScheduleCommandServiceTrait + Send + Sync>;

#[async_trait]
pub trait ScheduleCommandServiceTrait {
    /// Validates the request, normalizes its msisdn and schedule time, and
    /// runs the atomic debit + insert + audit unit. Validation failures are
    /// rejected before any balance is touched.
    async fn create(
        &self,
        req: &CreateScheduledTransactionRequest,
    ) -> Result<CreatedSchedule, ServiceError>;
}
