use crate::{
    abstract_trait::schedule::{
        repository::query::DynScheduleQueryRepository,
        service::query::ScheduleQueryServiceTrait,
    },
    domain::requests::schedule::FindSchedulesByUser,
    errors::ServiceError,
    model::schedule::ScheduledTransactionModel,
};
use anyhow::Result;
use async_trait::async_trait;
use tracing::{error, info, instrument};

pub struct ScheduleQueryService {
    pub query: DynScheduleQueryRepository,
}

impl ScheduleQueryService {
    pub fn new(query: DynScheduleQueryRepository) -> Self {
        Self { query }
    }
}

#[async_trait]
impl ScheduleQueryServiceTrait for ScheduleQueryService {
    #[instrument(skip(self), level = "info")]
    async fn find_by_id(&self, id: i64) -> Result<ScheduledTransactionModel, ServiceError> {
        match self.query.find_by_id(id).await {
            Ok(Some(record)) => Ok(record),
            Ok(None) => Err(ServiceError::NotFound(format!(
                "Scheduled transaction {id} not found"
            ))),
            Err(e) => {
                error!("❌ find_by_id failed for scheduled tx {id}: {e:?}");
                Err(ServiceError::Repo(e))
            }
        }
    }

    #[instrument(skip(self, req), level = "info")]
    async fn find_by_user(
        &self,
        req: &FindSchedulesByUser,
    ) -> Result<Vec<ScheduledTransactionModel>, ServiceError> {
        let rows = self.query.find_by_user(req).await.map_err(|e| {
            error!(
                "❌ find_by_user failed for user {}: {e:?}",
                req.userid
            );
            ServiceError::Repo(e)
        })?;

        info!(
            "find_by_user returned {} schedules for user {}",
            rows.len(),
            req.userid
        );

        Ok(rows)
    }
}
