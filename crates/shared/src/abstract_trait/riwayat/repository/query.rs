use crate::{errors::RepositoryError, model::riwayat::RiwayatModel};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub type DynRiwayatQueryRepository = Arc<dyn RiwayatQueryRepositoryTrait + Send + Sync>;

#[async_trait]
pub trait RiwayatQueryRepositoryTrait {
    async fn find_by_user(
        &self,
        user_id: &str,
        limit: i64,
    ) -> Result<Vec<RiwayatModel>, RepositoryError>;

    async fn find_by_trx_id(&self, trx_id: &str) -> Result<Option<RiwayatModel>, RepositoryError>;
}
