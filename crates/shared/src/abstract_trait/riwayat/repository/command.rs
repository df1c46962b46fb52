use crate::{
    domain::requests::riwayat::InsertRiwayatRequest, errors::RepositoryError,
    model::riwayat::RiwayatModel,
};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub type DynRiwayatCommandRepository = Arc<dyn RiwayatCommandRepositoryTrait + Send + Sync>;

#[async_trait]
pub trait RiwayatCommandRepositoryTrait {
    /// Appends one audit entry. Entries are never updated or deleted.
    async fn insert(&self, req: &InsertRiwayatRequest) -> Result<RiwayatModel, RepositoryError>;
}
