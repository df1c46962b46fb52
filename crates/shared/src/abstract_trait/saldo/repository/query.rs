use crate::{errors::RepositoryError, model::user::UserModel};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub type DynSaldoQueryRepository = Arc<dyn SaldoQueryRepositoryTrait + Send + Sync>;

#[async_trait]
pub trait SaldoQueryRepositoryTrait {
    async fn find_by_user(&self, userid: i64) -> Result<Option<UserModel>, RepositoryError>;

    async fn get_balance(&self, userid: i64) -> Result<i64, RepositoryError>;
}
