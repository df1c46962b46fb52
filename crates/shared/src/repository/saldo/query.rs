use crate::{
    abstract_trait::saldo::repository::query::SaldoQueryRepositoryTrait,
    config::ConnectionPool, errors::RepositoryError, model::user::UserModel,
};
use anyhow::Result;
use async_trait::async_trait;
use sqlx::Row;
use tracing::error;

pub struct SaldoQueryRepository {
    db: ConnectionPool,
}

impl SaldoQueryRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SaldoQueryRepositoryTrait for SaldoQueryRepository {
    async fn find_by_user(&self, userid: i64) -> Result<Option<UserModel>, RepositoryError> {
        let row = sqlx::query_as::<_, UserModel>(
            r#"
            SELECT userid, username, saldo, role, tanggal_daftar, status
            FROM users
            WHERE userid = $1
            "#,
        )
        .bind(userid)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| {
            error!("❌ Database error when fetching user {userid}: {e:?}");
            RepositoryError::Sqlx(e)
        })?;

        Ok(row)
    }

    async fn get_balance(&self, userid: i64) -> Result<i64, RepositoryError> {
        let row = sqlx::query("SELECT saldo FROM users WHERE userid = $1")
            .bind(userid)
            .fetch_optional(&self.db)
            .await
            .map_err(|e| {
                error!("❌ Database error when reading saldo for user {userid}: {e:?}");
                RepositoryError::Sqlx(e)
            })?;

        row.map(|r| r.get("saldo")).ok_or(RepositoryError::NotFound)
    }
}
