use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;
use tracing::info;

pub type ConnectionPool = sqlx::PgPool;

pub struct ConnectionManager;

impl ConnectionManager {
    pub async fn new_pool(database_url: &str) -> Result<ConnectionPool> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .acquire_timeout(Duration::from_secs(5))
            .connect(database_url)
            .await
            .context("failed to connect to database")?;

        info!("✅ Database connection pool established");

        Ok(pool)
    }
}
