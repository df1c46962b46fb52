use anyhow::{Context, Result};
use dotenv::dotenv;
use scheduler::di::DependenciesInject;
use shared::config::{Config, ConnectionManager};
use shared::utils::{init_logger, shutdown_signal};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    init_logger();

    let config = Config::from_env();

    let pool = ConnectionManager::new_pool(&config.database_url)
        .await
        .context("Failed to create connection pool")?;

    sqlx::migrate!("../../migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    let deps = DependenciesInject::new(pool, &config)
        .context("Failed to wire dependencies")?;

    println!("🚀 Settlement worker started successfully");

    let handle = deps.worker.clone().start();

    shutdown_signal().await;

    info!("Shutting down settlement worker...");
    handle.shutdown().await;

    Ok(())
}
