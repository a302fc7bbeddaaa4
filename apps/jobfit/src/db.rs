use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

const MAX_CONNECTIONS: u32 = 10;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

/// Opens the PostgreSQL pool backing the document store.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    info!("Connecting to document store (PostgreSQL)...");

    let pool = PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect(database_url)
        .await
        .context("failed to connect to the document store database")?;

    info!(max_connections = MAX_CONNECTIONS, "Document store pool established");
    Ok(pool)
}
