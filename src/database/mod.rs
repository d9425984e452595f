//! SQLite pool setup.

use std::str::FromStr;

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::config::AppConfig;

const MAX_CONNECTIONS: u32 = 5;

pub async fn initialize_database(config: &AppConfig) -> Result<SqlitePool> {
    open_pool(&config.database_url, MAX_CONNECTIONS).await
}

/// Opens the database, creating the file when missing, and applies pending migrations.
pub async fn open_pool(database_url: &str, max_connections: u32) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)
        .with_context(|| format!("Invalid DATABASE_URL: {}", database_url))?
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await
        .with_context(|| format!("Failed to open {}", database_url))?;

    let migrator = sqlx::migrate!("./migrations");
    migrator.run(&pool).await.context("Failed to apply migrations")?;
    tracing::info!(
        "Vault database ready at {} ({} migrations)",
        database_url,
        migrator.iter().count()
    );

    Ok(pool)
}
