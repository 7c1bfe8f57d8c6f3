//! Repository functions over the PostgreSQL pool.

pub mod files;
pub mod posts;
pub mod users;

use crate::config::DatabaseConfig;
use crate::error::{AppError, Result};
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use tracing::info;

pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool> {
    info!("Initializing database connection pool");

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_seconds))
        .idle_timeout(Duration::from_secs(config.idle_timeout_seconds))
        .connect(&config.url)
        .await
        .map_err(|e| AppError::configuration(format!("Failed to connect to database: {}", e)))?;

    // Connection health check before serving traffic
    sqlx::query("SELECT 1")
        .fetch_one(&pool)
        .await
        .map_err(|e| AppError::configuration(format!("Database health check failed: {}", e)))?;

    info!("Database connection pool initialized");

    Ok(pool)
}
