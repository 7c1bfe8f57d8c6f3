//! Redis connection service used for rate-limit counters.

use crate::config::RedisConfig;
use crate::error::{AppError, Result};
use redis::{aio::MultiplexedConnection, AsyncCommands, Client};
use tracing::info;

#[derive(Debug, Clone)]
pub struct RedisService {
    connection: MultiplexedConnection,
}

impl RedisService {
    pub async fn new(config: &RedisConfig) -> Result<Self> {
        info!("Initializing Redis connection");

        let client = Client::open(config.url.as_str())
            .map_err(|e| AppError::configuration(format!("Failed to create Redis client: {}", e)))?;

        let connection = client
            .get_multiplexed_tokio_connection()
            .await
            .map_err(|e| AppError::configuration(format!("Failed to connect to Redis: {}", e)))?;

        let mut conn = connection.clone();
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| AppError::configuration(format!("Redis health check failed: {}", e)))?;

        info!("Redis connection initialized");

        Ok(Self { connection })
    }

    /// Increments a fixed-window counter, starting the window on the first
    /// hit. Returns the count within the current window.
    pub async fn fixed_window_count(&self, key: &str, window_seconds: u64) -> Result<i64> {
        let mut conn = self.connection.clone();
        let count: i64 = conn.incr(key, 1).await?;
        if count == 1 {
            conn.expire::<_, ()>(key, window_seconds as i64).await?;
        }
        Ok(count)
    }

    pub async fn health_check(&self) -> Result<()> {
        let mut conn = self.connection.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }
}
