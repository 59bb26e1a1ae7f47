use anyhow::{Context, Result};
use async_trait::async_trait;
use redis::AsyncCommands;

use super::kv_store::{KeyValueStore, StoreBackend};

/// Durable store backed by Redis string keys.
pub struct RedisStore {
    redis_client: redis::Client,
}

impl RedisStore {
    pub fn new(redis_url: &str) -> Result<Self> {
        let redis_client =
            redis::Client::open(redis_url).context("Failed to create Redis client")?;

        Ok(Self { redis_client })
    }

    async fn connection(&self) -> Result<redis::aio::MultiplexedConnection> {
        self.redis_client
            .get_multiplexed_async_connection()
            .await
            .context("Failed to get Redis connection")
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.connection().await?;
        let value: Option<String> = conn
            .get(key)
            .await
            .with_context(|| format!("Failed to read {} from Redis", key))?;

        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut conn = self.connection().await?;
        conn.set::<_, _, ()>(key, value)
            .await
            .with_context(|| format!("Failed to write {} to Redis", key))?;

        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let mut conn = self.connection().await?;
        conn.del::<_, ()>(key)
            .await
            .with_context(|| format!("Failed to remove {} from Redis", key))?;

        Ok(())
    }

    fn backend(&self) -> StoreBackend {
        StoreBackend::Durable
    }
}
