use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;

/// Where a store keeps its data.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    Durable,
    Memory,
}

/// Minimal string key-value store used for calculation history.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> Result<()>;

    async fn remove(&self, key: &str) -> Result<()>;

    fn backend(&self) -> StoreBackend;
}
