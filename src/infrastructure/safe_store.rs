use std::sync::Arc;
use tracing::{info, warn};

use super::kv_store::{KeyValueStore, StoreBackend};
use super::memory_store::MemoryStore;
use super::redis_store::RedisStore;

const PROBE_KEY: &str = "__test__";

/// Key-value store that prefers a durable backend and degrades to process
/// memory when the durable backend is unavailable or a call against it fails.
/// Reads and writes never fail from the caller's point of view.
pub struct SafeStore {
    durable: Option<Arc<dyn KeyValueStore>>,
    memory: MemoryStore,
}

impl SafeStore {
    /// Memory-only store.
    pub fn in_memory() -> Self {
        Self {
            durable: None,
            memory: MemoryStore::new(),
        }
    }

    /// Probe `candidate` with a write and a delete; keep it only if both work.
    pub async fn with_probe(candidate: Arc<dyn KeyValueStore>) -> Self {
        let usable = match candidate.set(PROBE_KEY, "1").await {
            Ok(()) => candidate.remove(PROBE_KEY).await.is_ok(),
            Err(e) => {
                warn!("Durable store probe failed: {:#}", e);
                false
            }
        };

        if usable {
            info!("Using durable history store");
            Self {
                durable: Some(candidate),
                memory: MemoryStore::new(),
            }
        } else {
            warn!("Durable store unavailable, history is kept in memory only");
            Self::in_memory()
        }
    }

    /// Redis-backed when `redis_url` is set and reachable, memory otherwise.
    pub async fn connect(redis_url: Option<&str>) -> Self {
        let Some(url) = redis_url else {
            info!("No REDIS_URL configured, history is kept in memory only");
            return Self::in_memory();
        };

        match RedisStore::new(url) {
            Ok(store) => Self::with_probe(Arc::new(store)).await,
            Err(e) => {
                warn!("Invalid Redis configuration: {:#}", e);
                Self::in_memory()
            }
        }
    }

    pub fn backend(&self) -> StoreBackend {
        self.durable
            .as_ref()
            .map_or(StoreBackend::Memory, |store| store.backend())
    }

    pub async fn get(&self, key: &str) -> Option<String> {
        if let Some(durable) = &self.durable {
            match durable.get(key).await {
                Ok(value) => return value,
                Err(e) => warn!("Durable read of {} failed, using memory: {:#}", key, e),
            }
        }
        self.memory.get(key).await.ok().flatten()
    }

    /// Returns `true` when the value reached the durable backend.
    pub async fn set(&self, key: &str, value: &str) -> bool {
        if let Some(durable) = &self.durable {
            match durable.set(key, value).await {
                Ok(()) => return true,
                Err(e) => warn!("Durable write of {} failed, using memory: {:#}", key, e),
            }
        }
        let _ = self.memory.set(key, value).await;
        false
    }

    /// Returns `true` when the key was removed from the durable backend.
    /// The memory copy is always dropped.
    pub async fn remove(&self, key: &str) -> bool {
        let _ = self.memory.remove(key).await;

        if let Some(durable) = &self.durable {
            match durable.remove(key).await {
                Ok(()) => return true,
                Err(e) => warn!("Durable remove of {} failed: {:#}", key, e),
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Memory store that can be switched into a failing state.
    #[derive(Default)]
    struct FlakyStore {
        inner: MemoryStore,
        failing: AtomicBool,
    }

    impl FlakyStore {
        fn check(&self) -> Result<()> {
            if self.failing.load(Ordering::SeqCst) {
                Err(anyhow!("backend offline"))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl KeyValueStore for FlakyStore {
        async fn get(&self, key: &str) -> Result<Option<String>> {
            self.check()?;
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, value: &str) -> Result<()> {
            self.check()?;
            self.inner.set(key, value).await
        }

        async fn remove(&self, key: &str) -> Result<()> {
            self.check()?;
            self.inner.remove(key).await
        }

        fn backend(&self) -> StoreBackend {
            StoreBackend::Durable
        }
    }

    #[tokio::test]
    async fn test_probe_accepts_working_store() {
        let durable = Arc::new(FlakyStore::default());
        let store = SafeStore::with_probe(durable.clone()).await;

        assert_eq!(store.backend(), StoreBackend::Durable);
        assert!(store.set("k", "v").await);
        assert_eq!(durable.inner.get("k").await.unwrap(), Some("v".to_string()));
        assert_eq!(durable.inner.get(PROBE_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_probe_rejects_failing_store() {
        let durable = Arc::new(FlakyStore::default());
        durable.failing.store(true, Ordering::SeqCst);

        let store = SafeStore::with_probe(durable).await;

        assert_eq!(store.backend(), StoreBackend::Memory);
        assert!(!store.set("k", "v").await);
        assert_eq!(store.get("k").await, Some("v".to_string()));
    }

    #[tokio::test]
    async fn test_falls_back_to_memory_after_failure() {
        let durable = Arc::new(FlakyStore::default());
        let store = SafeStore::with_probe(durable.clone()).await;

        durable.failing.store(true, Ordering::SeqCst);

        assert!(!store.set("k", "fallback").await);
        assert_eq!(store.get("k").await, Some("fallback".to_string()));
        assert!(!store.remove("k").await);
        assert_eq!(store.get("k").await, None);
    }

    #[tokio::test]
    async fn test_remove_drops_stale_memory_copy() {
        let durable = Arc::new(FlakyStore::default());
        let store = SafeStore::with_probe(durable.clone()).await;

        durable.failing.store(true, Ordering::SeqCst);
        assert!(!store.set("k", "stale").await);

        durable.failing.store(false, Ordering::SeqCst);
        assert!(store.remove("k").await);

        // A later durable outage must not resurrect the removed value
        durable.failing.store(true, Ordering::SeqCst);
        assert_eq!(store.get("k").await, None);
    }

    #[tokio::test]
    async fn test_connect_without_url_is_memory() {
        let store = SafeStore::connect(None).await;
        assert_eq!(store.backend(), StoreBackend::Memory);
    }
}
