use async_trait::async_trait;
use moka::future::Cache as MokaCache;

use super::{Cache, CacheError};

/// In-process cache. Unbounded and without expiry; entries live until deleted.
#[derive(Clone)]
pub struct MemoryCache {
    inner: MokaCache<String, String>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self {
            inner: MokaCache::builder().build(),
        }
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(self.inner.get(key).await)
    }

    async fn set(&self, key: &str, value: String) -> Result<(), CacheError> {
        self.inner.insert(key.to_string(), value).await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.inner.invalidate(key).await;
        Ok(())
    }

    async fn delete_by_prefix(&self, prefix: &str) -> Result<u64, CacheError> {
        let keys: Vec<_> = self
            .inner
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(key, _)| key)
            .collect();

        for key in &keys {
            self.inner.invalidate(key.as_str()).await;
        }

        Ok(keys.len() as u64)
    }
}
