//! Best-effort cache access for tools

use crate::{CacheKey, CacheStore, CallParameters, InMemoryCacheStore};
use intents_core::{CacheConfig, Error, Result};
use serde_json::Value;
use std::sync::Arc;

/// Namespaced, best-effort access to a [`CacheStore`].
///
/// Storage failures never surface: a failed read is a miss, a failed write
/// is logged and reported as `false`.
#[derive(Clone)]
pub struct CacheGateway {
    store: Arc<dyn CacheStore>,
}

impl CacheGateway {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self { store }
    }

    /// Gateway over a fresh in-memory store
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryCacheStore::new()))
    }

    /// Open the store selected by configuration
    pub async fn from_config(config: &CacheConfig) -> Result<Self> {
        match config.provider.as_str() {
            "in-memory" | "memory" => Ok(Self::in_memory()),
            #[cfg(feature = "sqlite")]
            "sqlite" => {
                let store = crate::SqliteCacheStore::open(&config.path).await?;
                Ok(Self::new(Arc::new(store)))
            }
            other => Err(Error::config_error(format!(
                "Unsupported cache provider: {}",
                other
            ))),
        }
    }

    pub fn key(namespace: &str, params: &CallParameters) -> CacheKey {
        CacheKey::derive(namespace, params)
    }

    /// Look up a cached value. Errors and stored nulls count as a miss.
    pub async fn get(&self, namespace: &str, params: &CallParameters) -> Option<Value> {
        let key = Self::key(namespace, params);

        match self.store.get(&key).await {
            Ok(Some(Value::Null)) | Ok(None) => {
                tracing::debug!(namespace, key = %key, "Cache miss");
                None
            }
            Ok(Some(value)) => {
                tracing::debug!(namespace, key = %key, "Cache hit");
                Some(value)
            }
            Err(e) => {
                tracing::warn!(
                    namespace,
                    key = %key,
                    error = %e,
                    "Cache read failed, treating as miss"
                );
                None
            }
        }
    }

    /// Store a value, overwriting any previous entry. Returns whether the
    /// write succeeded.
    pub async fn set(&self, namespace: &str, params: &CallParameters, value: &Value) -> bool {
        let key = Self::key(namespace, params);

        match self.store.set(&key, value).await {
            Ok(()) => {
                tracing::debug!(namespace, key = %key, "Cached result");
                true
            }
            Err(e) => {
                tracing::warn!(namespace, key = %key, error = %e, "Cache write failed");
                false
            }
        }
    }
}
