use crate::CacheKey;
use async_trait::async_trait;
use intents_core::Result;
use serde_json::Value;

/// Keyed persistence behind the cache gateway.
///
/// Implementations provide their own concurrency guarantees; the gateway
/// adds no locking on top.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Returns the stored value, or `None` if the key is unknown
    async fn get(&self, key: &CacheKey) -> Result<Option<Value>>;

    /// Stores a value, replacing any existing entry for the key
    async fn set(&self, key: &CacheKey, value: &Value) -> Result<()>;
}
