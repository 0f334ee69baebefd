//! In-memory cache store

use crate::{CacheKey, CacheStore};
use async_trait::async_trait;
use dashmap::DashMap;
use intents_core::Result;
use serde_json::Value;
use std::sync::Arc;

/// Process-local cache store.
///
/// Entries live as long as the store. Suitable for tests and short-lived
/// hosts; use the SQLite store to keep results across restarts.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCacheStore {
    entries: Arc<DashMap<String, Value>>,
}

impl InMemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }
}

#[async_trait]
impl CacheStore for InMemoryCacheStore {
    async fn get(&self, key: &CacheKey) -> Result<Option<Value>> {
        Ok(self.entries.get(key.as_str()).map(|entry| entry.value().clone()))
    }

    async fn set(&self, key: &CacheKey, value: &Value) -> Result<()> {
        self.entries.insert(key.as_str().to_string(), value.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CallParameters;
    use serde_json::json;

    fn key(query: &str) -> CacheKey {
        CacheKey::derive("test", &CallParameters::new().with("query", query))
    }

    #[tokio::test]
    async fn test_set_then_get() {
        let store = InMemoryCacheStore::new();
        assert!(store.get(&key("a")).await.unwrap().is_none());

        store.set(&key("a"), &json!({"answer_summary": "one"})).await.unwrap();
        assert_eq!(
            store.get(&key("a")).await.unwrap(),
            Some(json!({"answer_summary": "one"}))
        );
        assert!(store.get(&key("b")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let store = InMemoryCacheStore::new();
        store.set(&key("a"), &json!(1)).await.unwrap();
        store.set(&key("a"), &json!(2)).await.unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&key("a")).await.unwrap(), Some(json!(2)));

        store.clear();
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_clones_share_entries() {
        let store = InMemoryCacheStore::new();
        let other = store.clone();
        other.set(&key("shared"), &json!("v")).await.unwrap();

        assert_eq!(store.get(&key("shared")).await.unwrap(), Some(json!("v")));
    }
}
