//! SQLite-backed cache store

use crate::{CacheKey, CacheStore};
use async_trait::async_trait;
use intents_core::{Error, Result};
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Pool, Row, Sqlite};
use std::path::Path;
use std::time::Duration;

const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS tool_cache (
        key TEXT PRIMARY KEY NOT NULL,
        value TEXT NOT NULL,
        created_at TEXT NOT NULL
    )
"#;

/// Cache store persisted in a SQLite database file.
///
/// Every operation checks a connection out of the pool for its own duration
/// only. Concurrent readers and writers are serialized by SQLite itself (WAL
/// journal with a busy timeout).
#[derive(Debug, Clone)]
pub struct SqliteCacheStore {
    pool: Pool<Sqlite>,
}

impl SqliteCacheStore {
    /// Open (or create) the database file and ensure the cache table exists
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(5))
            .connect_with(options)
            .await
            .map_err(|e| {
                Error::cache_error(format!("Failed to open SQLite cache {:?}: {}", path, e))
            })?;

        tracing::debug!(path = ?path, "Opened SQLite cache");
        Self::from_pool(pool).await
    }

    /// Private in-memory database, mostly for tests
    pub async fn in_memory() -> Result<Self> {
        let options: SqliteConnectOptions = "sqlite::memory:"
            .parse()
            .map_err(|e| Error::cache_error(format!("Invalid SQLite options: {}", e)))?;

        // Each connection would get its own database, so pin exactly one
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| Error::cache_error(format!("Failed to open SQLite cache: {}", e)))?;

        Self::from_pool(pool).await
    }

    /// Create from an existing pool, creating the cache table if needed
    pub async fn from_pool(pool: Pool<Sqlite>) -> Result<Self> {
        sqlx::query(CREATE_TABLE)
            .execute(&pool)
            .await
            .map_err(|e| Error::cache_error(format!("Failed to create cache table: {}", e)))?;

        Ok(Self { pool })
    }

    /// Number of stored entries
    pub async fn len(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM tool_cache")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| Error::cache_error(format!("Failed to count cache entries: {}", e)))?;

        row.try_get("count")
            .map_err(|e| Error::cache_error(format!("Failed to read count: {}", e)))
    }

    /// Close the underlying pool
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl CacheStore for SqliteCacheStore {
    async fn get(&self, key: &CacheKey) -> Result<Option<Value>> {
        let row = sqlx::query("SELECT value FROM tool_cache WHERE key = ?")
            .bind(key.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| Error::cache_error(format!("Failed to read cache entry: {}", e)))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let text: String = row
            .try_get("value")
            .map_err(|e| Error::cache_error(format!("Failed to read cache value: {}", e)))?;

        Ok(Some(serde_json::from_str(&text)?))
    }

    async fn set(&self, key: &CacheKey, value: &Value) -> Result<()> {
        let text = serde_json::to_string(value)?;

        sqlx::query(
            "INSERT INTO tool_cache (key, value, created_at) VALUES (?, ?, ?) \
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, created_at = excluded.created_at",
        )
        .bind(key.as_str())
        .bind(text)
        .bind(chrono::Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| Error::cache_error(format!("Failed to write cache entry: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CallParameters;
    use serde_json::json;

    fn key(query: &str) -> CacheKey {
        CacheKey::derive(
            "search_web_google",
            &CallParameters::new().with("model", "m").with("query", query),
        )
    }

    #[tokio::test]
    async fn test_in_memory_round_trip() {
        let store = SqliteCacheStore::in_memory().await.unwrap();
        assert!(store.get(&key("q")).await.unwrap().is_none());

        let value = json!({"answer_summary": "sunny", "sources": []});
        store.set(&key("q"), &value).await.unwrap();

        assert_eq!(store.get(&key("q")).await.unwrap(), Some(value));
        assert_eq!(store.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_upsert_replaces_value() {
        let store = SqliteCacheStore::in_memory().await.unwrap();
        store.set(&key("q"), &json!("old")).await.unwrap();
        store.set(&key("q"), &json!("new")).await.unwrap();

        assert_eq!(store.get(&key("q")).await.unwrap(), Some(json!("new")));
        assert_eq!(store.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_entries_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.db");

        let first = SqliteCacheStore::open(&path).await.unwrap();
        first.set(&key("persisted"), &json!({"answer_summary": "kept"})).await.unwrap();
        first.close().await;

        let second = SqliteCacheStore::open(&path).await.unwrap();
        assert_eq!(
            second.get(&key("persisted")).await.unwrap(),
            Some(json!({"answer_summary": "kept"}))
        );
        second.close().await;
    }

    #[tokio::test]
    async fn test_corrupt_value_is_an_error() {
        let store = SqliteCacheStore::in_memory().await.unwrap();
        sqlx::query("INSERT INTO tool_cache (key, value, created_at) VALUES (?, 'not json', '')")
            .bind(key("bad").as_str())
            .execute(&store.pool)
            .await
            .unwrap();

        assert!(store.get(&key("bad")).await.is_err());
    }
}
