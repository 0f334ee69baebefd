//! # Result cache for tool calls
//!
//! Deterministic keys derived from a namespace plus the parameters of a call,
//! and a best-effort gateway over pluggable storage.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use intents_cache::{CacheGateway, CallParameters};
//! use serde_json::json;
//!
//! # async fn example() {
//! let cache = CacheGateway::in_memory();
//! let params = CallParameters::new()
//!     .with("model", "gemini-2.0-flash-exp")
//!     .with("query", "tallest building in Europe");
//!
//! if cache.get("search_web_google", &params).await.is_none() {
//!     cache.set("search_web_google", &params, &json!({"answer_summary": "..."})).await;
//! }
//! # }
//! ```

mod gateway;
mod key;
mod memory;
#[cfg(feature = "sqlite")]
mod sqlite;
mod store;

pub use gateway::CacheGateway;
pub use key::{CacheKey, CallParameters};
pub use memory::InMemoryCacheStore;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteCacheStore;
pub use store::CacheStore;
