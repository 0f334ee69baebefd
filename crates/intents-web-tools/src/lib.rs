//! Web search tools for intents agents
//!
//! ## GoogleSearchTool
//!
//! Answers questions that need fresh information by asking Gemini with the
//! built-in Google Search grounding tool enabled. The agent receives one of:
//!
//! - `{answer_summary, sources, instruction}`: a summary with up to three
//!   `{title, url}` sources
//! - `{results: "No information found.", instruction}`
//! - `{error}`: a short message; the tool never returns `Err` for search failures
//!
//! Summaries are cached per (model, query) through [`intents_cache::CacheGateway`],
//! so repeated questions do not hit the API again.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use intents_cache::CacheGateway;
//! use intents_core::{GoogleSearchConfig, Tool};
//! use intents_web_tools::GoogleSearchTool;
//! use std::sync::Arc;
//!
//! let config = GoogleSearchConfig {
//!     api_key: Some("your-key".to_string()),
//!     ..GoogleSearchConfig::default()
//! };
//! let search: Arc<dyn Tool> = Arc::new(GoogleSearchTool::new(
//!     Arc::new(config),
//!     CacheGateway::in_memory(),
//! ));
//! ```

pub mod gemini;
mod google_search;
mod outcome;

pub use google_search::{
    CACHE_NAMESPACE, GoogleSearchTool, RESPONSE_INSTRUCTION, SearchReport, TOOL_NAME,
};
pub use outcome::{NO_INFORMATION, SearchError, SearchOutcome, SearchSummary, SourceCitation};
