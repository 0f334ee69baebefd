//! Core traits and types for the intents tools
//!
//! This crate provides the tool abstraction, the shared error type and
//! configuration loading used by the other crates in the workspace.

pub mod config;
pub mod context;
pub mod error;
pub mod provider;
pub mod traits;

// Re-exports
pub use config::{CacheConfig, GoogleSearchConfig, IntentsConfig, LogFormat, ObservabilityConfig};
pub use context::{DefaultToolContext, ToolContext};
pub use error::{Error, Result};
pub use provider::{ConfigProvider, LiveConfig, SearchOptions};
pub use traits::{Tool, ToolResponse};
