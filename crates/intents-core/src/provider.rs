//! Configuration providers queried by tools at call time

use crate::config::{GoogleSearchConfig, IntentsConfig};
use serde::{Deserialize, Serialize};
use std::sync::RwLock;

/// Source of the current search settings.
///
/// Tools call this once per invocation, so implementations that change at
/// runtime take effect on the next call without restarting anything.
pub trait ConfigProvider: Send + Sync {
    fn search_config(&self) -> GoogleSearchConfig;
}

impl ConfigProvider for GoogleSearchConfig {
    fn search_config(&self) -> GoogleSearchConfig {
        self.clone()
    }
}

impl ConfigProvider for IntentsConfig {
    fn search_config(&self) -> GoogleSearchConfig {
        self.google_search.clone()
    }
}

/// User-adjustable options layered over the loaded configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchOptions {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub response_language: Option<String>,
}

/// Base settings merged with options that can be replaced while running.
///
/// Options win over the base wherever they are set.
#[derive(Debug)]
pub struct LiveConfig {
    base: GoogleSearchConfig,
    options: RwLock<SearchOptions>,
}

impl LiveConfig {
    pub fn new(base: GoogleSearchConfig) -> Self {
        Self {
            base,
            options: RwLock::new(SearchOptions::default()),
        }
    }

    /// Replace the current options
    pub fn set_options(&self, options: SearchOptions) {
        let mut current = self.options.write().unwrap_or_else(|e| e.into_inner());
        *current = options;
    }

    pub fn options(&self) -> SearchOptions {
        self.options
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl ConfigProvider for LiveConfig {
    fn search_config(&self) -> GoogleSearchConfig {
        let options = self.options();
        let mut merged = self.base.clone();

        if options.api_key.is_some() {
            merged.api_key = options.api_key;
        }
        if let Some(model) = options.model {
            merged.model = model;
        }
        if let Some(language) = options.response_language {
            merged.response_language = language;
        }

        merged
    }
}
