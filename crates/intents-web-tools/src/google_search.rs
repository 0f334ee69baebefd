//! Grounded Google Search tool
//!
//! Sends the query to Gemini with the built-in Google Search tool enabled and
//! returns the model's summary with up to three cited sources. Results are
//! cached per (model, query).

use crate::gemini::{self, GroundedSearchRequest};
use crate::outcome::{SearchError, SearchOutcome, SearchSummary};
use async_trait::async_trait;
use intents_cache::{CacheGateway, CallParameters};
use intents_core::{
    ConfigProvider, GoogleSearchConfig, Result as IntentsResult, Tool, ToolContext, ToolResponse,
};
use intents_telemetry::{ToolSpanAttributes, safe_serialize, trace_tool_call};
use reqwest::Client;
use serde_json::{Value, json};
use std::sync::Arc;

/// Default tool name, also the cache namespace
pub const TOOL_NAME: &str = "search_web_google";

/// Cache namespace for search results
pub const CACHE_NAMESPACE: &str = "search_web_google";

const DEFAULT_DESCRIPTION: &str = "Search the web for up-to-date information about the world, \
    news, or facts not present in your knowledge base.";

/// Guidance attached to every non-error result. Never cached, so edits here
/// apply to cached answers too.
pub const RESPONSE_INSTRUCTION: &str = "\
Use the search results together with the current date from the system prompt. \
If the user asked \"in how many days/months\", compute the difference yourself from today's date.

YOUR TASK:
Answer in lively, natural language (commentary is allowed), but with surgical precision about the facts.

STRICT RULES FOR FACTS:
1. KEEP LOCATIONS APART: if the text mentions several places, list each one SEPARATELY. \
Never merge their data: do not write \"there were tremors of up to 5.0 in A and B\" when 5.0 was recorded only in B. \
Correct: \"A had 4.2, while B had up to 5.0\".
2. NO BORROWED NUMBERS: never attribute a magnitude, figure or date of one event to another. \
Check every number against the place it belongs to in the source.
3. GEOGRAPHY: do not rename places. If the source says \"South Atlantic\", do not write \"America\".

In short: speak well, but keep numbers and places strictly in their own boxes.";

/// Result of one invocation plus how it was produced
#[derive(Debug, Clone, PartialEq)]
pub struct SearchReport {
    pub outcome: SearchOutcome,
    pub cache_hit: bool,
    pub model: String,
}

/// Google Search via Gemini grounding, with a result cache.
///
/// Configuration is read from the [`ConfigProvider`] on every call, so key or
/// model changes apply to the next invocation.
///
/// ## Example
///
/// ```rust,no_run
/// use intents_cache::CacheGateway;
/// use intents_core::IntentsConfig;
/// use intents_web_tools::GoogleSearchTool;
/// use std::sync::Arc;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = IntentsConfig::load()?;
/// let cache = CacheGateway::from_config(&config.cache).await?;
/// let search = GoogleSearchTool::new(Arc::new(config), cache);
///
/// let result = search.invoke("Who won the last Tour de France?").await;
/// println!("{}", result);
/// # Ok(())
/// # }
/// ```
pub struct GoogleSearchTool {
    name: String,
    description: String,
    client: Client,
    cache: CacheGateway,
    config: Arc<dyn ConfigProvider>,
}

impl GoogleSearchTool {
    /// Create a new search tool
    pub fn new(config: Arc<dyn ConfigProvider>, cache: CacheGateway) -> Self {
        Self {
            name: TOOL_NAME.to_string(),
            description: DEFAULT_DESCRIPTION.to_string(),
            client: Client::new(),
            cache,
            config,
        }
    }

    /// Override the advertised name and description
    pub fn with_identity(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.name = name.into();
        self.description = description.into();
        self
    }

    /// Use a preconfigured HTTP client (proxies, custom TLS)
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// Run one search and render the agent-facing JSON
    pub async fn invoke(&self, query: &str) -> Value {
        self.search(query).await.outcome.to_response(RESPONSE_INSTRUCTION)
    }

    /// Run one search. Never fails: every path ends in a [`SearchOutcome`].
    pub async fn search(&self, query: &str) -> SearchReport {
        let config = self.config.search_config();
        let model = config.model.clone();

        let Some(api_key) = config.api_key() else {
            tracing::error!("Google Search API key not configured");
            return SearchReport {
                outcome: SearchError::MissingApiKey.into(),
                cache_hit: false,
                model,
            };
        };

        tracing::info!(query, model = %model, "Google Search requested");

        let params = CallParameters::new()
            .with("model", model.as_str())
            .with("query", query);

        if let Some(cached) = self.cache.get(CACHE_NAMESPACE, &params).await {
            match serde_json::from_value::<SearchSummary>(cached) {
                Ok(summary) => {
                    tracing::debug!(query, "Serving Google Search result from cache");
                    return SearchReport {
                        outcome: SearchOutcome::Summary(summary),
                        cache_hit: true,
                        model,
                    };
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Ignoring unreadable cache entry");
                }
            }
        }

        let outcome = match self.fetch(query, api_key, &config).await {
            Ok(Some(summary)) => {
                match serde_json::to_value(&summary) {
                    Ok(value) => {
                        self.cache.set(CACHE_NAMESPACE, &params, &value).await;
                    }
                    Err(e) => tracing::warn!(error = %e, "Could not serialize result for cache"),
                }
                SearchOutcome::Summary(summary)
            }
            Ok(None) => {
                tracing::info!(query, "Google Search returned no information");
                SearchOutcome::NoResults
            }
            Err(e) => {
                tracing::error!(error = %e, "Error performing Google Search");
                e.into()
            }
        };

        SearchReport {
            outcome,
            cache_hit: false,
            model,
        }
    }

    /// One non-streaming request. `Ok(None)` means nothing usable came back.
    async fn fetch(
        &self,
        query: &str,
        api_key: &str,
        config: &GoogleSearchConfig,
    ) -> Result<Option<SearchSummary>, SearchError> {
        let url = format!(
            "{}/{}:generateContent",
            config.base_url.trim_end_matches('/'),
            config.model
        );
        let body = GroundedSearchRequest::new(query, &config.response_language);

        let response = self
            .client
            .post(&url)
            .query(&[("key", api_key)])
            .timeout(config.timeout())
            .json(&body)
            .send()
            .await
            .map_err(|e| SearchError::from_reqwest(e, config.timeout_secs))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), body = %text, "Gemini API error");
            return Err(SearchError::Status(status.as_u16()));
        }

        let text = response
            .text()
            .await
            .map_err(|e| SearchError::from_reqwest(e, config.timeout_secs))?;
        let data: Value = serde_json::from_str(&text)?;

        Ok(gemini::parse_response(&data).and_then(|candidate| candidate.into_summary()))
    }
}

#[async_trait]
impl Tool for GoogleSearchTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query"
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(
        &self,
        ctx: Arc<dyn ToolContext>,
        params: Value,
    ) -> IntentsResult<ToolResponse> {
        let report = match params.get("query").and_then(Value::as_str) {
            Some(query) => self.search(query).await,
            None => SearchReport {
                outcome: SearchOutcome::Error("Missing 'query' parameter".to_string()),
                cache_hit: false,
                model: self.config.search_config().model,
            },
        };

        let result = report.outcome.to_response(RESPONSE_INSTRUCTION);

        trace_tool_call(ToolSpanAttributes {
            tool_name: self.name.clone(),
            tool_description: self.description.clone(),
            tool_call_id: ctx.function_call_id().to_string(),
            invocation_id: ctx.invocation_id().to_string(),
            model: report.model,
            args_json: safe_serialize(&params),
            response_json: safe_serialize(&result),
            cache_hit: report.cache_hit,
            outcome: report.outcome.kind(),
        });

        Ok(ToolResponse { result })
    }
}
