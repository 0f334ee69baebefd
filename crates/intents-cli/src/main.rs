//! Command-line host for the intents tools
//!
//! ```bash
//! intents search "next total solar eclipse in Europe"
//! intents --config ./config.toml search "ECB interest rate" --model gemini-2.5-flash
//! intents key "ECB interest rate"
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use intents_cache::{CacheGateway, CallParameters};
use intents_core::{ConfigProvider, DefaultToolContext, IntentsConfig, LiveConfig, SearchOptions, Tool};
use intents_web_tools::{CACHE_NAMESPACE, GoogleSearchTool};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Parser)]
#[command(name = "intents", version, about = "Grounded web search for LLM agents")]
struct Cli {
    /// Path to config.toml (defaults to searching the current directory and parents)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run one search and print the tool result as JSON
    Search {
        query: String,

        /// Override the configured model
        #[arg(long)]
        model: Option<String>,

        /// Use a throwaway in-memory cache instead of the configured store
        #[arg(long)]
        no_cache: bool,
    },
    /// Print the cache key a search would use
    Key {
        query: String,

        #[arg(long)]
        model: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = match cli.config.as_deref() {
        Some(path) => IntentsConfig::load_from(Some(path))?,
        None => IntentsConfig::load_or_default()?,
    };

    intents_telemetry::init_telemetry(&config.observability);

    match cli.command {
        Command::Search {
            query,
            model,
            no_cache,
        } => {
            let result = search(&config, &query, model, no_cache).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);

            if result.get("error").is_some() {
                std::process::exit(1);
            }
        }
        Command::Key { query, model } => {
            let model = model.unwrap_or_else(|| config.google_search.model.clone());
            println!("{}", cache_key(&model, &query));
        }
    }

    Ok(())
}

async fn search(
    config: &IntentsConfig,
    query: &str,
    model: Option<String>,
    no_cache: bool,
) -> Result<serde_json::Value> {
    let cache = if no_cache {
        CacheGateway::in_memory()
    } else {
        CacheGateway::from_config(&config.cache)
            .await
            .context("Failed to open result cache")?
    };

    let live = Arc::new(LiveConfig::new(config.search_config()));
    live.set_options(SearchOptions {
        model,
        ..SearchOptions::default()
    });

    let tool = GoogleSearchTool::new(live, cache);
    let invocation_id = uuid::Uuid::new_v4().to_string();
    let ctx = Arc::new(DefaultToolContext::new(
        format!("{}-call", invocation_id),
        invocation_id,
    ));

    tracing::debug!(tool = tool.name(), "Executing tool from command line");
    let response = tool
        .execute(ctx, serde_json::json!({ "query": query }))
        .await?;

    Ok(response.result)
}

fn cache_key(model: &str, query: &str) -> String {
    let params = CallParameters::new().with("model", model).with("query", query);
    CacheGateway::key(CACHE_NAMESPACE, &params).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search() {
        let cli = Cli::try_parse_from([
            "intents",
            "--config",
            "custom.toml",
            "search",
            "weather in Bergen",
            "--no-cache",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
        match cli.command {
            Command::Search {
                query,
                model,
                no_cache,
            } => {
                assert_eq!(query, "weather in Bergen");
                assert!(model.is_none());
                assert!(no_cache);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_search_requires_query() {
        assert!(Cli::try_parse_from(["intents", "search"]).is_err());
    }

    #[test]
    fn test_cache_key_matches_tool_parameters() {
        let params = CallParameters::new().with("query", "q").with("model", "m");
        assert_eq!(
            cache_key("m", "q"),
            CacheGateway::key(CACHE_NAMESPACE, &params).to_string()
        );
    }

    #[tokio::test]
    async fn test_search_without_key_reports_error() {
        let mut config = IntentsConfig::test_defaults();
        config.google_search.api_key = None;

        let result = search(&config, "anything", None, true).await.unwrap();
        assert_eq!(
            result,
            serde_json::json!({"error": "Google Search API key not configured"})
        );
    }
}
