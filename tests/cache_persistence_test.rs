//! Cached results outliving the store instance that wrote them

use intents_cache::{CacheGateway, CacheStore, CallParameters, SqliteCacheStore};
use intents_core::{CacheConfig, GoogleSearchConfig};
use intents_web_tools::{CACHE_NAMESPACE, GoogleSearchTool};
use mockito::Server;
use serde_json::json;
use std::sync::Arc;

#[tokio::test]
async fn test_key_and_entry_stable_across_store_instances() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cache.db");

    let params = CallParameters::new()
        .with("query", "speed of light")
        .with("model", "gemini-2.0-flash-exp");
    let reordered = CallParameters::new()
        .with("model", "gemini-2.0-flash-exp")
        .with("query", "speed of light");

    let writer = SqliteCacheStore::open(&path).await.unwrap();
    let gateway = CacheGateway::new(Arc::new(writer.clone()));
    assert!(gateway.set(CACHE_NAMESPACE, &params, &json!({"answer_summary": "c"})).await);
    writer.close().await;

    let reader = SqliteCacheStore::open(&path).await.unwrap();
    let key = CacheGateway::key(CACHE_NAMESPACE, &reordered);
    assert_eq!(
        reader.get(&key).await.unwrap(),
        Some(json!({"answer_summary": "c"}))
    );
    reader.close().await;
}

#[tokio::test]
async fn test_restarted_tool_reuses_persisted_answer() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/gemini-test:generateContent")
        .with_status(200)
        .with_body(
            json!({
                "candidates": [{
                    "content": {"parts": [{"text": "299,792 km/s"}]},
                    "groundingMetadata": {"groundingAttributions": [
                        {"web": {"title": "Physics", "uri": "https://physics.example"}}
                    ]}
                }]
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let cache_config = CacheConfig {
        provider: "sqlite".to_string(),
        path: dir.path().join("cache.db").to_string_lossy().into_owned(),
    };
    let search_config = GoogleSearchConfig {
        api_key: Some("test-key".to_string()),
        model: "gemini-test".to_string(),
        base_url: server.url(),
        ..GoogleSearchConfig::default()
    };

    let first = GoogleSearchTool::new(
        Arc::new(search_config.clone()),
        CacheGateway::from_config(&cache_config).await.unwrap(),
    );
    let fresh = first.invoke("speed of light").await;
    drop(first);

    let second = GoogleSearchTool::new(
        Arc::new(search_config),
        CacheGateway::from_config(&cache_config).await.unwrap(),
    );
    let report = second.search("speed of light").await;

    assert!(report.cache_hit);
    assert_eq!(
        report.outcome.to_response(intents_web_tools::RESPONSE_INSTRUCTION),
        fresh
    );
    mock.assert_async().await;
}
