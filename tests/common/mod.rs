#![allow(dead_code)]

use cielo_transfer::config::{Config, RetryConfig};
use serde_json::{Value, json};
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub fn test_config(server: &MockServer, dir: &TempDir) -> Config {
    let mut config = Config::new(server.uri(), "Imported");
    config.cache_path = dir.path().join("cache.json");
    config.retry = RetryConfig {
        max_attempts: 3,
        base_delay_ms: 1,
        max_delay: Duration::from_millis(20),
    };
    config.request_timeout = Duration::from_secs(5);
    config
}

pub fn page_body(wallets: &[&str], next_object: Option<u64>) -> Value {
    let tracked: Vec<Value> = wallets
        .iter()
        .map(|w| json!({ "wallet": w, "label": format!("label-{w}") }))
        .collect();
    json!({
        "status": "ok",
        "data": {
            "tracked_wallets": tracked,
            "paging": { "next_object": next_object }
        }
    })
}

/// Serves `pages` for `api_key` at cursors 1..=n, then an empty page at n+1.
/// Every page is expected to be requested exactly once.
pub async fn mount_wallet_pages(server: &MockServer, api_key: &str, pages: &[&[&str]]) {
    for (i, wallets) in pages.iter().enumerate() {
        let cursor = i as u64 + 1;
        Mock::given(method("GET"))
            .and(path("/tracked-wallets"))
            .and(header("X-Api-Key", api_key))
            .and(query_param("next_object", cursor.to_string()))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_body(wallets, Some(cursor + 1))))
            .expect(1)
            .mount(server)
            .await;
    }

    let last = pages.len() as u64 + 1;
    Mock::given(method("GET"))
        .and(path("/tracked-wallets"))
        .and(header("X-Api-Key", api_key))
        .and(query_param("next_object", last.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(&[], None)))
        .expect(1)
        .mount(server)
        .await;
}

pub fn created(id: u64) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "status": "ok", "data": { "id": id } }))
}

pub fn strings(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|s| s.to_string()).collect()
}
