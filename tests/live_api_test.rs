//! Tests against a running NoKeyFinance data service.
//!
//! These tests need the service and network access to the upstream providers.
//! Run with: `NOKEYFINANCE_API_URL=http://127.0.0.1:8000 cargo test --features integration-tests`

#![cfg(feature = "integration-tests")]

mod common;

use nokeyfinance::models::Source;
use nokeyfinance::request::{LoadParams, RequestController};
use nokeyfinance::service::DataService;

fn api_url() -> String {
    std::env::var("NOKEYFINANCE_API_URL").unwrap_or_else(|_| "http://127.0.0.1:8000".to_string())
}

#[tokio::test]
async fn test_live_health() {
    let client = common::client_for(&api_url());
    assert!(client.health().await.expect("service unreachable"));
}

#[tokio::test]
async fn test_live_load_returns_sorted_rows() {
    let client = common::client_for(&api_url());
    let mut controller = RequestController::new();
    let params = LoadParams {
        symbol: "aapl".into(),
        source: Source::Yahoo,
        start: "2024-01-02".into(),
        end: "2024-02-01".into(),
        want_indicators: true,
    };

    controller.load(&client, &params).await;

    let response = controller.response().expect("load should succeed");
    assert_eq!(response.ticker, "AAPL");
    assert!(!response.rows.is_empty());
    assert!(response.rows.windows(2).all(|w| w[0].date < w[1].date));
}

#[tokio::test]
async fn test_live_unknown_ticker_has_message() {
    let client = common::client_for(&api_url());
    let mut controller = RequestController::new();
    let params = LoadParams {
        symbol: "NOSUCHTICKER123".into(),
        want_indicators: true,
        ..Default::default()
    };

    controller.load(&client, &params).await;

    assert!(!controller.error().expect("load should fail").is_empty());
}
