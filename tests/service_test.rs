//! HTTP data service tests against a canned local server.

mod common;

use nokeyfinance::NokeyError;
use nokeyfinance::models::Source;
use nokeyfinance::service::{DataService, OhlcvQuery};

use common::{CannedServer, Route};

fn query(ticker: &str) -> OhlcvQuery {
    OhlcvQuery {
        ticker: ticker.to_string(),
        source: Source::Yahoo,
        show_indicators: true,
        start: None,
        end: None,
    }
}

#[tokio::test]
async fn test_fetch_decodes_rows_and_sends_query() {
    let server = CannedServer::start(vec![Route::new("/api/ohlcv", 200, common::THREE_ROWS)]).await;
    let mut q = query("AAPL");
    q.start = Some("2024-01-02".into());

    let response = server.client().fetch_ohlcv(&q).await.unwrap();

    assert_eq!(response.ticker, "AAPL");
    assert_eq!(response.rows.len(), 3);
    assert_eq!(response.rows[2].rsi, Some(41.2));
    assert_eq!(response.rows[0].sma_20, None);

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0],
        "/api/ohlcv?ticker=AAPL&source=yahoo&show_indicators=true&start=2024-01-02"
    );
}

#[tokio::test]
async fn test_error_detail_becomes_message() {
    let server =
        CannedServer::start(vec![Route::new("/api/ohlcv", 404, common::UNKNOWN_TICKER)]).await;

    let err = server.client().fetch_ohlcv(&query("XYZ")).await.unwrap_err();

    match err {
        NokeyError::Api { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "Unknown ticker XYZ");
        }
        other => panic!("expected an API error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_non_json_error_uses_status_text() {
    let server =
        CannedServer::start(vec![Route::new("/api/ohlcv", 502, "<html>upstream</html>")]).await;

    let err = server.client().fetch_ohlcv(&query("AAPL")).await.unwrap_err();

    assert_eq!(err.to_string(), "Bad Gateway");
}

#[tokio::test]
async fn test_unordered_rows_are_rejected() {
    let server = CannedServer::start(vec![Route::new("/api/ohlcv", 200, common::UNORDERED)]).await;

    let err = server.client().fetch_ohlcv(&query("AAPL")).await.unwrap_err();

    assert!(matches!(err, NokeyError::InvalidResponse(_)));
    assert!(err.to_string().starts_with("invalid response: "));
}

#[tokio::test]
async fn test_wrong_shape_is_a_decode_error() {
    let server =
        CannedServer::start(vec![Route::new("/api/ohlcv", 200, r#"{"rows":"nope"}"#)]).await;

    let err = server.client().fetch_ohlcv(&query("AAPL")).await.unwrap_err();

    assert!(matches!(err, NokeyError::Http(_)));
}

#[tokio::test]
async fn test_health_reports_ok() {
    let server =
        CannedServer::start(vec![Route::new("/api/health", 200, r#"{"status":"ok"}"#)]).await;
    assert!(server.client().health().await.unwrap());
}

#[tokio::test]
async fn test_health_reports_unhealthy_status() {
    let server = CannedServer::start(vec![Route::new("/api/health", 500, "{}")]).await;
    assert!(!server.client().health().await.unwrap());
}

#[tokio::test]
async fn test_unreachable_service_is_transport_error() {
    let client = common::client_for(&common::closed_url().await);

    let err = client.fetch_ohlcv(&query("AAPL")).await.unwrap_err();

    assert!(matches!(err, NokeyError::Http(_)));
    assert!(!err.to_string().is_empty());
    assert!(client.health().await.is_err());
}
