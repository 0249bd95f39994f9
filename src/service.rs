//! Client for the OHLCV data service.
//!
//! [`DataService`] is the seam between the dashboard and the remote
//! service; [`HttpDataService`] is the production implementation over
//! `reqwest`. Tests substitute their own implementation.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

use crate::config::ApiConfig;
use crate::models::{ApiErrorBody, HealthResponse, OhlcvResponse, Source, validate_response};
use crate::{NokeyError, Result};

/// Query contract for `GET /api/ohlcv`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OhlcvQuery {
    pub ticker: String,
    pub source: Source,
    pub show_indicators: bool,
    /// Passed through unvalidated; the service owns date validation.
    pub start: Option<String>,
    pub end: Option<String>,
}

impl OhlcvQuery {
    /// Returns the query string pairs in wire order.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("ticker", self.ticker.clone()),
            ("source", self.source.as_str().to_string()),
            ("show_indicators", self.show_indicators.to_string()),
        ];
        if let Some(start) = &self.start {
            pairs.push(("start", start.clone()));
        }
        if let Some(end) = &self.end {
            pairs.push(("end", end.clone()));
        }
        pairs
    }
}

/// Source of OHLCV responses.
#[async_trait]
pub trait DataService: Send + Sync {
    /// Fetches one OHLCV response.
    ///
    /// # Errors
    ///
    /// Returns [`NokeyError::Api`] for non-success statuses,
    /// [`NokeyError::Http`] for transport failures, and
    /// [`NokeyError::InvalidResponse`] when the body breaks the data contract.
    async fn fetch_ohlcv(&self, query: &OhlcvQuery) -> Result<OhlcvResponse>;

    /// Checks whether the service is reachable and healthy.
    async fn health(&self) -> Result<bool>;
}

/// [`DataService`] backed by HTTP.
#[derive(Debug, Clone)]
pub struct HttpDataService {
    client: Client,
    base_url: String,
}

impl HttpDataService {
    /// Builds a client for the configured service.
    ///
    /// # Errors
    ///
    /// Returns [`NokeyError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

#[async_trait]
impl DataService for HttpDataService {
    async fn fetch_ohlcv(&self, query: &OhlcvQuery) -> Result<OhlcvResponse> {
        let response = self
            .client
            .get(self.url("/api/ohlcv"))
            .query(&query.to_pairs())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            let message = error_message(status, &body);
            warn!(status = status.as_u16(), %message, "data service rejected request");
            return Err(NokeyError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: OhlcvResponse = response.json().await?;
        validate_response(&body)?;
        debug!(ticker = %body.ticker, rows = body.rows.len(), "decoded OHLCV response");
        Ok(body)
    }

    async fn health(&self) -> Result<bool> {
        let response = self.client.get(self.url("/api/health")).send().await?;
        if !response.status().is_success() {
            return Ok(false);
        }
        let body: HealthResponse = response.json().await?;
        Ok(body.is_ok())
    }
}

/// Picks the user-facing message for a failed request.
///
/// Uses the `detail` field of a JSON error body when present and
/// non-empty, otherwise the status reason phrase.
pub fn error_message(status: StatusCode, body: &[u8]) -> String {
    serde_json::from_slice::<ApiErrorBody>(body)
        .ok()
        .and_then(|b| b.detail)
        .filter(|detail| !detail.is_empty())
        .unwrap_or_else(|| status_text(status))
}

fn status_text(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| status.as_str().to_string())
}
