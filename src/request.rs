//! Request lifecycle for OHLCV loads.
//!
//! [`RequestController`] owns the single visible [`RequestState`]. Each
//! load is tagged with a monotonically increasing [`RequestId`]; a
//! completion is applied only when its id is the latest one issued, so a
//! slow earlier response can never overwrite a later one. In-flight calls
//! are not cancelled, their results are simply discarded.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::NokeyError;
use crate::models::{OhlcvResponse, Source};
use crate::service::{DataService, OhlcvQuery};

/// Symbol used when the input is blank.
pub const DEFAULT_SYMBOL: &str = "AAPL";

/// Message shown when a failure carries no text of its own.
const GENERIC_FAILURE: &str = "Request failed";

/// User input for one load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadParams {
    pub symbol: String,
    pub source: Source,
    pub start: String,
    pub end: String,
    pub want_indicators: bool,
}

impl LoadParams {
    /// Builds the service query.
    ///
    /// The symbol is trimmed and uppercased, falling back to
    /// [`DEFAULT_SYMBOL`] when blank. Empty dates are omitted; any other
    /// date text, whitespace included, is passed through unchanged.
    pub fn to_query(&self) -> OhlcvQuery {
        let symbol = self.symbol.trim().to_uppercase();
        OhlcvQuery {
            ticker: if symbol.is_empty() {
                DEFAULT_SYMBOL.to_string()
            } else {
                symbol
            },
            source: self.source,
            show_indicators: self.want_indicators,
            start: non_empty(&self.start),
            end: non_empty(&self.end),
        }
    }
}

fn non_empty(raw: &str) -> Option<String> {
    if raw.is_empty() {
        None
    } else {
        Some(raw.to_string())
    }
}

/// Sequence number of one load.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(u64);

impl RequestId {
    /// Returns the raw sequence number.
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Visible state of the most recent load.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestState {
    #[default]
    Idle,
    Loading,
    Success(Arc<OhlcvResponse>),
    Error(String),
}

impl RequestState {
    /// Short label for status displays.
    pub fn label(&self) -> &'static str {
        match self {
            RequestState::Idle => "idle",
            RequestState::Loading => "loading",
            RequestState::Success(_) => "success",
            RequestState::Error(_) => "error",
        }
    }
}

/// A load that has been issued but not yet completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingLoad {
    pub id: RequestId,
    pub query: OhlcvQuery,
}

/// Owns the request lifecycle: `Idle → Loading → {Success, Error}`.
#[derive(Debug, Default)]
pub struct RequestController {
    state: RequestState,
    latest: RequestId,
}

impl RequestController {
    /// Creates a controller in the `Idle` state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current state.
    pub fn state(&self) -> &RequestState {
        &self.state
    }

    /// Returns `true` while the latest load is in flight.
    pub fn is_loading(&self) -> bool {
        matches!(self.state, RequestState::Loading)
    }

    /// Returns the successful response, if any.
    pub fn response(&self) -> Option<&Arc<OhlcvResponse>> {
        match &self.state {
            RequestState::Success(response) => Some(response),
            _ => None,
        }
    }

    /// Returns the error message, if any.
    pub fn error(&self) -> Option<&str> {
        match &self.state {
            RequestState::Error(message) => Some(message),
            _ => None,
        }
    }

    /// Returns the id of the most recently issued load.
    pub fn latest(&self) -> RequestId {
        self.latest
    }

    /// Starts a new load, unconditionally entering `Loading`.
    ///
    /// Any previous data or error is dropped from the visible state.
    pub fn begin(&mut self, params: &LoadParams) -> PendingLoad {
        self.latest = RequestId(self.latest.0 + 1);
        self.state = RequestState::Loading;
        let query = params.to_query();
        info!(
            request = self.latest.0,
            ticker = %query.ticker,
            source = %query.source,
            "loading OHLCV"
        );
        PendingLoad {
            id: self.latest,
            query,
        }
    }

    /// Applies the outcome of load `id`.
    ///
    /// Returns `false` (and leaves the state untouched) when `id` is not
    /// the latest issued load.
    pub fn complete(
        &mut self,
        id: RequestId,
        result: std::result::Result<OhlcvResponse, NokeyError>,
    ) -> bool {
        if id != self.latest {
            debug!(
                request = id.0,
                latest = self.latest.0,
                "discarding stale response"
            );
            return false;
        }

        self.state = match result {
            Ok(response) => {
                info!(
                    request = id.0,
                    ticker = %response.ticker,
                    rows = response.rows.len(),
                    "load succeeded"
                );
                RequestState::Success(Arc::new(response))
            }
            Err(err) => {
                let message = failure_message(&err);
                warn!(request = id.0, %message, "load failed");
                RequestState::Error(message)
            }
        };
        true
    }

    /// Issues a load against `service` and waits for it to complete.
    pub async fn load(&mut self, service: &dyn DataService, params: &LoadParams) -> &RequestState {
        let pending = self.begin(params);
        let result = service.fetch_ohlcv(&pending.query).await;
        self.complete(pending.id, result);
        &self.state
    }
}

/// Turns a failed load into the single message the dashboard shows.
pub fn failure_message(err: &NokeyError) -> String {
    let text = match err {
        NokeyError::Api { message, .. } => message.clone(),
        other => other.to_string(),
    };
    if text.trim().is_empty() {
        GENERIC_FAILURE.to_string()
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(symbol: &str) -> LoadParams {
        LoadParams {
            symbol: symbol.to_string(),
            want_indicators: true,
            ..Default::default()
        }
    }

    fn response(ticker: &str) -> OhlcvResponse {
        OhlcvResponse {
            ticker: ticker.into(),
            source: "yahoo".into(),
            date_range: None,
            rows: Vec::new(),
        }
    }

    #[test]
    fn symbol_is_normalized_and_defaulted() {
        assert_eq!(params("  aapl ").to_query().ticker, "AAPL");
        assert_eq!(params("").to_query().ticker, DEFAULT_SYMBOL);
        assert_eq!(params("   ").to_query().ticker, DEFAULT_SYMBOL);
    }

    #[test]
    fn empty_dates_are_omitted() {
        let mut p = params("msft");
        p.end = "2024-03-01".into();
        let query = p.to_query();
        assert_eq!(query.start, None);
        assert_eq!(query.end.as_deref(), Some("2024-03-01"));
    }

    #[test]
    fn whitespace_dates_are_passed_through() {
        let mut p = params("msft");
        p.start = " ".into();
        p.end = " 2024-03-01".into();
        let query = p.to_query();
        assert_eq!(query.start.as_deref(), Some(" "));
        assert_eq!(query.end.as_deref(), Some(" 2024-03-01"));
    }

    #[test]
    fn begin_clears_previous_result() {
        let mut controller = RequestController::new();
        assert_eq!(controller.state(), &RequestState::Idle);

        let first = controller.begin(&params("aapl"));
        controller.complete(first.id, Err(NokeyError::InvalidResponse("x".into())));
        assert!(controller.error().is_some());

        controller.begin(&params("aapl"));
        assert!(controller.is_loading());
        assert!(controller.error().is_none());
        assert!(controller.response().is_none());
    }

    #[test]
    fn ids_are_monotonic() {
        let mut controller = RequestController::new();
        let a = controller.begin(&params("a")).id;
        let b = controller.begin(&params("b")).id;
        assert!(b > a);
        assert_eq!(controller.latest(), b);
    }

    #[test]
    fn stale_completion_is_discarded() {
        let mut controller = RequestController::new();
        let early = controller.begin(&params("early"));
        let late = controller.begin(&params("late"));

        assert!(controller.complete(late.id, Ok(response("LATE"))));
        assert!(!controller.complete(early.id, Ok(response("EARLY"))));
        assert_eq!(controller.response().unwrap().ticker, "LATE");
    }

    #[test]
    fn stale_completion_cannot_end_loading() {
        let mut controller = RequestController::new();
        let early = controller.begin(&params("early"));
        controller.begin(&params("late"));

        assert!(!controller.complete(early.id, Err(NokeyError::Config("boom".into()))));
        assert!(controller.is_loading());
    }

    #[test]
    fn api_error_uses_message_verbatim() {
        let err = NokeyError::Api {
            status: 404,
            message: "Unknown ticker XYZ".into(),
        };
        assert_eq!(failure_message(&err), "Unknown ticker XYZ");
    }

    #[test]
    fn empty_error_text_uses_generic_message() {
        let err = NokeyError::Api {
            status: 500,
            message: String::new(),
        };
        assert_eq!(failure_message(&err), "Request failed");
    }

    struct Fixed(fn() -> crate::Result<OhlcvResponse>);

    #[async_trait::async_trait]
    impl DataService for Fixed {
        async fn fetch_ohlcv(&self, _query: &OhlcvQuery) -> crate::Result<OhlcvResponse> {
            (self.0)()
        }

        async fn health(&self) -> crate::Result<bool> {
            Ok(true)
        }
    }

    #[test]
    fn load_ends_in_success() {
        let mut controller = RequestController::new();
        let service = Fixed(|| Ok(response("AAPL")));
        let state = tokio_test::block_on(controller.load(&service, &params("aapl")));
        assert!(matches!(state, RequestState::Success(r) if r.ticker == "AAPL"));
    }

    #[test]
    fn load_ends_in_error() {
        let mut controller = RequestController::new();
        let service = Fixed(|| Err(NokeyError::InvalidResponse("rows out of order".into())));
        let state = tokio_test::block_on(controller.load(&service, &params("aapl")));
        assert_eq!(
            state,
            &RequestState::Error("invalid response: rows out of order".into())
        );
    }

    #[test]
    fn state_labels() {
        assert_eq!(RequestState::Idle.label(), "idle");
        assert_eq!(RequestState::Loading.label(), "loading");
        assert_eq!(RequestState::Error("x".into()).label(), "error");
    }
}
