//! OHLCV row and response models.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Upstream provider that serves the price data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    #[default]
    Yahoo,
    Stooq,
}

impl Source {
    /// Returns the wire value used in the `source` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Yahoo => "yahoo",
            Source::Stooq => "stooq",
        }
    }

    /// Returns the display label.
    pub fn label(&self) -> &'static str {
        match self {
            Source::Yahoo => "Yahoo",
            Source::Stooq => "Stooq",
        }
    }

    /// Cycles to the next source.
    pub fn toggle(&mut self) {
        *self = match self {
            Source::Yahoo => Source::Stooq,
            Source::Stooq => Source::Yahoo,
        };
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One trading day for one symbol.
///
/// Price and volume fields are `None` when the upstream had no trade data
/// for the date, which is not the same as zero. Indicator fields are `None`
/// during their warm-up period (the first 19 rows have no `sma_20`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct OhlcvRow {
    /// Calendar date, `YYYY-MM-DD`.
    pub date: String,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<f64>,
    pub sma_20: Option<f64>,
    pub sma_50: Option<f64>,
    pub ema_12: Option<f64>,
    pub ema_26: Option<f64>,
    pub rsi: Option<f64>,
    pub returns: Option<f64>,
    pub volatility: Option<f64>,
    /// Columns the service sent that this model does not name, in wire order.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    /// Every key of the row object as sent, in wire order.
    ///
    /// Empty for rows built in code rather than decoded.
    #[serde(skip)]
    pub keys: Vec<String>,
}

/// Wire shape of a row, decoded after its key order has been recorded.
#[derive(Deserialize)]
struct WireRow {
    date: String,
    #[serde(default)]
    open: Option<f64>,
    #[serde(default)]
    high: Option<f64>,
    #[serde(default)]
    low: Option<f64>,
    #[serde(default)]
    close: Option<f64>,
    #[serde(default)]
    volume: Option<f64>,
    #[serde(default)]
    sma_20: Option<f64>,
    #[serde(default)]
    sma_50: Option<f64>,
    #[serde(default)]
    ema_12: Option<f64>,
    #[serde(default)]
    ema_26: Option<f64>,
    #[serde(default)]
    rsi: Option<f64>,
    #[serde(default)]
    returns: Option<f64>,
    #[serde(default)]
    volatility: Option<f64>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl TryFrom<Map<String, Value>> for OhlcvRow {
    type Error = serde_json::Error;

    fn try_from(object: Map<String, Value>) -> Result<Self, Self::Error> {
        let keys = object.keys().cloned().collect();
        let wire: WireRow = serde_json::from_value(Value::Object(object))?;
        Ok(Self {
            date: wire.date,
            open: wire.open,
            high: wire.high,
            low: wire.low,
            close: wire.close,
            volume: wire.volume,
            sma_20: wire.sma_20,
            sma_50: wire.sma_50,
            ema_12: wire.ema_12,
            ema_26: wire.ema_26,
            rsi: wire.rsi,
            returns: wire.returns,
            volatility: wire.volatility,
            extra: wire.extra,
            keys,
        })
    }
}

/// The result of one completed `GET /api/ohlcv` query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OhlcvResponse {
    /// Resolved symbol, uppercase by convention.
    pub ticker: String,
    /// Provider that served the rows.
    pub source: String,
    /// `(first_date, last_date)` of `rows`, or `None` when `rows` is empty.
    #[serde(rename = "dateRange")]
    pub date_range: Option<(String, String)>,
    pub rows: Vec<OhlcvRow>,
}

impl OhlcvResponse {
    /// Returns `true` when the query matched no trading days.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Error body returned by the data service on non-success statuses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub detail: Option<String>,
}

/// Body of `GET /api/health`.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    /// Returns `true` when the service reports itself healthy.
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}
