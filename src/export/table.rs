//! CSV serialization of row records.
//!
//! The header is the first record's column names in that record's own
//! order; for decoded rows that is the key order the service sent.
//! Values are written unquoted: an embedded comma or quote is not escaped.

use std::path::PathBuf;

use serde_json::Value;

use crate::Result;
use crate::export::DownloadSink;
use crate::models::OhlcvRow;

/// A record that can be laid out as one CSV line.
pub trait TableRecord {
    /// Column names paired with their rendered values, in column order.
    ///
    /// `None` marks a missing value and is written as an empty cell.
    fn columns(&self) -> Vec<(String, Option<String>)>;
}

impl TableRecord for OhlcvRow {
    /// The row's own keys in wire order. Rows built in code have no
    /// recorded keys and list the named fields followed by `extra`.
    fn columns(&self) -> Vec<(String, Option<String>)> {
        if self.keys.is_empty() {
            let named = NAMED.iter().map(|name| name.to_string());
            return named
                .chain(self.extra.keys().cloned())
                .map(|name| {
                    let value = self.cell(&name);
                    (name, value)
                })
                .collect();
        }
        self.keys
            .iter()
            .map(|name| (name.clone(), self.cell(name)))
            .collect()
    }
}

/// Columns `OhlcvRow` models as fields, in contract order.
const NAMED: [&str; 13] = [
    "date",
    "open",
    "high",
    "low",
    "close",
    "volume",
    "sma_20",
    "sma_50",
    "ema_12",
    "ema_26",
    "rsi",
    "returns",
    "volatility",
];

impl OhlcvRow {
    /// Rendered value of column `name`, `None` when null or absent.
    fn cell(&self, name: &str) -> Option<String> {
        let number = match name {
            "date" => return Some(self.date.clone()),
            "open" => self.open,
            "high" => self.high,
            "low" => self.low,
            "close" => self.close,
            "volume" => self.volume,
            "sma_20" => self.sma_20,
            "sma_50" => self.sma_50,
            "ema_12" => self.ema_12,
            "ema_26" => self.ema_26,
            "rsi" => self.rsi,
            "returns" => self.returns,
            "volatility" => self.volatility,
            other => return self.extra.get(other).and_then(json_cell),
        };
        number.map(|v| v.to_string())
    }
}

fn json_cell(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Serializes `records` to CSV text, or `None` when there are none.
///
/// Each line looks values up by the header's column names, so a column
/// missing from a later record renders empty and a column the first
/// record lacks is dropped.
pub fn build_csv<R: TableRecord>(records: &[R]) -> Option<String> {
    let first = records.first()?;
    let header: Vec<String> = first.columns().into_iter().map(|(name, _)| name).collect();

    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(header.join(","));
    for record in records {
        let cols = record.columns();
        let line: Vec<&str> = header
            .iter()
            .map(|name| {
                cols.iter()
                    .find(|(col, _)| col == name)
                    .and_then(|(_, value)| value.as_deref())
                    .unwrap_or("")
            })
            .collect();
        lines.push(line.join(","));
    }
    Some(lines.join("\n"))
}

/// Serializes `records` and saves them as `filename`.
///
/// Returns `Ok(None)` without touching the sink when `records` is empty.
///
/// # Errors
///
/// Propagates the sink's error.
pub fn export_table<R: TableRecord>(
    records: &[R],
    filename: &str,
    sink: &dyn DownloadSink,
) -> Result<Option<PathBuf>> {
    match build_csv(records) {
        Some(csv) => sink.save(filename, csv.as_bytes()).map(Some),
        None => Ok(None),
    }
}
