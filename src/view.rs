//! Presentation values derived from a successful response.
//!
//! A [`ViewModel`] borrows the response and is rebuilt on every render;
//! nothing here is cached or mutates the underlying rows.

use std::fmt;

use crate::models::{OhlcvResponse, OhlcvRow};
use crate::sanitize::sanitize_filename;

/// One exportable output of the dashboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// The raw rows as CSV.
    Table,
    Price,
    Volume,
    Rsi,
}

impl ArtifactKind {
    /// Chart panels that can be exported as images, in display order.
    pub const PANELS: [ArtifactKind; 3] =
        [ArtifactKind::Price, ArtifactKind::Volume, ArtifactKind::Rsi];

    /// Filename suffix; the tabular export has none.
    pub fn suffix(&self) -> Option<&'static str> {
        match self {
            ArtifactKind::Table => None,
            ArtifactKind::Price => Some("price"),
            ArtifactKind::Volume => Some("volume"),
            ArtifactKind::Rsi => Some("rsi"),
        }
    }

    /// File extension without the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            ArtifactKind::Table => "csv",
            _ => "png",
        }
    }

    /// Returns the display label.
    pub fn label(&self) -> &'static str {
        match self {
            ArtifactKind::Table => "CSV",
            ArtifactKind::Price => "Price",
            ArtifactKind::Volume => "Volume",
            ArtifactKind::Rsi => "RSI",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Colour class of a volume bar.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BarDirection {
    Up,
    Down,
}

impl BarDirection {
    /// Classifies one row.
    ///
    /// A row is `Up` only when both `open` and `close` are present and
    /// `close >= open`. Missing prices classify as `Down`.
    pub fn of(row: &OhlcvRow) -> Self {
        match (row.open, row.close) {
            (Some(open), Some(close)) if close >= open => BarDirection::Up,
            _ => BarDirection::Down,
        }
    }

    pub fn color(&self) -> Rgb {
        match self {
            BarDirection::Up => UP_COLOR,
            BarDirection::Down => DOWN_COLOR,
        }
    }
}

/// An RGB colour shared by the terminal panels and image exports.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// `#rrggbb` form.
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

pub const UP_COLOR: Rgb = Rgb(0x26, 0xa6, 0x9a);
pub const DOWN_COLOR: Rgb = Rgb(0xef, 0x53, 0x50);
pub const RSI_COLOR: Rgb = Rgb(0xa6, 0x6f, 0xcf);

/// Lower and upper RSI reference levels.
pub const RSI_LEVELS: [f64; 2] = [30.0, 70.0];

/// One line drawn on the price panel.
#[derive(Clone, Copy, Debug)]
pub struct PriceSeries {
    pub label: &'static str,
    pub color: Rgb,
    pub value: fn(&OhlcvRow) -> Option<f64>,
}

const CLOSE: PriceSeries = PriceSeries {
    label: "Close",
    color: Rgb(0xee, 0xee, 0xee),
    value: |r: &OhlcvRow| r.close,
};

const OVERLAYS: [PriceSeries; 4] = [
    PriceSeries {
        label: "SMA 20",
        color: Rgb(0x66, 0xaa, 0xff),
        value: |r: &OhlcvRow| r.sma_20,
    },
    PriceSeries {
        label: "SMA 50",
        color: Rgb(0xaa, 0x66, 0xff),
        value: |r: &OhlcvRow| r.sma_50,
    },
    PriceSeries {
        label: "EMA 12",
        color: Rgb(0x66, 0xff, 0x66),
        value: |r: &OhlcvRow| r.ema_12,
    },
    PriceSeries {
        label: "EMA 26",
        color: Rgb(0xff, 0xaa, 0x66),
        value: |r: &OhlcvRow| r.ema_26,
    },
];

/// Lines of the price panel: close, plus the moving averages when
/// indicators are shown.
pub fn price_series(show_indicators: bool) -> Vec<PriceSeries> {
    let mut series = vec![CLOSE];
    if show_indicators {
        series.extend(OVERLAYS);
    }
    series
}

/// Y range of the price panel: every plotted value, padded by 5%.
///
/// A flat series is padded by 1.0; no values at all gives `(0, 1)`.
pub fn price_range(rows: &[OhlcvRow], show_indicators: bool) -> (f64, f64) {
    let series = price_series(show_indicators);
    let (lo, hi) = rows
        .iter()
        .flat_map(|row| series.iter().filter_map(move |s| (s.value)(row)))
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if !lo.is_finite() {
        return (0.0, 1.0);
    }
    let pad = if hi > lo { (hi - lo) * 0.05 } else { 1.0 };
    (lo - pad, hi + pad)
}

/// Top of the volume axis: the largest volume, or 1.0 when there is none.
pub fn volume_ceiling(rows: &[OhlcvRow]) -> f64 {
    let max = rows.iter().filter_map(|r| r.volume).fold(0.0_f64, f64::max);
    if max > 0.0 {
        max
    } else {
        1.0
    }
}

/// Short volume label: `2.0B`, `1.5M`, `750.0K`, `320`.
pub fn compact_volume(value: f64) -> String {
    if value >= 1_000_000_000.0 {
        format!("{:.1}B", value / 1_000_000_000.0)
    } else if value >= 1_000_000.0 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if value >= 1_000.0 {
        format!("{:.1}K", value / 1_000.0)
    } else {
        format!("{value:.0}")
    }
}

/// Derived view of one [`OhlcvResponse`].
#[derive(Debug, Clone)]
pub struct ViewModel<'a> {
    response: &'a OhlcvResponse,
    export_ticker: String,
    export_source: String,
    date_suffix: String,
    has_rsi_panel: bool,
}

impl<'a> ViewModel<'a> {
    /// Derives the view of `response` under the current indicator toggle.
    pub fn derive(response: &'a OhlcvResponse, want_indicators: bool) -> Self {
        let date_suffix = match &response.date_range {
            Some((first, last)) => format!("_{first}_{last}"),
            None => String::new(),
        };
        let has_rsi_panel = want_indicators && response.rows.iter().any(|r| r.rsi.is_some());

        Self {
            response,
            export_ticker: sanitize_filename(&response.ticker),
            export_source: sanitize_filename(&response.source),
            date_suffix,
            has_rsi_panel,
        }
    }

    pub fn response(&self) -> &'a OhlcvResponse {
        self.response
    }

    pub fn rows(&self) -> &'a [OhlcvRow] {
        &self.response.rows
    }

    /// Sanitized ticker used in filenames.
    pub fn export_ticker(&self) -> &str {
        &self.export_ticker
    }

    /// Sanitized source used in filenames.
    pub fn export_source(&self) -> &str {
        &self.export_source
    }

    /// `_first_last` when a date range is present, otherwise empty.
    pub fn date_suffix(&self) -> &str {
        &self.date_suffix
    }

    /// Whether the RSI panel should be shown.
    pub fn has_rsi_panel(&self) -> bool {
        self.has_rsi_panel
    }

    /// Whether the tabular export is available.
    pub fn has_rows(&self) -> bool {
        !self.response.rows.is_empty()
    }

    /// Filename for an exported artifact.
    ///
    /// `AAPL_yahoo_2024-01-02_2024-01-04.csv` for the table,
    /// `AAPL_yahoo_2024-01-02_2024-01-04_price.png` for a panel.
    pub fn filename(&self, kind: ArtifactKind) -> String {
        let mut name = format!(
            "{}_{}{}",
            self.export_ticker, self.export_source, self.date_suffix
        );
        if let Some(suffix) = kind.suffix() {
            name.push('_');
            name.push_str(suffix);
        }
        name.push('.');
        name.push_str(kind.extension());
        name
    }

    /// Volume bar classification, one entry per row.
    pub fn bar_directions(&self) -> Vec<BarDirection> {
        self.response.rows.iter().map(BarDirection::of).collect()
    }

    /// Result header, e.g. `AAPL (yahoo)`.
    pub fn title(&self) -> String {
        format!("{} ({})", self.response.ticker, self.response.source)
    }

    /// Date range label, e.g. `2024-01-02 – 2024-01-04`.
    pub fn range_label(&self) -> Option<String> {
        self.response
            .date_range
            .as_ref()
            .map(|(first, last)| format!("{first} – {last}"))
    }
}
