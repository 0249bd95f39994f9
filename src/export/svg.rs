//! SVG rendering of a single chart panel.
//!
//! A [`ChartRegion`] is the image-export counterpart of an on-screen
//! panel: the same rows, series and colours, laid out as SVG so a
//! [`Rasterizer`](super::Rasterizer) can turn it into a PNG.

use crate::models::OhlcvRow;
use crate::view::{
    ArtifactKind, BarDirection, RSI_COLOR, RSI_LEVELS, Rgb, ViewModel, compact_volume,
    price_range, price_series, volume_ceiling,
};

const WIDTH: f64 = 960.0;
const BACKGROUND: &str = "#1a1a1a";
const GRID: &str = "#333333";
const AXIS: &str = "#555555";
const TICK_TEXT: &str = "#999999";
const TITLE_TEXT: &str = "#eeeeee";
const FONT: &str = "sans-serif";

const MARGIN_LEFT: f64 = 72.0;
const MARGIN_RIGHT: f64 = 16.0;
const MARGIN_TOP: f64 = 36.0;
const MARGIN_BOTTOM: f64 = 28.0;

/// One chart panel ready to be drawn.
#[derive(Debug, Clone)]
pub struct ChartRegion<'a> {
    pub kind: ArtifactKind,
    pub title: String,
    pub rows: &'a [OhlcvRow],
    pub show_indicators: bool,
}

impl<'a> ChartRegion<'a> {
    /// Builds the region for `kind`, or `None` for the tabular artifact.
    pub fn from_view(
        view: &ViewModel<'a>,
        kind: ArtifactKind,
        show_indicators: bool,
    ) -> Option<Self> {
        if kind == ArtifactKind::Table {
            return None;
        }
        Some(Self {
            kind,
            title: format!("{} {}", view.title(), kind.label()),
            rows: view.rows(),
            show_indicators,
        })
    }

    /// Logical size in SVG user units, before scaling.
    pub fn size(&self) -> (f64, f64) {
        let height = match self.kind {
            ArtifactKind::Price => 320.0,
            ArtifactKind::Volume => 200.0,
            ArtifactKind::Rsi | ArtifactKind::Table => 180.0,
        };
        (WIDTH, height)
    }
}

/// Plot area inside the margins.
#[derive(Debug, Clone, Copy)]
struct Plot {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
    n: usize,
    lo: f64,
    hi: f64,
}

impl Plot {
    fn x(&self, index: usize) -> f64 {
        self.left + self.width * (index as f64 + 0.5) / self.n.max(1) as f64
    }

    fn y(&self, value: f64) -> f64 {
        let span = self.hi - self.lo;
        let t = if span > 0.0 { (value - self.lo) / span } else { 0.5 };
        self.top + self.height * (1.0 - t)
    }

    fn slot(&self) -> f64 {
        self.width / self.n.max(1) as f64
    }

    fn bottom(&self) -> f64 {
        self.top + self.height
    }

    fn right(&self) -> f64 {
        self.left + self.width
    }
}

/// Renders `region` to standalone SVG markup.
pub fn render_region(region: &ChartRegion<'_>) -> String {
    let (width, height) = region.size();
    let mut svg = format!(
        "<svg xmlns='http://www.w3.org/2000/svg' width='{width}' height='{height}' viewBox='0 0 {width} {height}'>\n"
    );
    svg.push_str(&format!(
        "  <rect width='{width}' height='{height}' rx='8' fill='{BACKGROUND}'/>\n"
    ));
    svg.push_str(&text(16.0, 22.0, 14.0, TITLE_TEXT, "start", &region.title));

    let (lo, hi) = domain(region);
    let plot = Plot {
        left: MARGIN_LEFT,
        top: MARGIN_TOP,
        width: width - MARGIN_LEFT - MARGIN_RIGHT,
        height: height - MARGIN_TOP - MARGIN_BOTTOM,
        n: region.rows.len(),
        lo,
        hi,
    };

    axes(&mut svg, &plot, region);

    match region.kind {
        ArtifactKind::Price => {
            let series = price_series(region.show_indicators);
            for s in &series {
                polyline(&mut svg, &plot, region.rows, s.value, s.color, 1.5);
            }
            legend(&mut svg, &plot, series.iter().map(|s| (s.label, s.color)));
        }
        ArtifactKind::Volume => bars(&mut svg, &plot, region.rows),
        ArtifactKind::Rsi | ArtifactKind::Table => {
            for level in RSI_LEVELS {
                let y = plot.y(level);
                svg.push_str(&format!(
                    "  <line x1='{:.2}' y1='{y:.2}' x2='{:.2}' y2='{y:.2}' stroke='{AXIS}' stroke-dasharray='3 3'/>\n",
                    plot.left,
                    plot.right()
                ));
            }
            polyline(&mut svg, &plot, region.rows, |r| r.rsi, RSI_COLOR, 1.5);
        }
    }

    svg.push_str("</svg>\n");
    svg
}

/// Value range of the y axis.
fn domain(region: &ChartRegion<'_>) -> (f64, f64) {
    match region.kind {
        ArtifactKind::Rsi | ArtifactKind::Table => (0.0, 100.0),
        ArtifactKind::Volume => (0.0, volume_ceiling(region.rows)),
        ArtifactKind::Price => price_range(region.rows, region.show_indicators),
    }
}

fn axes(svg: &mut String, plot: &Plot, region: &ChartRegion<'_>) {
    for value in [plot.lo, (plot.lo + plot.hi) / 2.0, plot.hi] {
        let y = plot.y(value);
        svg.push_str(&format!(
            "  <line x1='{:.2}' y1='{y:.2}' x2='{:.2}' y2='{y:.2}' stroke='{GRID}' stroke-dasharray='3 3'/>\n",
            plot.left,
            plot.right()
        ));
        svg.push_str(&text(
            plot.left - 6.0,
            y + 4.0,
            11.0,
            TICK_TEXT,
            "end",
            &tick_label(value, region.kind),
        ));
    }

    svg.push_str(&format!(
        "  <polyline points='{l:.2},{t:.2} {l:.2},{b:.2} {r:.2},{b:.2}' fill='none' stroke='{AXIS}'/>\n",
        l = plot.left,
        t = plot.top,
        b = plot.bottom(),
        r = plot.right()
    ));

    if let (Some(first), Some(last)) = (region.rows.first(), region.rows.last()) {
        let y = plot.bottom() + 18.0;
        svg.push_str(&text(plot.left, y, 11.0, TICK_TEXT, "start", &first.date));
        if region.rows.len() > 1 {
            svg.push_str(&text(plot.right(), y, 11.0, TICK_TEXT, "end", &last.date));
        }
    }
}

fn tick_label(value: f64, kind: ArtifactKind) -> String {
    match kind {
        ArtifactKind::Volume => compact_volume(value),
        ArtifactKind::Rsi | ArtifactKind::Table => format!("{value:.0}"),
        ArtifactKind::Price => format!("{value:.2}"),
    }
}

/// Draws one series, skipping rows where it has no value.
fn polyline(
    svg: &mut String,
    plot: &Plot,
    rows: &[OhlcvRow],
    value: fn(&OhlcvRow) -> Option<f64>,
    color: Rgb,
    stroke_width: f64,
) {
    let points: Vec<String> = rows
        .iter()
        .enumerate()
        .filter_map(|(i, row)| value(row).map(|v| format!("{:.2},{:.2}", plot.x(i), plot.y(v))))
        .collect();
    if points.is_empty() {
        return;
    }
    svg.push_str(&format!(
        "  <polyline points='{}' fill='none' stroke='{}' stroke-width='{stroke_width}'/>\n",
        points.join(" "),
        color.hex()
    ));
}

fn bars(svg: &mut String, plot: &Plot, rows: &[OhlcvRow]) {
    let bar_width = (plot.slot() * 0.8).max(1.0);
    for (i, row) in rows.iter().enumerate() {
        let Some(volume) = row.volume else { continue };
        let top = plot.y(volume);
        let height = (plot.bottom() - top).max(0.0);
        svg.push_str(&format!(
            "  <rect x='{:.2}' y='{top:.2}' width='{bar_width:.2}' height='{height:.2}' fill='{}'/>\n",
            plot.x(i) - bar_width / 2.0,
            BarDirection::of(row).color().hex()
        ));
    }
}

fn legend<'s>(svg: &mut String, plot: &Plot, entries: impl Iterator<Item = (&'s str, Rgb)>) {
    let mut x = plot.right();
    let y = 22.0;
    let entries: Vec<_> = entries.collect();
    for (label, color) in entries.into_iter().rev() {
        svg.push_str(&text(x, y, 11.0, &color.hex(), "end", label));
        x -= 8.0 * label.len() as f64 + 16.0;
    }
}

fn text(x: f64, y: f64, size: f64, fill: &str, anchor: &str, content: &str) -> String {
    format!(
        "  <text x='{x:.2}' y='{y:.2}' fill='{fill}' font-family='{FONT}' font-size='{size}' text-anchor='{anchor}'>{}</text>\n",
        escape(content)
    )
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\'' => out.push_str("&apos;"),
            '"' => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
    out
}
