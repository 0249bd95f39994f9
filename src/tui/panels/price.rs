//! Price panel: close plus moving-average overlays.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    symbols::Marker,
    text::Span,
    widgets::{Axis, Chart, Dataset, GraphType},
};

use super::{color, date_axis, panel_block, points};
use crate::view::{ViewModel, price_range, price_series};

pub fn render(frame: &mut Frame, area: Rect, view: &ViewModel<'_>, show_indicators: bool) {
    let rows = view.rows();
    let series = price_series(show_indicators);
    let data: Vec<Vec<(f64, f64)>> = series.iter().map(|s| points(rows, s.value)).collect();

    let (lo, hi) = price_range(rows, show_indicators);

    let datasets: Vec<Dataset> = series
        .iter()
        .zip(&data)
        .map(|(s, pts)| {
            Dataset::default()
                .name(s.label)
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(color(s.color)))
                .data(pts)
        })
        .collect();

    let y_axis = Axis::default()
        .style(Style::default().fg(Color::DarkGray))
        .bounds([lo, hi])
        .labels([
            Span::raw(format!("{lo:.2}")),
            Span::raw(format!("{:.2}", (lo + hi) / 2.0)),
            Span::raw(format!("{hi:.2}")),
        ]);

    let chart = Chart::new(datasets)
        .block(panel_block("Price"))
        .x_axis(date_axis(rows))
        .y_axis(y_axis);
    frame.render_widget(chart, area);
}
