//! RSI panel on a fixed 0-100 axis with 30/70 reference levels.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    symbols::Marker,
    text::Span,
    widgets::{Axis, Chart, Dataset, GraphType},
};

use super::{color, date_axis, panel_block, points};
use crate::view::{RSI_COLOR, RSI_LEVELS, ViewModel};

pub fn render(frame: &mut Frame, area: Rect, view: &ViewModel<'_>) {
    let rows = view.rows();
    let rsi = points(rows, |r| r.rsi);
    let right = rows.len().saturating_sub(1).max(1) as f64;
    let levels: Vec<[(f64, f64); 2]> = RSI_LEVELS
        .iter()
        .map(|level| [(0.0, *level), (right, *level)])
        .collect();

    let mut datasets: Vec<Dataset> = levels
        .iter()
        .map(|line| {
            Dataset::default()
                .marker(Marker::Dot)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(Color::DarkGray))
                .data(line)
        })
        .collect();
    datasets.push(
        Dataset::default()
            .name("RSI")
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(color(RSI_COLOR)))
            .data(&rsi),
    );

    let y_axis = Axis::default()
        .style(Style::default().fg(Color::DarkGray))
        .bounds([0.0, 100.0])
        .labels([Span::raw("0"), Span::raw("50"), Span::raw("100")]);

    let chart = Chart::new(datasets)
        .block(panel_block("RSI"))
        .x_axis(date_axis(rows))
        .y_axis(y_axis);
    frame.render_widget(chart, area);
}
