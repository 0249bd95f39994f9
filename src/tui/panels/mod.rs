//! Chart panels of the result view.
//!
//! Price and Volume are always shown; RSI only when the view has an RSI
//! panel. Panels are read-only renderings of the [`ViewModel`].

pub mod price;
pub mod rsi;
pub mod volume;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Paragraph},
};

use crate::models::OhlcvRow;
use crate::tui::app::App;
use crate::view::{ArtifactKind, Rgb, ViewModel};

/// Renders the result header and the chart panels.
pub fn render(frame: &mut Frame, area: Rect, app: &App, view: &ViewModel<'_>) {
    let constraints: Vec<Constraint> = if view.has_rsi_panel() {
        vec![
            Constraint::Length(1),
            Constraint::Percentage(50),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ]
    } else {
        vec![
            Constraint::Length(1),
            Constraint::Percentage(60),
            Constraint::Percentage(40),
        ]
    };
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    render_header(frame, layout[0], app, view);
    price::render(frame, layout[1], view, app.show_indicators);
    volume::render(frame, layout[2], view);
    if view.has_rsi_panel() {
        rsi::render(frame, layout[3], view);
    }
}

/// `TICKER (source)  first – last` plus the export shortcuts on offer.
fn render_header(frame: &mut Frame, area: Rect, app: &App, view: &ViewModel<'_>) {
    let mut spans = vec![Span::styled(
        format!(" {} ", view.title()),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    if let Some(range) = view.range_label() {
        spans.push(Span::styled(range, Style::default().fg(Color::Gray)));
    }
    spans.push(Span::raw("   "));
    for kind in app.exportable() {
        let key = match kind {
            ArtifactKind::Table => "c",
            ArtifactKind::Price => "p",
            ArtifactKind::Volume => "v",
            ArtifactKind::Rsi => "r",
        };
        let label = match kind {
            ArtifactKind::Table => "CSV".to_string(),
            other => format!("{other} PNG"),
        };
        spans.push(Span::styled(
            format!("[{key}] {label} "),
            Style::default().fg(Color::Cyan),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

pub(crate) fn color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

pub(crate) fn panel_block(title: &str) -> Block<'static> {
    Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
}

/// `(index, value)` points of one series; rows without a value are skipped.
pub(crate) fn points(rows: &[OhlcvRow], value: fn(&OhlcvRow) -> Option<f64>) -> Vec<(f64, f64)> {
    rows.iter()
        .enumerate()
        .filter_map(|(i, row)| value(row).map(|v| (i as f64, v)))
        .collect()
}

/// Index-based x axis labelled with the first and last dates.
pub(crate) fn date_axis(rows: &[OhlcvRow]) -> Axis<'static> {
    let last = rows.len().saturating_sub(1);
    let labels: Vec<Span<'static>> = match (rows.first(), rows.last()) {
        (Some(first), Some(end)) if last > 0 => {
            vec![Span::raw(first.date.clone()), Span::raw(end.date.clone())]
        }
        (Some(only), _) => vec![Span::raw(only.date.clone())],
        _ => Vec::new(),
    };
    Axis::default()
        .style(Style::default().fg(Color::DarkGray))
        .bounds([0.0, last.max(1) as f64])
        .labels(labels)
}
