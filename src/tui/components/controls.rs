//! Query form: symbol, date range, source, indicator toggle and Load.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::tui::app::{App, Focus, Mode};
use crate::tui::input::TextInput;

const DATE_PLACEHOLDER: &str = "YYYY-MM-DD";

/// Renders the query form.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(24), // Symbol
            Constraint::Length(14), // Start
            Constraint::Length(14), // End
            Constraint::Length(12), // Source
            Constraint::Length(16), // Indicators
            Constraint::Length(12), // Load
            Constraint::Min(0),
        ])
        .split(area);

    render_text_field(frame, cells[0], app, Focus::Symbol, "Symbol", &app.symbol, "");
    render_text_field(frame, cells[1], app, Focus::Start, "Start", &app.start, DATE_PLACEHOLDER);
    render_text_field(frame, cells[2], app, Focus::End, "End", &app.end, DATE_PLACEHOLDER);

    let source = Paragraph::new(format!("◂ {} ▸", app.source.label()))
        .block(field_block(app, Focus::Source, "Source"));
    frame.render_widget(source, cells[3]);

    let mark = if app.show_indicators { "[x]" } else { "[ ]" };
    let indicators = Paragraph::new(format!("{mark} SMA/EMA/RSI"))
        .block(field_block(app, Focus::Indicators, "Indicators"));
    frame.render_widget(indicators, cells[4]);

    let load = if app.can_load() {
        Span::styled(
            " Load ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled(" Loading… ", Style::default().fg(Color::DarkGray))
    };
    let load = Paragraph::new(Line::from(load)).block(field_block(app, Focus::Load, ""));
    frame.render_widget(load, cells[5]);
}

fn render_text_field(
    frame: &mut Frame,
    area: Rect,
    app: &App,
    focus: Focus,
    title: &str,
    input: &TextInput,
    placeholder: &str,
) {
    let text = if input.is_empty() {
        Span::styled(placeholder.to_string(), Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(input.as_str().to_string())
    };
    let block = field_block(app, focus, title);
    let inner = block.inner(area);
    frame.render_widget(Paragraph::new(Line::from(text)).block(block), area);

    if app.focus == focus && app.mode == Mode::Insert {
        let x = inner
            .x
            .saturating_add(input.cursor_column())
            .min(inner.right().saturating_sub(1));
        frame.set_cursor_position(Position::new(x, inner.y));
    }
}

fn field_block<'a>(app: &App, focus: Focus, title: &'a str) -> Block<'a> {
    let border_style = if app.focus != focus {
        Style::default().fg(Color::DarkGray)
    } else if app.mode == Mode::Insert {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Cyan)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style);
    if title.is_empty() {
        block
    } else {
        block.title(format!(" {title} "))
    }
}
