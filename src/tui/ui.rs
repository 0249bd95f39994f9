//! Main UI rendering coordinator.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use super::app::{App, Screen};
use super::components::{controls, help_bar, status_bar};
use super::panels;

const PROMPT: &str = "Enter a ticker and press Load.";
const EMPTY: &str = "No data for this range.";

/// Renders the entire application UI.
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title
            Constraint::Length(3), // Query form
            Constraint::Min(8),    // Content
            Constraint::Length(1), // Status bar
            Constraint::Length(1), // Keybindings help
        ])
        .split(area);

    render_title(frame, layout[0]);
    controls::render(frame, layout[1], app);

    match app.screen() {
        Screen::Prompt => render_notice(frame, layout[2], PROMPT, Color::DarkGray),
        Screen::Loading => render_notice(frame, layout[2], "Loading…", Color::Yellow),
        Screen::Error(message) => render_error(frame, layout[2], message),
        Screen::Empty => render_notice(frame, layout[2], EMPTY, Color::DarkGray),
        Screen::Results(view) => panels::render(frame, layout[2], app, &view),
    }

    status_bar::render(frame, layout[3], app);
    help_bar::render(frame, layout[4], app);
}

fn render_title(frame: &mut Frame, area: Rect) {
    let line = Line::from(vec![
        Span::styled(
            " NoKeyFinance ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" OHLCV dashboard", Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_notice(frame: &mut Frame, area: Rect, text: &str, color: Color) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let para = Paragraph::new(text)
        .style(Style::default().fg(color))
        .alignment(Alignment::Center);
    frame.render_widget(para, centered_line(inner));
}

fn render_error(frame: &mut Frame, area: Rect, message: &str) {
    let banner_height = 3u16.min(area.height);
    let banner = Rect {
        height: banner_height,
        ..area
    };

    let block = Block::default()
        .title(" Error ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));
    let para = Paragraph::new(message.to_string())
        .style(Style::default().fg(Color::Red))
        .wrap(Wrap { trim: true })
        .block(block);
    frame.render_widget(para, banner);
}

/// A one-line rect in the vertical middle of `area`.
fn centered_line(area: Rect) -> Rect {
    Rect {
        y: area.y + area.height / 2,
        height: area.height.min(1),
        ..area
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NokeyError;
    use crate::models::{OhlcvResponse, OhlcvRow};
    use ratatui::{Terminal, backend::TestBackend};

    fn draw(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn initial_prompt() {
        let screen = draw(&App::new());
        assert!(screen.contains(PROMPT));
        assert!(screen.contains("Symbol"));
    }

    #[test]
    fn error_banner_replaces_content() {
        let mut app = App::new();
        let pending = app.begin_load().unwrap();
        app.request.complete(
            pending.id,
            Err(NokeyError::Api {
                status: 404,
                message: "Unknown ticker XYZ".into(),
            }),
        );
        let screen = draw(&app);
        assert!(screen.contains("Unknown ticker XYZ"));
        assert!(!screen.contains(PROMPT));
    }

    #[test]
    fn empty_result_message() {
        let mut app = App::new();
        let pending = app.begin_load().unwrap();
        app.request.complete(
            pending.id,
            Ok(OhlcvResponse {
                ticker: "AAPL".into(),
                source: "yahoo".into(),
                ..Default::default()
            }),
        );
        let screen = draw(&app);
        assert!(screen.contains(EMPTY));
        assert!(!screen.contains("[c] CSV"));
    }

    #[test]
    fn results_show_panels() {
        let mut app = App::new();
        let pending = app.begin_load().unwrap();
        let rows = (1..=5)
            .map(|d| OhlcvRow {
                date: format!("2024-01-0{d}"),
                open: Some(10.0),
                close: Some(10.0 + d as f64),
                volume: Some(1000.0 * d as f64),
                rsi: Some(40.0 + d as f64),
                ..Default::default()
            })
            .collect();
        app.request.complete(
            pending.id,
            Ok(OhlcvResponse {
                ticker: "AAPL".into(),
                source: "yahoo".into(),
                date_range: Some(("2024-01-01".into(), "2024-01-05".into())),
                rows,
            }),
        );
        let screen = draw(&app);
        assert!(screen.contains("AAPL (yahoo)"));
        assert!(screen.contains("Price"));
        assert!(screen.contains("Volume"));
        assert!(screen.contains("RSI"));
        assert!(screen.contains("[c] CSV"));
    }
}
