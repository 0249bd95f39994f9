//! Status bar component.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::request::RequestState;
use crate::tui::app::{App, ExportStatus, ServiceStatus};

/// Renders the status bar.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let service_color = match app.service_status {
        ServiceStatus::Online => Color::Green,
        ServiceStatus::Checking => Color::Yellow,
        ServiceStatus::Offline => Color::Red,
    };

    let request_color = match app.request.state() {
        RequestState::Idle => Color::White,
        RequestState::Loading => Color::Yellow,
        RequestState::Success(_) => Color::Green,
        RequestState::Error(_) => Color::Red,
    };

    let export_span = match app.export_status.as_ref().map(|d| &d.status) {
        Some(ExportStatus::Working(kind)) => Span::styled(
            format!(" Exporting {kind}… "),
            Style::default().fg(Color::Yellow),
        ),
        Some(ExportStatus::Saved(path)) => Span::styled(
            format!(" Saved {} ", path.display()),
            Style::default().fg(Color::Green),
        ),
        Some(ExportStatus::Failed(reason)) => Span::styled(
            format!(" Export failed: {reason} "),
            Style::default().fg(Color::Red),
        ),
        None => Span::raw(""),
    };

    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", app.service_status.label()),
            Style::default().fg(service_color),
        ),
        Span::raw("│"),
        Span::styled(
            format!(" {} ", app.request.state().label()),
            Style::default().fg(request_color),
        ),
        Span::raw("│"),
        export_span,
    ]);

    let para = Paragraph::new(line).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(para, area);
}
