//! Keybindings help line.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    widgets::Paragraph,
};

use crate::tui::app::{App, Mode};

/// Renders the keybindings help line for the current mode.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let help = match app.mode {
        Mode::Insert => "[Enter]load [Tab]next field [Esc]done",
        Mode::Normal => {
            "[Tab/j/k]focus [Enter/i]edit [l]oad [s]ource [t]oggle indicators [c]sv [p]rice [v]olume [r]si [q]uit"
        }
    };

    let para = Paragraph::new(help).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(para, area);
}
