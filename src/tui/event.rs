//! Event handling for the TUI.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{
    self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
};
use tokio::sync::mpsc;

use crate::export::{ChartRegion, SnapshotOutcome, render_region};
use crate::models::OhlcvResponse;
use crate::request::{PendingLoad, RequestId};
use crate::view::ArtifactKind;

use super::app::{App, ExportStatus, Focus, Mode, ServiceStatus};

/// Events that can occur in the application.
#[derive(Debug)]
pub enum Event {
    /// A key was pressed.
    Key(KeyEvent),
    /// Terminal was resized.
    Resize(u16, u16),
    /// Periodic tick for UI updates.
    Tick,
}

/// Messages that update application state.
#[derive(Debug)]
pub enum Message {
    /// Input event from terminal.
    Input(Event),

    /// A load finished.
    Loaded {
        id: RequestId,
        result: crate::Result<OhlcvResponse>,
    },
    /// Start-up health check finished.
    Health(bool),
    /// CSV export finished; `None` means there was nothing to write.
    TableExported(crate::Result<Option<PathBuf>>),
    /// Image export finished.
    SnapshotExported(ArtifactKind, SnapshotOutcome),

    /// Request to quit the application.
    Quit,
}

/// Spawns a task that polls for terminal events and sends them to a channel.
pub fn spawn_event_reader(tx: mpsc::UnboundedSender<Message>) {
    tokio::spawn(async move {
        loop {
            // Poll for events with a 50ms timeout
            match tokio::task::spawn_blocking(|| {
                if event::poll(Duration::from_millis(50)).unwrap_or(false) {
                    event::read().ok()
                } else {
                    None
                }
            })
            .await
            {
                Ok(Some(CrosstermEvent::Key(key))) if key.kind == KeyEventKind::Press => {
                    if tx.send(Message::Input(Event::Key(key))).is_err() {
                        break;
                    }
                }
                Ok(Some(CrosstermEvent::Resize(w, h))) => {
                    if tx.send(Message::Input(Event::Resize(w, h))).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(_) => break,
            }
        }
    });
}

/// Spawns a task that sends periodic tick events.
pub fn spawn_tick_timer(tx: mpsc::UnboundedSender<Message>, interval_ms: u64) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_millis(interval_ms));
        loop {
            interval.tick().await;
            if tx.send(Message::Input(Event::Tick)).is_err() {
                break;
            }
        }
    });
}

/// Actions that require external handling (network calls, file writes).
#[derive(Debug)]
pub enum Action {
    /// Fetch OHLCV data for a load that has already been issued.
    Load(PendingLoad),
    /// Write the rows of `response` as CSV.
    ExportTable {
        response: Arc<OhlcvResponse>,
        filename: String,
    },
    /// Rasterize a chart panel and save it.
    ExportSnapshot {
        kind: ArtifactKind,
        svg: String,
        filename: String,
    },
}

/// Updates application state based on a message.
pub fn update(app: &mut App, message: Message) -> Option<Action> {
    match message {
        Message::Input(event) => handle_input(app, event),
        Message::Loaded { id, result } => {
            app.request.complete(id, result);
            None
        }
        Message::Health(online) => {
            app.service_status = if online {
                ServiceStatus::Online
            } else {
                ServiceStatus::Offline
            };
            None
        }
        Message::TableExported(result) => {
            match result {
                Ok(Some(path)) => app.show_status(ExportStatus::Saved(path)),
                Ok(None) => app.export_status = None,
                Err(err) => app.show_status(ExportStatus::Failed(err.to_string())),
            }
            None
        }
        Message::SnapshotExported(kind, outcome) => {
            let status = match outcome {
                SnapshotOutcome::Saved(path) => ExportStatus::Saved(path),
                SnapshotOutcome::Unavailable => {
                    ExportStatus::Failed(format!("{kind} image export is unavailable"))
                }
                SnapshotOutcome::Failed(reason) => ExportStatus::Failed(reason),
            };
            app.show_status(status);
            None
        }
        Message::Quit => {
            app.should_quit = true;
            None
        }
    }
}

/// Handles input events and updates application state.
fn handle_input(app: &mut App, event: Event) -> Option<Action> {
    match event {
        Event::Key(key) => handle_key(app, key),
        Event::Resize(_, _) => None,
        Event::Tick => {
            app.clear_stale_status();
            None
        }
    }
}

/// Handles key press events.
fn handle_key(app: &mut App, key: KeyEvent) -> Option<Action> {
    // Global keys (work in any mode)
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
            return None;
        }
        KeyCode::Esc => {
            app.mode = Mode::Normal;
            return None;
        }
        _ => {}
    }

    match app.mode {
        Mode::Normal => handle_normal_mode(app, key),
        Mode::Insert => handle_insert_mode(app, key),
    }
}

/// Handles keys in normal mode.
fn handle_normal_mode(app: &mut App, key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Char('q') => {
            app.should_quit = true;
            None
        }

        // Focus navigation
        KeyCode::Tab | KeyCode::Char('j') | KeyCode::Down => {
            app.focus = app.focus.next();
            None
        }
        KeyCode::BackTab | KeyCode::Char('k') | KeyCode::Up => {
            app.focus = app.focus.previous();
            None
        }

        // Activate the focused control
        KeyCode::Enter | KeyCode::Char('i') => match app.focus {
            focus if focus.is_text() => {
                app.mode = Mode::Insert;
                None
            }
            Focus::Source => {
                app.source.toggle();
                None
            }
            Focus::Indicators => {
                app.show_indicators = !app.show_indicators;
                None
            }
            _ => load(app),
        },
        KeyCode::Char(' ') if app.focus == Focus::Source => {
            app.source.toggle();
            None
        }
        KeyCode::Char(' ') if app.focus == Focus::Indicators => {
            app.show_indicators = !app.show_indicators;
            None
        }

        // Shortcuts
        KeyCode::Char('l') => load(app),
        KeyCode::Char('s') => {
            app.source.toggle();
            None
        }
        KeyCode::Char('t') => {
            app.show_indicators = !app.show_indicators;
            None
        }

        // Exports
        KeyCode::Char('c') => export(app, ArtifactKind::Table),
        KeyCode::Char('p') => export(app, ArtifactKind::Price),
        KeyCode::Char('v') => export(app, ArtifactKind::Volume),
        KeyCode::Char('r') => export(app, ArtifactKind::Rsi),

        _ => None,
    }
}

/// Handles keys in insert mode (text input).
fn handle_insert_mode(app: &mut App, key: KeyEvent) -> Option<Action> {
    let uppercase = app.focus == Focus::Symbol;
    let Some(input) = app.focused_input_mut() else {
        app.mode = Mode::Normal;
        return None;
    };

    match key.code {
        // Submitting the form loads, like pressing Load.
        KeyCode::Enter => {
            app.mode = Mode::Normal;
            load(app)
        }
        KeyCode::Tab => {
            app.mode = Mode::Normal;
            app.focus = app.focus.next();
            None
        }
        KeyCode::Char(c) => {
            if uppercase {
                for u in c.to_uppercase() {
                    input.insert(u);
                }
            } else {
                input.insert(c);
            }
            None
        }
        KeyCode::Backspace => {
            input.backspace();
            None
        }
        KeyCode::Delete => {
            input.delete();
            None
        }
        KeyCode::Left => {
            input.move_left();
            None
        }
        KeyCode::Right => {
            input.move_right();
            None
        }
        KeyCode::Home => {
            input.move_home();
            None
        }
        KeyCode::End => {
            input.move_end();
            None
        }
        _ => None,
    }
}

fn load(app: &mut App) -> Option<Action> {
    app.begin_load().map(Action::Load)
}

/// Prepares an export of `kind` if it is currently offered.
fn export(app: &mut App, kind: ArtifactKind) -> Option<Action> {
    if !app.exportable().contains(&kind) {
        return None;
    }
    let response = app.request.response().cloned()?;

    let action = {
        let view = app.view()?;
        let filename = view.filename(kind);
        match ChartRegion::from_view(&view, kind, app.show_indicators) {
            Some(region) => Action::ExportSnapshot {
                kind,
                svg: render_region(&region),
                filename,
            },
            None => Action::ExportTable { response, filename },
        }
    };

    app.show_status(ExportStatus::Working(kind));
    Some(action)
}
