//! Application state for the TUI.
//!
//! [`App`] is the dashboard controller: it owns every input field, the
//! source and indicator toggles, and the [`RequestController`]. Rendering
//! reads it; [`update`](super::event::update) is the only writer.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::models::Source;
use crate::request::{LoadParams, PendingLoad, RequestController, RequestState};
use crate::tui::input::TextInput;
use crate::view::{ArtifactKind, ViewModel};

/// Maximum length of the symbol field.
pub const SYMBOL_MAX_CHARS: usize = 20;

/// Symbol shown when the dashboard opens.
const INITIAL_SYMBOL: &str = "AAPL";

/// How long an export status stays in the status bar.
const STATUS_TTL: Duration = Duration::from_secs(8);

/// Central application state container.
pub struct App {
    // -- Inputs --
    pub symbol: TextInput,
    pub start: TextInput,
    pub end: TextInput,
    pub source: Source,
    pub show_indicators: bool,

    // -- Request --
    pub request: RequestController,

    // -- UI State --
    /// Control that receives key presses.
    pub focus: Focus,
    /// Current input mode.
    pub mode: Mode,
    /// Data service reachability from the start-up health check.
    pub service_status: ServiceStatus,
    /// Outcome of the most recent export, cleared after a while.
    pub export_status: Option<StatusDisplay>,

    // -- Internal --
    /// Flag to signal application should quit.
    pub should_quit: bool,
}

impl App {
    /// Creates a new App instance with default state.
    pub fn new() -> Self {
        Self {
            symbol: TextInput::with_limit(SYMBOL_MAX_CHARS).with_text(INITIAL_SYMBOL),
            start: TextInput::new(),
            end: TextInput::new(),
            source: Source::default(),
            show_indicators: true,
            request: RequestController::new(),
            focus: Focus::default(),
            mode: Mode::default(),
            service_status: ServiceStatus::default(),
            export_status: None,
            should_quit: false,
        }
    }

    /// Current form values.
    pub fn load_params(&self) -> LoadParams {
        LoadParams {
            symbol: self.symbol.as_str().to_string(),
            source: self.source,
            start: self.start.as_str().to_string(),
            end: self.end.as_str().to_string(),
            want_indicators: self.show_indicators,
        }
    }

    /// The Load control is disabled while a load is in flight.
    pub fn can_load(&self) -> bool {
        !self.request.is_loading()
    }

    /// Starts a load from the current form, unless one is in flight.
    pub fn begin_load(&mut self) -> Option<PendingLoad> {
        if !self.can_load() {
            return None;
        }
        let params = self.load_params();
        Some(self.request.begin(&params))
    }

    /// Picks the single content view to show.
    pub fn screen(&self) -> Screen<'_> {
        match self.request.state() {
            RequestState::Idle => Screen::Prompt,
            RequestState::Loading => Screen::Loading,
            RequestState::Error(message) => Screen::Error(message),
            RequestState::Success(response) if response.rows.is_empty() => Screen::Empty,
            RequestState::Success(response) => {
                Screen::Results(ViewModel::derive(response, self.show_indicators))
            }
        }
    }

    /// View of the current successful response, if any.
    pub fn view(&self) -> Option<ViewModel<'_>> {
        self.request
            .response()
            .map(|response| ViewModel::derive(response, self.show_indicators))
    }

    /// Artifacts that can be exported right now, in display order.
    ///
    /// The table is offered only when there are rows; the RSI image only
    /// when its panel is shown.
    pub fn exportable(&self) -> Vec<ArtifactKind> {
        let Screen::Results(view) = self.screen() else {
            return Vec::new();
        };
        let panels = ArtifactKind::PANELS
            .into_iter()
            .filter(|kind| *kind != ArtifactKind::Rsi || view.has_rsi_panel());
        std::iter::once(ArtifactKind::Table).chain(panels).collect()
    }

    /// Returns the text input that has focus, if any.
    pub fn focused_input_mut(&mut self) -> Option<&mut TextInput> {
        match self.focus {
            Focus::Symbol => Some(&mut self.symbol),
            Focus::Start => Some(&mut self.start),
            Focus::End => Some(&mut self.end),
            _ => None,
        }
    }

    /// Shows an export outcome in the status bar.
    pub fn show_status(&mut self, status: ExportStatus) {
        self.export_status = Some(StatusDisplay {
            status,
            timestamp: Instant::now(),
        });
    }

    /// Clears export statuses older than the display window.
    ///
    /// A status for an export still in progress is kept.
    pub fn clear_stale_status(&mut self) {
        if let Some(ref display) = self.export_status
            && !matches!(display.status, ExportStatus::Working(_))
            && display.timestamp.elapsed() > STATUS_TTL
        {
            self.export_status = None;
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

/// The content area shows exactly one of these.
#[derive(Debug)]
pub enum Screen<'a> {
    /// Nothing loaded yet.
    Prompt,
    Loading,
    /// Error banner with the request's message.
    Error(&'a str),
    /// The query matched no trading days.
    Empty,
    Results(ViewModel<'a>),
}

/// Focusable controls, in tab order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Focus {
    #[default]
    Symbol,
    Start,
    End,
    Source,
    Indicators,
    Load,
}

impl Focus {
    const ORDER: [Focus; 6] = [
        Focus::Symbol,
        Focus::Start,
        Focus::End,
        Focus::Source,
        Focus::Indicators,
        Focus::Load,
    ];

    fn index(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ORDER[(self.index() + 1) % Self::ORDER.len()]
    }

    pub fn previous(self) -> Self {
        Self::ORDER[(self.index() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }

    /// Whether this control is a text field.
    pub fn is_text(self) -> bool {
        matches!(self, Focus::Symbol | Focus::Start | Focus::End)
    }
}

/// Input mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Normal,
    /// Typing into the focused text field.
    Insert,
}

/// Data service reachability.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ServiceStatus {
    #[default]
    Checking,
    Online,
    Offline,
}

impl ServiceStatus {
    /// Returns a display string for the status.
    pub fn label(&self) -> &'static str {
        match self {
            ServiceStatus::Checking => "Checking...",
            ServiceStatus::Online => "API online",
            ServiceStatus::Offline => "API offline",
        }
    }
}

/// Progress of an export.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExportStatus {
    Working(ArtifactKind),
    Saved(PathBuf),
    Failed(String),
}

/// Export status with timestamp for auto-clear.
#[derive(Clone, Debug)]
pub struct StatusDisplay {
    pub status: ExportStatus,
    /// When the status was shown.
    pub timestamp: Instant,
}
