//! Terminal dashboard for NoKeyFinance.
//!
//! Provides a Ratatui-based TUI: a query form, a single content area
//! (prompt, loading, error banner, empty result, or chart panels), and a
//! status bar reporting service health and export outcomes.

pub mod app;
pub mod components;
pub mod event;
pub mod input;
pub mod panels;
pub mod runtime;
pub mod terminal;
pub mod ui;

pub use app::App;
pub use event::{Action, Event, Message, update};
pub use runtime::{Runtime, run};
pub use terminal::{Tui, restore_terminal, setup_terminal};
pub use ui::render;
