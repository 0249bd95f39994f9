//! NoKeyFinance dashboard library.
//!
//! Loads daily OHLCV rows and technical indicators from the NoKeyFinance
//! data service, derives what the dashboard shows, and exports the rows as
//! CSV or any chart panel as a PNG image.

pub mod config;
pub mod error;
pub mod export;
pub mod models;
pub mod request;
pub mod sanitize;
pub mod service;
pub mod tui;
pub mod view;

pub use error::{NokeyError, Result};
