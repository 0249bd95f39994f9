//! Reusable UI components.

pub mod controls;
pub mod help_bar;
pub mod status_bar;
