//! TUI (Terminal User Interface) for the card verifier.
//!
//! Exposes ratatui elements and core state required to run "cardcheck ui".

pub mod app;
pub mod input;
pub mod preview;
pub mod render;
pub mod runtime;
pub mod screens;
#[cfg(test)]
mod testing;

pub use app::{AppEvent, AppState, CaptureSettings, Command};
pub use input::handle_key_event;
pub use render::draw_ui;
pub use runtime::{run_command, run_ui, spawn_command};
