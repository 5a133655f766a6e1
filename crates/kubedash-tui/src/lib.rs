//! TUI components for kubedash
//!
//! This crate provides the terminal user interface for kubedash,
//! including state management, keybindings, event handling, and screens.

pub mod app;
pub mod config;
pub mod tui;
pub mod ui;

pub use app::{Action, AppState, DetailPage, Listing, Screen, UiState, View};
pub use config::{KeyBinding, KeyBindings, KeyContext};
pub use tui::{Event, EventHandler, Tui};
pub use ui::{Layout, Theme, render};
