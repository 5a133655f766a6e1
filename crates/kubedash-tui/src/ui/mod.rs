pub mod components;
mod layout;
pub mod screens;
mod theme;

use ratatui::Frame;

use crate::app::{AppState, Screen};
use components::{ErrorPopup, HelpOverlay};
use screens::{DetailScreen, OverviewScreen, ResourceListScreen, SearchResultsScreen};

pub use layout::Layout;
pub use theme::Theme;

/// Draw the current screen plus any overlays
pub fn render(frame: &mut Frame, state: &mut AppState) {
    match state.current_screen {
        Screen::Overview => OverviewScreen::render(frame, state),
        Screen::ResourceList => ResourceListScreen::render(frame, state),
        Screen::SearchResults => SearchResultsScreen::render(frame, state),
        Screen::Detail => DetailScreen::render(frame, state),
    }

    if state.ui_state.help_visible {
        HelpOverlay::render(frame);
    }

    if let Some(msg) = &state.ui_state.error_message {
        ErrorPopup::render(frame, msg);
    }
}
