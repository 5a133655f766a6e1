//! Application state and actions

mod action;
mod state;
mod view;

pub use action::Action;
pub use state::{AppState, DetailPage, Listing, Screen, UiState};
pub use view::View;
