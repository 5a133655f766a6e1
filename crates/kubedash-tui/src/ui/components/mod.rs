mod error_popup;
mod help_overlay;
mod list_selector;
mod record_table;
mod search_bar;
mod status_bar;

pub use error_popup::ErrorPopup;
pub use help_overlay::HelpOverlay;
pub use list_selector::{ListSelector, ListSelectorExt};
pub use record_table::{Column, RecordTable, columns};
pub use search_bar::SearchBar;
pub use status_bar::{HintSet, StatusBar};
