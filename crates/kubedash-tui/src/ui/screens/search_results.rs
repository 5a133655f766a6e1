use ratatui::Frame;

use super::{render_header, render_status_bar};
use crate::{
    app::AppState,
    ui::{
        Layout,
        components::{HintSet, RecordTable},
    },
};

/// Matches of a cluster-wide search, grouped by kind
pub struct SearchResultsScreen;

impl SearchResultsScreen {
    pub fn render(frame: &mut Frame, state: &mut AppState) {
        let (header_area, content_area, status_area) = Layout::main(frame.area());

        let subtitle = format!("Search: \"{}\"", state.search_query);
        render_header(frame, header_area, state, &subtitle);

        let table = RecordTable::search_results("Results", &state.search_results);
        frame.render_stateful_widget(table, content_area, &mut state.ui_state.table_state);

        let right = format!("{} matches", state.search_results.len());
        render_status_bar(frame, status_area, state, HintSet::SearchResults, right);
    }
}
