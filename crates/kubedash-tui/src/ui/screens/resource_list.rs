use ratatui::Frame;

use super::{namespace_scope, render_header, render_status_bar};
use crate::{
    app::{AppState, Listing, View},
    ui::{
        Layout,
        components::{HintSet, RecordTable},
    },
};

/// Table of the view chosen on the overview
pub struct ResourceListScreen;

impl ResourceListScreen {
    pub fn render(frame: &mut Frame, state: &mut AppState) {
        let (header_area, content_area, status_area) = Layout::main(frame.area());

        let title = state.current_view.map(|v| v.title()).unwrap_or("Resources");
        render_header(frame, header_area, state, title);

        let table = match (&state.listing, state.current_view) {
            (Listing::Records(records), Some(View::Resources(kind))) => {
                RecordTable::records(title, kind, records)
            }
            (Listing::Records(records), _) => RecordTable::search_results(title, records),
            (Listing::Bindings(bindings), _) => RecordTable::bindings(title, bindings),
            (Listing::Usage(usage), view) => {
                RecordTable::usage(title, usage, view == Some(View::TopPods))
            }
        };
        frame.render_stateful_widget(table, content_area, &mut state.ui_state.table_state);

        let right = match state.current_view {
            Some(view) if view.is_namespaced() => namespace_scope(state),
            _ => "cluster-wide".to_string(),
        };
        let hints = HintSet::List {
            scoped: state.namespace.is_some(),
        };
        render_status_bar(frame, status_area, state, hints, right);
    }
}
