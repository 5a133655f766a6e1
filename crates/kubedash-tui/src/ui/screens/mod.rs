mod detail;
mod overview;
mod resource_list;
mod search_results;

pub use detail::DetailScreen;
pub use overview::OverviewScreen;
pub use resource_list::ResourceListScreen;
pub use search_results::SearchResultsScreen;

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::{
    app::AppState,
    ui::{
        Theme,
        components::{HintSet, SearchBar, StatusBar},
    },
};

/// Header shared by every screen; replaced by the search bar while typing
fn render_header(frame: &mut Frame, area: Rect, state: &AppState, subtitle: &str) {
    if state.ui_state.search_active {
        SearchBar::render(frame, area, &state.ui_state.search_input);
        return;
    }

    let cluster_name = state
        .summary
        .as_ref()
        .map(|s| s.cluster_name.as_str())
        .unwrap_or(state.cluster_name.as_str());

    let title = Line::from(vec![
        Span::styled("kubedash", Theme::title()),
        Span::styled(" │ ", Theme::text_dim()),
        Span::styled(cluster_name, Theme::text_highlight()),
        Span::styled(" │ ", Theme::text_dim()),
        Span::styled(subtitle, Theme::text()),
    ]);

    let header = Paragraph::new(title).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Theme::border()),
    );

    frame.render_widget(header, area);
}

/// Status bar for a screen; the search bar's keys take over while it has focus
fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState, hints: HintSet, right: String) {
    let hints = if state.ui_state.search_active {
        HintSet::SearchInput
    } else {
        hints
    };
    let right = match &state.ui_state.loading {
        Some(what) => format!("Loading {}…", what),
        None => right,
    };
    frame.render_widget(StatusBar::new(hints).right(right), area);
}

fn namespace_scope(state: &AppState) -> String {
    match &state.namespace {
        Some(ns) => format!("ns: {}", ns),
        None => "ns: all".to_string(),
    }
}
