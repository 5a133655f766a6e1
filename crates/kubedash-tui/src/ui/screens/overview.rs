use kubedash_types::ClusterSummary;
use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::{namespace_scope, render_header, render_status_bar};
use crate::{
    app::{AppState, View},
    ui::{
        Layout, Theme,
        components::{HintSet, ListSelector, ListSelectorExt},
    },
};

/// Landing screen: cluster summary plus the menu of views
pub struct OverviewScreen;

impl OverviewScreen {
    pub fn render(frame: &mut Frame, state: &mut AppState) {
        let (header_area, content_area, status_area) = Layout::main(frame.area());
        let (summary_area, menu_area) = Layout::overview(content_area);

        render_header(frame, header_area, state, "Overview");
        Self::render_summary(frame, summary_area, state.summary.as_ref());
        Self::render_menu(frame, menu_area, state);
        render_status_bar(
            frame,
            status_area,
            state,
            HintSet::Overview,
            namespace_scope(state),
        );
    }

    fn render_summary(frame: &mut Frame, area: Rect, summary: Option<&ClusterSummary>) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Theme::border())
            .title(Span::styled(" Cluster ", Theme::title()));

        let Some(summary) = summary else {
            frame.render_widget(
                Paragraph::new(Span::styled("Loading cluster summary…", Theme::text_dim()))
                    .block(block),
                area,
            );
            return;
        };

        let lines = vec![
            Self::field("Cluster", summary.cluster_name.clone(), Theme::text_highlight()),
            Self::field("API server", summary.api_server_address.clone(), Theme::text()),
            Line::from(""),
            Self::field(
                "Health",
                summary.health_status.to_string(),
                Style::default().fg(summary.health_status.color()),
            ),
            Self::field(
                "Nodes",
                format!("{}/{} ready", summary.healthy_nodes, summary.total_nodes),
                Theme::text(),
            ),
            Line::from(""),
            Self::field("Namespaces", summary.total_namespaces.to_string(), Theme::text()),
            Self::field("Pods", summary.total_pods.to_string(), Theme::text()),
            Self::field("Deployments", summary.total_deployments.to_string(), Theme::text()),
            Self::field("Services", summary.total_services.to_string(), Theme::text()),
        ];

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn field(label: &str, value: String, style: Style) -> Line<'static> {
        Line::from(vec![
            Span::styled(format!("  {:<12}", label), Theme::text_dim()),
            Span::styled(value, style),
        ])
    }

    fn render_menu(frame: &mut Frame, area: Rect, state: &mut AppState) {
        let scope = state.namespace.clone();
        let items = View::MENU.iter().map(|view| {
            let hint = match (&scope, view.is_namespaced()) {
                (Some(ns), true) => Some(format!("in {}", ns)),
                _ => None,
            };
            (view.title(), hint)
        });

        let selector = ListSelector::new(" Views ").items(items);
        frame.render_list_selector(area, selector, &mut state.ui_state.list_state);
    }
}
