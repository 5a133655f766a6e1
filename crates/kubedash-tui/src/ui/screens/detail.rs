use std::collections::BTreeMap;

use kubedash_types::{Kind, NormalizedRecord};
use ratatui::{
    Frame,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use super::{render_header, render_status_bar};
use crate::{
    app::{AppState, DetailPage},
    ui::{Layout, Theme, components::HintSet},
};

/// Scrollable detail page of a single resource
pub struct DetailScreen;

impl DetailScreen {
    pub fn render(frame: &mut Frame, state: &mut AppState) {
        let (header_area, content_area, status_area) = Layout::main(frame.area());

        let subtitle = state
            .detail
            .as_ref()
            .map(|d| format!("{} {}", d.detail.record.kind, d.detail.record.name))
            .unwrap_or_else(|| "Detail".to_string());
        render_header(frame, header_area, state, &subtitle);

        let lines = state.detail.as_ref().map(Self::lines).unwrap_or_default();
        let body = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((state.ui_state.detail_scroll, 0))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Theme::border_focused())
                    .title(Span::styled(format!(" {} ", subtitle), Theme::title())),
            );
        frame.render_widget(body, content_area);

        render_status_bar(frame, status_area, state, HintSet::Detail, String::new());
    }

    /// Flatten a detail page into display lines
    pub fn lines(page: &DetailPage) -> Vec<Line<'static>> {
        let detail = &page.detail;
        let record = &detail.record;
        let mut lines = Vec::new();

        Self::heading(&mut lines, "Overview");
        Self::pair(&mut lines, "Kind", record.kind.to_string());
        Self::pair(&mut lines, "Name", record.name.clone());
        Self::pair(&mut lines, "Namespace", record.namespace.clone());
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<24}", "Status"), Theme::text_dim()),
            Span::styled(record.status.clone(), Theme::status(&record.status)),
        ]));
        if let Some(created) = &detail.created {
            Self::pair(&mut lines, "Created", created.clone());
        }
        for (key, value) in &record.attributes {
            Self::pair(&mut lines, key, value.to_string());
        }
        for owner in &record.owner_references {
            Self::pair(&mut lines, "Owner", format!("{}/{}", owner.kind, owner.name));
        }

        Self::map(&mut lines, "Labels", &detail.labels);
        Self::map(&mut lines, "Annotations", &detail.annotations);

        for section in &detail.sections {
            Self::heading(&mut lines, &section.title);
            if section.entries.is_empty() {
                lines.push(Line::from(Span::styled("  <none>", Theme::text_dim())));
            }
            for (key, value) in &section.entries {
                Self::pair(&mut lines, key, value.clone());
            }
        }

        if record.kind == Kind::Pod {
            Self::events(&mut lines, &page.events);
        }

        lines
    }

    fn heading(lines: &mut Vec<Line<'static>>, title: &str) {
        if !lines.is_empty() {
            lines.push(Line::from(""));
        }
        lines.push(Line::from(Span::styled(title.to_string(), Theme::section())));
    }

    fn pair(lines: &mut Vec<Line<'static>>, key: &str, value: String) {
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<24}", key), Theme::text_dim()),
            Span::styled(value, Theme::text()),
        ]));
    }

    fn map(lines: &mut Vec<Line<'static>>, title: &str, entries: &BTreeMap<String, String>) {
        Self::heading(lines, title);
        if entries.is_empty() {
            lines.push(Line::from(Span::styled("  <none>", Theme::text_dim())));
        }
        for (key, value) in entries {
            Self::pair(lines, key, value.clone());
        }
    }

    fn events(lines: &mut Vec<Line<'static>>, events: &[NormalizedRecord]) {
        Self::heading(lines, "Events");
        if events.is_empty() {
            lines.push(Line::from(Span::styled("  <none>", Theme::text_dim())));
        }
        for event in events {
            lines.push(Line::from(vec![
                Span::styled(format!("  {:<8}", event.status), Theme::status(&event.status)),
                Span::styled(format!("{:<24}", event.attr_display("reason")), Theme::text_highlight()),
                Span::styled(event.attr_display("message"), Theme::text()),
                Span::styled(format!("  ({})", event.attr_display("last_seen")), Theme::text_dim()),
            ]));
        }
    }
}
