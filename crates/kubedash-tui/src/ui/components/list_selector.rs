use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, StatefulWidget},
};

use crate::ui::Theme;

/// A titled, selectable list
pub struct ListSelector<'a> {
    items: Vec<ListItem<'a>>,
    title: &'a str,
    highlight_symbol: &'a str,
}

impl<'a> ListSelector<'a> {
    pub fn new(title: &'a str) -> Self {
        Self {
            items: Vec::new(),
            title,
            highlight_symbol: "▶ ",
        }
    }

    /// Add items from an iterator of (label, hint) tuples; the hint is dimmed
    pub fn items<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = (S, Option<String>)>,
        S: Into<String>,
    {
        self.items = items
            .into_iter()
            .map(|(text, hint)| {
                let mut spans = vec![Span::styled(text.into(), Theme::list_item())];
                if let Some(hint) = hint {
                    spans.push(Span::styled(format!("  {}", hint), Theme::text_dim()));
                }
                ListItem::new(Line::from(spans))
            })
            .collect();
        self
    }
}

impl StatefulWidget for ListSelector<'_> {
    type State = ListState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Theme::border_focused())
            .title(Span::styled(self.title, Theme::title()));

        let list = List::new(self.items)
            .block(block)
            .highlight_style(Theme::list_item_selected())
            .highlight_symbol(self.highlight_symbol);

        StatefulWidget::render(list, area, buf, state);
    }
}

/// Extension trait to render ListSelector more easily
pub trait ListSelectorExt {
    fn render_list_selector(&mut self, area: Rect, selector: ListSelector, state: &mut ListState);
}

impl ListSelectorExt for ratatui::Frame<'_> {
    fn render_list_selector(&mut self, area: Rect, selector: ListSelector, state: &mut ListState) {
        self.render_stateful_widget(selector, area, state);
    }
}
