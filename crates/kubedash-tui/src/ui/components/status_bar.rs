use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::Widget,
};
use unicode_width::UnicodeWidthStr;

use crate::ui::Theme;

const HINT_GAP: &str = "  ";

/// Which keys a screen advertises in its status bar
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HintSet {
    Overview,
    /// Resource table; `scoped` adds the key that drops the namespace scope
    List { scoped: bool },
    SearchResults,
    Detail,
    /// The search bar has focus, so only its own keys apply
    SearchInput,
}

impl HintSet {
    pub fn hints(self) -> Vec<(&'static str, &'static str)> {
        match self {
            HintSet::Overview => vec![
                ("↑/k", "Up"),
                ("↓/j", "Down"),
                ("Enter", "Open"),
                ("/", "Search"),
                ("r", "Refresh"),
                ("?", "Help"),
                ("q", "Quit"),
            ],
            HintSet::List { scoped } => {
                let mut hints = vec![("↑↓", "Move"), ("Enter", "Details"), ("/", "Search")];
                if scoped {
                    hints.push(("a", "All namespaces"));
                }
                hints.extend([("r", "Refresh"), ("Esc", "Back"), ("q", "Quit")]);
                hints
            }
            HintSet::SearchResults => vec![
                ("↑↓", "Move"),
                ("Enter", "Details"),
                ("/", "New search"),
                ("Esc", "Back"),
                ("q", "Quit"),
            ],
            HintSet::Detail => vec![
                ("↑↓", "Scroll"),
                ("PgUp/PgDn", "Page"),
                ("g", "Top"),
                ("r", "Refresh"),
                ("Esc", "Back"),
            ],
            HintSet::SearchInput => vec![("Enter", "Search all kinds"), ("Esc", "Cancel")],
        }
    }
}

/// Status bar showing keyboard shortcuts on the left and context on the right.
/// Hints that do not fit are dropped whole, from the end.
pub struct StatusBar {
    hints: Vec<(&'static str, &'static str)>,
    right_text: Option<String>,
}

impl StatusBar {
    pub fn new(set: HintSet) -> Self {
        Self {
            hints: set.hints(),
            right_text: None,
        }
    }

    pub fn right<S: Into<String>>(mut self, text: S) -> Self {
        self.right_text = Some(text.into()).filter(|t| !t.is_empty());
        self
    }

    fn hint_spans(&self, max_width: usize) -> Vec<Span<'static>> {
        let mut spans = Vec::new();
        let mut used = 0;

        for (key, desc) in &self.hints {
            let gap = if spans.is_empty() { "" } else { HINT_GAP };
            let key = format!("{}[{}]", gap, key);
            let desc = format!(" {}", desc);
            let width = key.width() + desc.width();
            if used + width > max_width {
                break;
            }
            used += width;
            spans.push(Span::styled(key, Theme::status_bar_key()));
            spans.push(Span::styled(desc, Theme::status_bar()));
        }

        spans
    }
}

impl Widget for StatusBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, Theme::status_bar());

        let inner = area.width.saturating_sub(2) as usize;
        let right_width = self.right_text.as_ref().map_or(0, |t| t.width());
        let room = if right_width > 0 {
            inner.saturating_sub(right_width + HINT_GAP.len())
        } else {
            inner
        };

        let line = Line::from(self.hint_spans(room));
        buf.set_line(area.x + 1, area.y, &line, inner as u16);

        if let Some(right) = self.right_text.filter(|_| right_width <= inner) {
            let x = area.x + 1 + (inner - right_width) as u16;
            let span = Span::styled(right, Theme::status_bar());
            buf.set_span(x, area.y, &span, right_width as u16);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(bar: StatusBar, width: u16) -> String {
        let area = Rect::new(0, 0, width, 1);
        let mut buf = Buffer::empty(area);
        bar.render(area, &mut buf);
        (0..width).map(|x| buf[(x, 0)].symbol()).collect()
    }

    #[test]
    fn test_scoped_list_offers_all_namespaces() {
        let scoped = HintSet::List { scoped: true }.hints();
        let unscoped = HintSet::List { scoped: false }.hints();

        assert!(scoped.contains(&("a", "All namespaces")));
        assert!(!unscoped.iter().any(|(key, _)| *key == "a"));
        assert_eq!(scoped.last(), Some(&("q", "Quit")));
    }

    #[test]
    fn test_search_input_only_shows_its_keys() {
        let keys: Vec<_> = HintSet::SearchInput.hints().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["Enter", "Esc"]);
    }

    #[test]
    fn test_renders_hints_and_right_text() {
        let line = rendered(StatusBar::new(HintSet::SearchInput).right("ns: web"), 60);

        assert!(line.starts_with(" [Enter] Search all kinds  [Esc] Cancel"));
        assert!(line.trim_end().ends_with("ns: web"));
    }

    #[test]
    fn test_narrow_bar_drops_whole_hints() {
        let line = rendered(StatusBar::new(HintSet::Detail).right("x"), 30);

        assert!(line.contains("[↑↓] Scroll"));
        // No hint is cut mid-word
        assert!(!line.contains("[Esc]"));
        assert!(!line.contains("[E"));
        assert!(line.trim_end().ends_with('x'));
    }
}
