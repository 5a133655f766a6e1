use ratatui::{
    Frame,
    layout::{Position, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use unicode_width::UnicodeWidthStr;

use crate::ui::Theme;

/// Single-line query input drawn in place of a screen header
pub struct SearchBar;

impl SearchBar {
    pub fn render(frame: &mut Frame, area: Rect, input: &str) {
        let prompt = "Search: ";
        let line = Line::from(vec![
            Span::styled(prompt, Theme::text_highlight()),
            Span::styled(input, Theme::text()),
        ]);

        let bar = Paragraph::new(line).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Theme::border_focused())
                .title(Span::styled(" Search all resources ", Theme::title())),
        );
        frame.render_widget(bar, area);

        let cursor_x = area.x + 1 + (prompt.width() + input.width()) as u16;
        if cursor_x < area.right().saturating_sub(1) {
            frame.set_cursor_position(Position::new(cursor_x, area.y + 1));
        }
    }
}
