use ratatui::{
    Frame,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::ui::{Layout, Theme};

/// Error message shown over the current screen until dismissed
pub struct ErrorPopup;

impl ErrorPopup {
    pub fn render(frame: &mut Frame, message: &str) {
        let popup_area = Layout::centered_popup(frame.area(), 60, 8);

        frame.render_widget(Clear, popup_area);

        let text = vec![
            Line::from(Span::styled(message, Theme::text())),
            Line::from(""),
            Line::from(Span::styled("Press any key to dismiss", Theme::text_dim())),
        ];

        let popup = Paragraph::new(text).wrap(Wrap { trim: true }).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Theme::error())
                .title(Span::styled(" Error ", Theme::error())),
        );

        frame.render_widget(popup, popup_area);
    }
}
