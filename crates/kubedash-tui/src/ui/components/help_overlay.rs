use ratatui::{
    Frame,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::ui::Layout;

/// Help overlay showing keybindings
pub struct HelpOverlay;

impl HelpOverlay {
    pub fn render(frame: &mut Frame) {
        let popup_area = Layout::centered_popup(frame.area(), 50, 24);

        frame.render_widget(Clear, popup_area);

        let help_text = vec![
            Line::from(Span::styled(
                "Keybindings",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled("Navigation", Style::default().fg(Color::Yellow))),
            Self::key_line("j/↓", "Move down / scroll down"),
            Self::key_line("k/↑", "Move up / scroll up"),
            Self::key_line("Enter", "Open view or resource"),
            Self::key_line("Ctrl+d", "Page down (detail)"),
            Self::key_line("Ctrl+u", "Page up (detail)"),
            Self::key_line("g", "Go to top (detail)"),
            Line::from(""),
            Line::from(Span::styled("Actions", Style::default().fg(Color::Yellow))),
            Self::key_line("/", "Search all resources"),
            Self::key_line("r", "Refresh"),
            Self::key_line("a", "Show all namespaces"),
            Self::key_line("?", "Toggle this help"),
            Self::key_line("Esc", "Go back"),
            Self::key_line("q", "Quit"),
        ];

        let help_widget = Paragraph::new(help_text).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(Span::styled(
                    " Help ",
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                )),
        );

        frame.render_widget(help_widget, popup_area);
    }

    fn key_line<'a>(key: &'a str, desc: &'a str) -> Line<'a> {
        Line::from(vec![
            Span::styled(format!("  {:>8}", key), Style::default().fg(Color::Green)),
            Span::styled(format!("  {}", desc), Style::default().fg(Color::White)),
        ])
    }
}
