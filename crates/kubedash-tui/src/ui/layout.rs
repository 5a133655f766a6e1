use ratatui::layout::{Constraint, Direction, Layout as RatatuiLayout, Rect};

/// Layout helper for consistent screen layouts
pub struct Layout;

impl Layout {
    /// Create the main layout with header, content, and status bar
    pub fn main(area: Rect) -> (Rect, Rect, Rect) {
        let chunks = RatatuiLayout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(1),    // Content
                Constraint::Length(1), // Status bar
            ])
            .split(area);

        (chunks[0], chunks[1], chunks[2])
    }

    /// Split the overview content into the summary panel and the view menu
    pub fn overview(area: Rect) -> (Rect, Rect) {
        let chunks = RatatuiLayout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(area);

        (chunks[0], chunks[1])
    }

    /// A popup of at most `width` x `height` centered in `area`
    pub fn centered_popup(area: Rect, width: u16, height: u16) -> Rect {
        let width = width.min(area.width.saturating_sub(4));
        let height = height.min(area.height.saturating_sub(4));
        let x = area.x + area.width.saturating_sub(width) / 2;
        let y = area.y + area.height.saturating_sub(height) / 2;
        Rect::new(x, y, width, height)
    }
}
