//! Layout calculations for the inventory TUI

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// The main layout areas
pub struct AppLayout {
    pub title_area: Rect,
    pub sheet_area: Rect,
    pub purse_area: Rect,
    pub inventory_area: Rect,
    pub notes_area: Rect,
    pub output_area: Rect,
    pub status_bar: Rect,
    pub hotkey_bar: Rect,
    pub input_area: Rect,
}

impl AppLayout {
    /// Calculate layout based on terminal size
    pub fn calculate(area: Rect) -> Self {
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Title bar
                Constraint::Min(12),   // Main content
                Constraint::Length(1), // Status bar
                Constraint::Length(1), // Hotkey bar
                Constraint::Length(3), // Input area
            ])
            .split(area);

        // Sidebar on the left, inventory and panels on the right
        let content_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
            .split(main_chunks[1]);

        let sidebar_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(10), Constraint::Length(7)])
            .split(content_chunks[0]);

        let right_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(content_chunks[1]);

        let lower_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(right_chunks[1]);

        Self {
            title_area: main_chunks[0],
            sheet_area: sidebar_chunks[0],
            purse_area: sidebar_chunks[1],
            inventory_area: right_chunks[0],
            notes_area: lower_chunks[0],
            output_area: lower_chunks[1],
            status_bar: main_chunks[2],
            hotkey_bar: main_chunks[3],
            input_area: main_chunks[4],
        }
    }
}

/// Calculate fixed-size centered popup
pub fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;

    Rect::new(x, y, width.min(area.width), height.min(area.height))
}
