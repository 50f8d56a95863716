//! Layout definitions for the TUI
//!
//! Defines the overall layout structure: header, form and result panels,
//! status bar.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Layout regions for the TUI
pub struct AppLayout {
    /// Title area
    pub header: Rect,
    /// Calculator form
    pub form: Rect,
    /// Last result and share link
    pub result: Rect,
    /// Status bar at the bottom
    pub status_bar: Rect,
    /// Everything between header and status bar, where toasts float
    pub overlay: Rect,
}

impl AppLayout {
    /// Calculate layout from available area
    pub fn new(area: Rect) -> Self {
        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(10),   // Panels
                Constraint::Length(1), // Status bar
            ])
            .split(area);

        // Side by side when wide, stacked when narrow
        let direction = if vertical[1].width >= 90 {
            Direction::Horizontal
        } else {
            Direction::Vertical
        };
        let panels = Layout::default()
            .direction(direction)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(vertical[1]);

        Self {
            header: vertical[0],
            form: panels[0],
            result: panels[1],
            status_bar: vertical[2],
            overlay: vertical[1],
        }
    }
}

/// Create a fixed-size centered rect for banners
pub fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}
