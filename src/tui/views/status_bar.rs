//! Status bar view
//!
//! Shows key hints and the current status message

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::tui::app::App;

use super::Palette;

const HINTS: [(&str, &str); 7] = [
    ("Tab", "next"),
    ("←/→", "change"),
    ("Enter", "calculate"),
    ("^R", "rate"),
    ("^L", "link"),
    ("^T", "theme"),
    ("Esc", "quit"),
];

/// Render the status bar
pub fn render(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let key_style = Style::default()
        .fg(palette.accent)
        .add_modifier(Modifier::BOLD);
    let hint_style = Style::default().fg(palette.muted);

    let mut spans = vec![Span::raw(" ")];
    for (key, action) in HINTS {
        spans.push(Span::styled(key, key_style));
        spans.push(Span::styled(format!(" {}  ", action), hint_style));
    }

    if let Some(message) = &app.status_message {
        spans.push(Span::raw("│ "));
        spans.push(Span::styled(message.as_str(), Style::default().fg(palette.fg)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
