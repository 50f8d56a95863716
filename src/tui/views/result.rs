//! Result panel: last valuation and share link

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

use crate::display::format_valuation_details;
use crate::tui::app::App;

use super::Palette;

/// Render the result panel
pub fn render(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let block = palette.panel("Result", false);
    let mut lines: Vec<Line> = Vec::new();

    match &app.last_valuation {
        Some((input, valuation)) => {
            let details =
                format_valuation_details(input, valuation, app.engine.high_value_threshold());
            for (i, text) in details.lines().enumerate() {
                let style = if i == 0 {
                    Style::default()
                        .fg(palette.accent)
                        .add_modifier(Modifier::BOLD)
                } else if text.starts_with("***") {
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                lines.push(Line::from(Span::styled(text.to_string(), style)));
            }
        }
        None => lines.push(Line::from(Span::styled(
            "Fill in the form and press Enter",
            Style::default().fg(palette.muted),
        ))),
    }

    if let Some(link) = &app.share_link {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            "Share link:",
            Style::default().fg(palette.muted),
        )));
        lines.push(Line::from(link.as_str()));
    }

    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        area,
    );
}
