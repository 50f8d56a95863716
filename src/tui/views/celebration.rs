//! Banner shown after a high-value result

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};

use crate::models::Currency;
use crate::tui::app::App;
use crate::tui::layout::centered_rect_fixed;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some((_, valuation)) = &app.last_valuation else {
        return;
    };
    let rect = centered_rect_fixed(46, 5, area);
    let style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(style);
    let text = vec![
        Line::from("High value!"),
        Line::from(format!(
            "{:.2} {} of service remains",
            valuation.result.remaining_value,
            Currency::LOCAL
        )),
    ];

    frame.render_widget(Clear, rect);
    frame.render_widget(
        Paragraph::new(text)
            .style(style)
            .alignment(Alignment::Center)
            .block(block),
        rect,
    );
}
