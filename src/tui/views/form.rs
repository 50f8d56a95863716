//! Calculator form view

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::display::format_rate_quote;
use crate::tui::app::App;
use crate::tui::form::FormField;
use crate::tui::widgets::TextInput;

use super::Palette;

/// Render the form panel
pub fn render(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let block = palette.panel("Calculator", true);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let form = &app.form;
    let mut y = inner.y;
    for field in FormField::ALL {
        if y >= inner.y + inner.height {
            return;
        }
        let row = Rect::new(inner.x + 1, y, inner.width.saturating_sub(1), 1);
        match field {
            FormField::Currency => render_select(
                frame,
                palette,
                row,
                "Currency",
                &form.currency.to_string(),
                form.focused == field,
            ),
            FormField::Cycle => render_select(
                frame,
                palette,
                row,
                "Cycle",
                &form.cycle.to_string(),
                form.focused == field,
            ),
            FormField::Amount => render_input(frame, &form.amount, row),
            FormField::Rate => render_input(frame, &form.rate, row),
            FormField::Expiry => render_input(frame, &form.expiry, row),
            FormField::Transaction => render_input(frame, &form.transaction, row),
        }
        y += 1;
    }

    let info_top = y + 1;
    if info_top >= inner.y + inner.height {
        return;
    }
    let info = Rect::new(
        inner.x + 1,
        info_top,
        inner.width.saturating_sub(1),
        inner.y + inner.height - info_top,
    );

    let muted = Style::default().fg(palette.muted);
    let rate_line = if form.currency.is_local() {
        format!("{} is the local currency", form.currency)
    } else if app.rates.is_pending() {
        format!("Fetching {} rate...", form.currency)
    } else {
        match app.rates.current() {
            Some(quote) if quote.currency == form.currency => format_rate_quote(quote),
            _ => "No rate loaded (Ctrl-R to fetch)".to_string(),
        }
    };
    let days_line = match form.preview_remaining_days() {
        Some(days) => format!("Remaining days: {}", days),
        None => "Remaining days: -".to_string(),
    };

    let lines = vec![
        Line::from(Span::styled(rate_line, muted)),
        Line::from(Span::styled(days_line, muted)),
    ];
    frame.render_widget(Paragraph::new(lines), info);
}

fn render_input(frame: &mut Frame, input: &TextInput, area: Rect) {
    frame.render_widget(input, area);
}

fn render_select(
    frame: &mut Frame,
    palette: &Palette,
    area: Rect,
    label: &str,
    value: &str,
    focused: bool,
) {
    let value_style = if focused {
        Style::default()
            .fg(palette.accent)
            .add_modifier(Modifier::BOLD | Modifier::REVERSED)
    } else {
        Style::default()
    };
    let line = Line::from(vec![
        Span::styled(
            format!("{:<12}", format!("{}: ", label)),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(format!("< {} >", value), value_style),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
