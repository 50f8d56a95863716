//! TUI Views module
//!
//! Contains the calculator form, the result panel, the status bar and the
//! high-value banner, plus the toast overlay drawn on top.

pub mod celebration;
pub mod form;
pub mod result;
pub mod status_bar;

use std::time::Instant;

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::config::Theme;

use super::app::App;
use super::layout::AppLayout;
use super::widgets::NotificationStack;

/// Colors for one theme
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub fg: Color,
    pub bg: Color,
    pub accent: Color,
    pub muted: Color,
    pub border: Color,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self {
                fg: Color::Black,
                bg: Color::White,
                accent: Color::Blue,
                muted: Color::DarkGray,
                border: Color::Gray,
            },
            Theme::Dark => Self {
                fg: Color::White,
                bg: Color::Black,
                accent: Color::Cyan,
                muted: Color::Gray,
                border: Color::DarkGray,
            },
        }
    }

    pub fn base(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    pub fn panel(&self, title: &str, focused: bool) -> Block<'static> {
        let border = if focused { self.accent } else { self.border };
        Block::default()
            .title(format!(" {} ", title))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
    }
}

/// Render the entire application
pub fn render(frame: &mut Frame, app: &App) {
    let now = Instant::now();
    let palette = Palette::for_theme(app.theme);
    let area = frame.area();
    frame.render_widget(Block::default().style(palette.base()), area);

    let layout = AppLayout::new(area);

    render_header(frame, &palette, layout.header);
    form::render(frame, app, &palette, layout.form);
    result::render(frame, app, &palette, layout.result);
    status_bar::render(frame, app, &palette, layout.status_bar);

    if app.is_celebrating(now) {
        celebration::render(frame, app, layout.overlay);
    }

    frame.render_widget(NotificationStack::new(&app.notifications, now), layout.overlay);
}

fn render_header(frame: &mut Frame, palette: &Palette, area: Rect) {
    let title = Line::from(vec![
        Span::styled(
            "Residual",
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            "  remaining value of a prepaid server",
            Style::default().fg(palette.muted),
        ),
    ]);
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(palette.border));
    frame.render_widget(Paragraph::new(title).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ResidualPaths, Settings};
    use crate::models::Currency;
    use chrono::NaiveDate;
    use ratatui::{backend::TestBackend, Terminal};
    use tempfile::TempDir;

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    fn test_app(temp_dir: &TempDir) -> App {
        let paths = ResidualPaths::with_base_dir(temp_dir.path().to_path_buf());
        let settings = Settings {
            theme: Some(Theme::Dark),
            default_currency: Currency::Usd,
            ..Settings::default()
        };
        App::new(settings, paths, NaiveDate::from_ymd_opt(2025, 6, 30).unwrap())
    }

    #[test]
    fn test_render_empty_form() {
        let temp_dir = TempDir::new().unwrap();
        let app = test_app(&temp_dir);
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();

        terminal.draw(|frame| render(frame, &app)).unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("Residual"));
        assert!(text.contains("< USD >"));
        assert!(text.contains("2025-06-30"));
        assert!(text.contains("press Enter"));
    }

    #[test]
    fn test_render_result_and_banner() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = test_app(&temp_dir);
        let today = NaiveDate::from_ymd_opt(2025, 6, 30).unwrap();
        let now = Instant::now();
        app.form.amount.set_content("1000");
        app.form.rate.set_content("7.2");
        app.form.expiry.set_content("2025-12-31");
        app.calculate(today, now);
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();

        terminal.draw(|frame| render(frame, &app)).unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("Remaining value: 3629.59 CNY"));
        assert!(text.contains("High value!"));
    }
}
