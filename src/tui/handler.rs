//! Event handler for the TUI
//!
//! Routes keyboard events to form editing and app actions, and feeds
//! ticks and completed fetches into the app state.

use std::time::Instant;

use anyhow::Result;
use chrono::{Local, NaiveDate};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::app::App;
use super::event::Event;

/// Handle an incoming event
pub fn handle_event(app: &mut App, event: Event) -> Result<()> {
    let now = Instant::now();
    match event {
        Event::Key(key) => handle_key_event(app, key, Local::now().date_naive(), now),
        Event::Mouse(_) | Event::Resize(_, _) => {}
        Event::Tick => app.on_tick(now),
        Event::RateFetched(ticket, result) => {
            app.on_rate_fetched(ticket, result, Local::now().date_naive(), now)
        }
    }
    Ok(())
}

/// Handle a key event
pub fn handle_key_event(app: &mut App, key: KeyEvent, today: NaiveDate, now: Instant) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') => app.quit(),
            KeyCode::Char('r') => app.request_rate(),
            KeyCode::Char('l') => app.build_share_link(now),
            KeyCode::Char('t') => app.toggle_theme(now),
            KeyCode::Char('x') => {
                app.notifications.dismiss_newest_at(now);
            }
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Esc => app.quit(),
        KeyCode::Tab | KeyCode::Down => app.move_focus(true, today, now),
        KeyCode::BackTab | KeyCode::Up => app.move_focus(false, today, now),
        KeyCode::Enter => app.calculate(today, now),
        KeyCode::Left | KeyCode::Right => {
            let forward = key.code == KeyCode::Right;
            if app.form.focused.is_select() {
                if app.form.cycle_select(forward) {
                    app.on_currency_changed(now);
                }
            } else if let Some(input) = app.form.focused_input() {
                if forward {
                    input.move_right();
                } else {
                    input.move_left();
                }
            }
        }
        KeyCode::Home => {
            if let Some(input) = app.form.focused_input() {
                input.move_start();
            }
        }
        KeyCode::End => {
            if let Some(input) = app.form.focused_input() {
                input.move_end();
            }
        }
        KeyCode::Backspace => {
            if let Some(input) = app.form.focused_input() {
                input.backspace();
            }
        }
        KeyCode::Delete => {
            if let Some(input) = app.form.focused_input() {
                input.delete();
            }
        }
        KeyCode::Char(c) => {
            if let Some(input) = app.form.focused_input() {
                input.insert(c);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ResidualPaths, Settings, Theme};
    use crate::models::Currency;
    use crate::tui::form::FormField;
    use tempfile::TempDir;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 30).unwrap()
    }

    fn test_app() -> (TempDir, App) {
        let temp_dir = TempDir::new().unwrap();
        let paths = ResidualPaths::with_base_dir(temp_dir.path().to_path_buf());
        let settings = Settings {
            theme: Some(Theme::Light),
            default_currency: Currency::Usd,
            ..Settings::default()
        };
        (temp_dir, App::new(settings, paths, today()))
    }

    fn press(app: &mut App, code: KeyCode, now: Instant) {
        handle_key_event(app, KeyEvent::new(code, KeyModifiers::NONE), today(), now);
    }

    fn type_text(app: &mut App, text: &str, now: Instant) {
        for c in text.chars() {
            press(app, KeyCode::Char(c), now);
        }
    }

    #[test]
    fn test_fill_form_and_calculate() {
        let (_temp, mut app) = test_app();
        let now = Instant::now();

        press(&mut app, KeyCode::Tab, now);
        assert_eq!(app.form.focused, FormField::Amount);
        type_text(&mut app, "10", now);
        press(&mut app, KeyCode::Tab, now);
        type_text(&mut app, "7.2", now);
        press(&mut app, KeyCode::Tab, now);
        press(&mut app, KeyCode::Tab, now);
        type_text(&mut app, "2025-12-31", now);
        press(&mut app, KeyCode::Enter, now);

        let (_, valuation) = app.last_valuation.unwrap();
        assert_eq!(valuation.result.remaining_value, 36.30);
    }

    #[test]
    fn test_currency_select_schedules_fetch() {
        let (_temp, mut app) = test_app();
        let now = Instant::now();

        press(&mut app, KeyCode::Right, now);
        assert_eq!(app.form.currency, Currency::Usd.next());
        assert!(app.rate_fetch_due().is_some());
    }

    #[test]
    fn test_editing_keys() {
        let (_temp, mut app) = test_app();
        let now = Instant::now();
        app.form.focused = FormField::Amount;

        type_text(&mut app, "123", now);
        press(&mut app, KeyCode::Left, now);
        press(&mut app, KeyCode::Backspace, now);
        assert_eq!(app.form.amount.value(), "13");
        press(&mut app, KeyCode::Home, now);
        press(&mut app, KeyCode::Delete, now);
        assert_eq!(app.form.amount.value(), "3");
    }

    #[test]
    fn test_control_keys() {
        let (_temp, mut app) = test_app();
        let now = Instant::now();
        let ctrl = |c| KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL);

        handle_key_event(&mut app, ctrl('r'), today(), now);
        assert!(app.take_fetch_request().is_some());

        handle_key_event(&mut app, ctrl('l'), today(), now);
        assert!(app.share_link.is_some());

        app.after_frame(now);
        handle_key_event(&mut app, ctrl('x'), today(), now);
        assert!(app.notifications.entries()[0].is_hiding());

        handle_key_event(&mut app, ctrl('c'), today(), now);
        assert!(app.should_quit);
    }

    #[test]
    fn test_escape_quits() {
        let (_temp, mut app) = test_app();
        press(&mut app, KeyCode::Esc, Instant::now());
        assert!(app.should_quit);
    }
}
