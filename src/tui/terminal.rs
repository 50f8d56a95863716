//! Terminal setup and teardown
//!
//! This module handles initializing and restoring the terminal state,
//! including setting up the panic hook to restore the terminal on crash.
//! It also owns the runtime that performs exchange-rate fetches.

use anyhow::Result;
use chrono::Local;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::panic;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::config::{ResidualPaths, Settings};
use crate::services::RateClient;

use super::app::App;
use super::event::{Event, EventHandler};
use super::handler::handle_event;

/// Type alias for our terminal
pub type Tui = Terminal<CrosstermBackend<Stdout>>;

const TICK_RATE: Duration = Duration::from_millis(100);

/// Initialize the terminal for TUI mode
pub fn init_terminal() -> Result<Tui> {
    // Set up panic hook to restore terminal on panic
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Restore terminal before printing panic info
        let _ = restore_terminal_impl();
        original_hook(panic_info);
    }));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;

    Ok(terminal)
}

/// Restore the terminal to its original state
pub fn restore_terminal() -> Result<()> {
    restore_terminal_impl()?;
    Ok(())
}

fn restore_terminal_impl() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}

/// Run the TUI application, optionally prefilled from a share link
pub fn run_tui(settings: Settings, paths: ResidualPaths, link: Option<&str>) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()?;
    let client = RateClient::from_env()?;

    let mut app = App::new(settings, paths, Local::now().date_naive());
    if let Some(link) = link {
        app.load_link(link, Local::now().date_naive(), Instant::now());
    }
    app.request_rate();

    let mut terminal = init_terminal()?;
    let events = EventHandler::new(TICK_RATE);
    let sender = events.sender();
    let mut in_flight: Option<JoinHandle<()>> = None;
    info!("tui started");

    let outcome = (|| -> Result<()> {
        loop {
            terminal.draw(|frame| super::views::render(frame, &app))?;
            app.after_frame(Instant::now());

            if let Some(ticket) = app.take_fetch_request() {
                if let Some(previous) = in_flight.take() {
                    previous.abort();
                }
                debug!(currency = %ticket.currency(), "spawning exchange-rate fetch");
                let client = client.clone();
                let sender = sender.clone();
                in_flight = Some(runtime.spawn(async move {
                    let result = client.fetch_quote(ticket.currency()).await;
                    // The UI may already be gone
                    let _ = sender.send(Event::RateFetched(ticket, result));
                }));
            }

            let event = events.next()?;
            handle_event(&mut app, event)?;

            if app.should_quit {
                return Ok(());
            }
        }
    })();

    if let Some(previous) = in_flight.take() {
        previous.abort();
    }
    restore_terminal()?;
    info!("tui stopped");

    outcome
}
