//! Terminal User Interface module
//!
//! An interactive calculator built on ratatui: a form for the subscription
//! details, a result panel, and toast notifications stacked in a corner.

pub mod app;
pub mod event;
pub mod form;
pub mod handler;
pub mod layout;
pub mod terminal;

// Views
pub mod views;

// Widgets
pub mod widgets;

pub use app::App;
pub use terminal::run_tui;
