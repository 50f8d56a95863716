//! Toast notifications
//!
//! A small state machine for transient messages. Rendering lives in
//! `tui::widgets::notification`; nothing here depends on a terminal.

pub mod queue;
pub mod toast;

pub use queue::{NotificationQueue, QueueConfig};
pub use toast::{
    HideReason, RemovalCause, Severity, StackAnchor, ToastEntry, ToastEvent, ToastPhase,
    ToastSurface, TransitionProperty,
};
