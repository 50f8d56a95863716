//! Toast notification widget
//!
//! Draws the queue's shown entries as a stack in one corner. Entries that
//! are fading out are dimmed; once their fade completes the loop reports it
//! back to the queue.

use std::time::Instant;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

use crate::notify::{NotificationQueue, Severity, StackAnchor, ToastEntry};

const TOAST_WIDTH: u16 = 44;
const TOAST_HEIGHT: u16 = 3;

/// Get the color for a severity
pub fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Info => Color::Blue,
        Severity::Success => Color::Green,
        Severity::Warning => Color::Yellow,
        Severity::Error => Color::Red,
    }
}

/// Get the icon/prefix for a severity
pub fn severity_icon(severity: Severity) -> &'static str {
    match severity {
        Severity::Info => "i",
        Severity::Success => "+",
        Severity::Warning => "!",
        Severity::Error => "x",
    }
}

pub fn severity_title(severity: Severity) -> &'static str {
    match severity {
        Severity::Info => "Info",
        Severity::Success => "Success",
        Severity::Warning => "Warning",
        Severity::Error => "Error",
    }
}

/// Widget for rendering one toast
pub struct ToastWidget<'a> {
    entry: &'a ToastEntry,
    /// 0.0 (gone) to 1.0 (fully shown)
    opacity: f64,
}

impl<'a> ToastWidget<'a> {
    pub fn new(entry: &'a ToastEntry, opacity: f64) -> Self {
        Self { entry, opacity }
    }
}

impl Widget for ToastWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let color = severity_color(self.entry.severity);
        let icon = severity_icon(self.entry.severity);
        let title = severity_title(self.entry.severity);

        let mut border = Style::default().fg(color);
        let mut text = Style::default().fg(Color::White);
        let mut title_style = Style::default().fg(color).add_modifier(Modifier::BOLD);
        if self.opacity < 1.0 {
            border = border.add_modifier(Modifier::DIM);
            text = text.add_modifier(Modifier::DIM);
            title_style = title_style.add_modifier(Modifier::DIM);
        }
        if self.entry.severity.is_assertive() && self.opacity >= 1.0 {
            text = text.add_modifier(Modifier::BOLD);
        }

        Clear.render(area, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(format!(" {} {} ", icon, title))
            .title_style(title_style);

        Paragraph::new(self.entry.message.as_str())
            .style(text)
            .block(block)
            .render(area, buf);
    }
}

/// All shown toasts, stacked from the queue's anchor corner
pub struct NotificationStack<'a> {
    queue: &'a NotificationQueue,
    now: Instant,
}

impl<'a> NotificationStack<'a> {
    pub fn new(queue: &'a NotificationQueue, now: Instant) -> Self {
        Self { queue, now }
    }
}

impl Widget for NotificationStack<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let width = TOAST_WIDTH.min(area.width);
        if width == 0 || area.height < TOAST_HEIGHT {
            return;
        }
        let x = area.x + area.width - width;
        let anchor = self
            .queue
            .surface()
            .map(|surface| surface.anchor)
            .unwrap_or_default();
        let fade = self.queue.config().fade_duration;

        // Newest sits nearest the anchor edge
        let entries: Vec<&ToastEntry> = self.queue.visible().collect();
        for (slot, entry) in entries.iter().rev().enumerate() {
            let offset = (slot as u16).saturating_mul(TOAST_HEIGHT);
            if offset + TOAST_HEIGHT > area.height {
                break;
            }
            let y = match anchor {
                StackAnchor::BottomRight => area.y + area.height - TOAST_HEIGHT - offset,
                StackAnchor::TopRight => area.y + offset,
            };
            let rect = Rect::new(x, y, width, TOAST_HEIGHT);
            ToastWidget::new(entry, entry.opacity(self.now, fade)).render(rect, buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn test_severity_styles() {
        assert_eq!(severity_color(Severity::Info), Color::Blue);
        assert_eq!(severity_color(Severity::Success), Color::Green);
        assert_eq!(severity_color(Severity::Warning), Color::Yellow);
        assert_eq!(severity_color(Severity::Error), Color::Red);
        assert_eq!(severity_title(Severity::Error), "Error");
    }

    #[test]
    fn test_stack_draws_newest_at_bottom() {
        let now = Instant::now();
        let mut queue = NotificationQueue::new();
        queue.enqueue_at("first", Severity::Info, Duration::from_secs(3), now);
        queue.enqueue_at("second", Severity::Success, Duration::from_secs(3), now);
        queue.on_frame(now);

        let area = Rect::new(0, 0, 60, 10);
        let mut buf = Buffer::empty(area);
        NotificationStack::new(&queue, now).render(area, &mut buf);

        // Bottom toast occupies rows 7..10, its message on row 8
        assert!(row_text(&buf, 8).contains("second"));
        assert!(row_text(&buf, 5).contains("first"));
    }

    #[test]
    fn test_top_right_stack_grows_downward() {
        let now = Instant::now();
        let mut queue = NotificationQueue::with_config(crate::notify::QueueConfig {
            anchor: StackAnchor::TopRight,
            ..Default::default()
        });
        queue.enqueue_at("first", Severity::Info, Duration::from_secs(3), now);
        queue.enqueue_at("second", Severity::Success, Duration::from_secs(3), now);
        queue.on_frame(now);

        let area = Rect::new(0, 0, 60, 10);
        let mut buf = Buffer::empty(area);
        NotificationStack::new(&queue, now).render(area, &mut buf);

        // Newest in rows 0..3, the older one below it
        assert!(row_text(&buf, 1).contains("second"));
        assert!(row_text(&buf, 4).contains("first"));
    }

    #[test]
    fn test_created_entries_are_not_drawn() {
        let now = Instant::now();
        let mut queue = NotificationQueue::new();
        queue.enqueue_at("pending", Severity::Info, Duration::from_secs(3), now);

        let area = Rect::new(0, 0, 60, 6);
        let mut buf = Buffer::empty(area);
        NotificationStack::new(&queue, now).render(area, &mut buf);

        assert!((0..area.height).all(|y| !row_text(&buf, y).contains("pending")));
    }
}
