//! Notification queue
//!
//! Owns every active toast and drives each one through
//! `Created → Visible → Hiding → removed` independently of the others.
//! Time is passed in explicitly by the `*_at` methods; `enqueue_raw` uses
//! `Instant::now()`.

use std::time::{Duration, Instant};

use tracing::debug;

use super::toast::{
    HideReason, RemovalCause, Severity, StackAnchor, ToastEntry, ToastEvent, ToastPhase,
    ToastSurface, TransitionProperty,
};
use crate::models::ToastId;

pub const DEFAULT_DISPLAY_DURATION: Duration = Duration::from_millis(3000);
pub const DEFAULT_FADE_DURATION: Duration = Duration::from_millis(300);
pub const DEFAULT_REMOVAL_GRACE: Duration = Duration::from_millis(700);
pub const DEFAULT_MAX_ACTIVE: usize = 5;
pub const DEFAULT_MESSAGE: &str = "Operation completed";

/// Tunables for a queue
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueueConfig {
    /// Entries allowed on screen before the oldest is evicted
    pub max_active: usize,
    pub default_duration: Duration,
    pub fade_duration: Duration,
    /// Extra time after the fade before an entry is removed without a transition-end signal
    pub removal_grace: Duration,
    pub anchor: StackAnchor,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            max_active: DEFAULT_MAX_ACTIVE,
            default_duration: DEFAULT_DISPLAY_DURATION,
            fade_duration: DEFAULT_FADE_DURATION,
            removal_grace: DEFAULT_REMOVAL_GRACE,
            anchor: StackAnchor::default(),
        }
    }
}

impl QueueConfig {
    /// Use `millis` as the default display duration; zero keeps the built-in default
    pub fn with_default_duration_ms(mut self, millis: u64) -> Self {
        if millis > 0 {
            self.default_duration = Duration::from_millis(millis);
        }
        self
    }
}

/// The set of active toasts, in insertion (stacking) order
#[derive(Debug, Default)]
pub struct NotificationQueue {
    config: QueueConfig,
    surface: Option<ToastSurface>,
    entries: Vec<ToastEntry>,
}

impl NotificationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: QueueConfig) -> Self {
        Self {
            config,
            surface: None,
            entries: Vec::new(),
        }
    }

    pub fn config(&self) -> &QueueConfig {
        &self.config
    }

    /// The container, created by the first enqueue
    pub fn surface(&self) -> Option<&ToastSurface> {
        self.surface.as_ref()
    }

    pub fn entries(&self) -> &[ToastEntry] {
        &self.entries
    }

    /// Entries that have been drawn at least once
    pub fn visible(&self) -> impl Iterator<Item = &ToastEntry> {
        self.entries
            .iter()
            .filter(|e| e.phase != ToastPhase::Created)
    }

    pub fn get(&self, id: ToastId) -> Option<&ToastEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Add an entry and arm its display timer
    ///
    /// The entry starts in `Created` and becomes visible on the next frame.
    pub fn enqueue_at(
        &mut self,
        message: impl Into<String>,
        severity: Severity,
        duration: Duration,
        now: Instant,
    ) -> ToastId {
        let mut message = message.into();
        if message.trim().is_empty() {
            message = DEFAULT_MESSAGE.to_string();
        }
        let duration = if duration.is_zero() {
            self.config.default_duration
        } else {
            duration
        };

        if self.surface.is_none() {
            self.surface = Some(ToastSurface::new(self.config.anchor, now));
        }

        let entry = ToastEntry::new(message.trim().to_string(), severity, duration, now);
        let id = entry.id;
        debug!(%id, %severity, duration_ms = duration.as_millis() as u64, "toast enqueued");
        self.entries.push(entry);
        id
    }

    /// Enqueue from loosely-typed input
    ///
    /// Blank messages get a default text, unknown severities become `Info`
    /// and non-positive durations use the configured default.
    pub fn enqueue_raw(&mut self, message: &str, severity: &str, duration_ms: i64) -> ToastId {
        self.enqueue_raw_at(message, severity, duration_ms, Instant::now())
    }

    pub fn enqueue_raw_at(
        &mut self,
        message: &str,
        severity: &str,
        duration_ms: i64,
        now: Instant,
    ) -> ToastId {
        let duration = u64::try_from(duration_ms)
            .ok()
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
            .unwrap_or(self.config.default_duration);
        self.enqueue_at(message, Severity::parse_lenient(severity), duration, now)
    }

    /// Called after each frame is drawn
    ///
    /// Shows every entry created before this frame, then evicts the oldest
    /// shown entries while more than `max_active` are not hiding.
    pub fn on_frame(&mut self, now: Instant) -> Vec<ToastEvent> {
        let mut events = Vec::new();

        for entry in &mut self.entries {
            if entry.phase == ToastPhase::Created {
                entry.phase = ToastPhase::Visible;
                events.push(record(ToastEvent::Shown(entry.id)));
            }
        }

        let excess = self
            .entries
            .iter()
            .filter(|e| !e.is_hiding())
            .count()
            .saturating_sub(self.config.max_active);
        if excess > 0 {
            let oldest: Vec<ToastId> = self
                .entries
                .iter()
                .filter(|e| !e.is_hiding())
                .take(excess)
                .map(|e| e.id)
                .collect();
            for id in oldest {
                events.extend(self.hide(id, HideReason::Evicted, now));
            }
        }

        events
    }

    /// Fire elapsed timers
    ///
    /// Display timers move entries to `Hiding`; removal fallbacks detach
    /// entries whose transition-end never arrived.
    pub fn tick(&mut self, now: Instant) -> Vec<ToastEvent> {
        let mut events = Vec::new();

        let expired: Vec<ToastId> = self
            .entries
            .iter()
            // Entries not yet shown wait for their first frame
            .filter(|e| e.phase != ToastPhase::Created)
            .filter(|e| e.hide_at.is_some_and(|at| at <= now))
            .map(|e| e.id)
            .collect();
        for id in expired {
            events.extend(self.hide(id, HideReason::Expired, now));
        }

        let overdue: Vec<ToastId> = self
            .entries
            .iter()
            .filter(|e| e.remove_at.is_some_and(|at| at <= now))
            .map(|e| e.id)
            .collect();
        for id in overdue {
            events.extend(self.remove(id, RemovalCause::Fallback));
        }

        events
    }

    /// Start hiding `id` ahead of its timer; no-op if it is already hiding or gone
    pub fn dismiss_at(&mut self, id: ToastId, now: Instant) -> Option<ToastEvent> {
        self.hide(id, HideReason::Dismissed, now)
    }

    /// Dismiss the most recently added entry that is not already hiding
    pub fn dismiss_newest_at(&mut self, now: Instant) -> Option<ToastEvent> {
        let id = self.entries.iter().rev().find(|e| !e.is_hiding())?.id;
        self.dismiss_at(id, now)
    }

    /// A transition on `id` finished
    ///
    /// Only the end of the opacity transition of a hiding entry removes it.
    /// Anything else is ignored, so repeated or late signals are harmless.
    pub fn on_transition_end(
        &mut self,
        id: ToastId,
        property: TransitionProperty,
    ) -> Option<ToastEvent> {
        if property != TransitionProperty::Opacity {
            return None;
        }
        if !self.get(id).is_some_and(ToastEntry::is_hiding) {
            return None;
        }
        self.remove(id, RemovalCause::TransitionEnd)
    }

    /// Hiding entries whose fade-out has finished at `now`
    pub fn completed_fades(&self, now: Instant) -> Vec<ToastId> {
        let fade = self.config.fade_duration;
        self.entries
            .iter()
            .filter(|e| e.fade_complete(now, fade))
            .map(|e| e.id)
            .collect()
    }

    /// Opacity of `id` at `now`, or `None` once removed
    pub fn opacity(&self, id: ToastId, now: Instant) -> Option<f64> {
        self.get(id)
            .map(|e| e.opacity(now, self.config.fade_duration))
    }

    fn hide(&mut self, id: ToastId, reason: HideReason, now: Instant) -> Option<ToastEvent> {
        let fallback = self.config.fade_duration + self.config.removal_grace;
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.id == id && !e.is_hiding())?;

        entry.phase = ToastPhase::Hiding;
        entry.hide_at = None;
        entry.hiding_since = Some(now);
        entry.remove_at = Some(now + fallback);
        Some(record(ToastEvent::Hiding { id, reason }))
    }

    fn remove(&mut self, id: ToastId, cause: RemovalCause) -> Option<ToastEvent> {
        let index = self.entries.iter().position(|e| e.id == id)?;
        // Timers live on the entry, so they go with it
        self.entries.remove(index);
        Some(record(ToastEvent::Removed { id, cause }))
    }
}

fn record(event: ToastEvent) -> ToastEvent {
    debug!(?event, "toast state change");
    event
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    fn phases(queue: &NotificationQueue) -> Vec<ToastPhase> {
        queue.entries().iter().map(|e| e.phase).collect()
    }

    #[test]
    fn test_entries_are_created_then_shown_on_next_frame() {
        let t0 = Instant::now();
        let mut queue = NotificationQueue::new();
        assert!(queue.surface().is_none());

        let id = queue.enqueue_at("Copied", Severity::Success, ms(3000), t0);
        assert_eq!(queue.get(id).unwrap().phase, ToastPhase::Created);
        assert!(queue.surface().is_some());
        assert_eq!(queue.visible().count(), 0);

        let events = queue.on_frame(t0 + ms(16));
        assert_eq!(events, vec![ToastEvent::Shown(id)]);
        assert_eq!(queue.get(id).unwrap().phase, ToastPhase::Visible);

        // A second frame produces nothing new
        assert!(queue.on_frame(t0 + ms(32)).is_empty());
    }

    #[test]
    fn test_independent_timelines() {
        let t0 = Instant::now();
        let mut queue = NotificationQueue::new();
        let a = queue.enqueue_at("A", Severity::Info, ms(1000), t0);
        let b = queue.enqueue_at("B", Severity::Warning, ms(2000), t0);
        let c = queue.enqueue_at("C", Severity::Error, ms(500), t0);

        assert_eq!(queue.on_frame(t0 + ms(16)).len(), 3);
        assert_eq!(queue.visible().count(), 3);

        let a_deadline = queue.get(a).unwrap().hide_deadline();
        let b_deadline = queue.get(b).unwrap().hide_deadline();

        let events = queue.tick(t0 + ms(500));
        assert_eq!(
            events,
            vec![ToastEvent::Hiding {
                id: c,
                reason: HideReason::Expired
            }]
        );
        assert_eq!(
            phases(&queue),
            vec![ToastPhase::Visible, ToastPhase::Visible, ToastPhase::Hiding]
        );

        let removed = queue.on_transition_end(c, TransitionProperty::Opacity);
        assert_eq!(
            removed,
            Some(ToastEvent::Removed {
                id: c,
                cause: RemovalCause::TransitionEnd
            })
        );

        let ids: Vec<ToastId> = queue.entries().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![a, b]);
        assert_eq!(queue.get(a).unwrap().hide_deadline(), a_deadline);
        assert_eq!(queue.get(b).unwrap().hide_deadline(), b_deadline);
        assert_eq!(phases(&queue), vec![ToastPhase::Visible; 2]);
    }

    #[test]
    fn test_expired_entry_is_shown_before_hiding() {
        let t0 = Instant::now();
        let mut queue = NotificationQueue::new();
        let id = queue.enqueue_at("Late frame", Severity::Info, ms(100), t0);

        // Timer ran out before any frame was drawn
        assert!(queue.tick(t0 + ms(200)).is_empty());
        assert_eq!(queue.get(id).unwrap().phase, ToastPhase::Created);

        assert_eq!(queue.on_frame(t0 + ms(210)), vec![ToastEvent::Shown(id)]);
        assert_eq!(
            queue.tick(t0 + ms(220)),
            vec![ToastEvent::Hiding {
                id,
                reason: HideReason::Expired
            }]
        );
    }

    #[test]
    fn test_removal_happens_exactly_once() {
        let t0 = Instant::now();
        let mut queue = NotificationQueue::new();
        let id = queue.enqueue_at("Once", Severity::Info, ms(100), t0);
        queue.on_frame(t0);
        queue.tick(t0 + ms(100));

        assert!(queue
            .on_transition_end(id, TransitionProperty::Opacity)
            .is_some());
        assert!(queue
            .on_transition_end(id, TransitionProperty::Opacity)
            .is_none());
        // The fallback timer went away with the entry
        assert!(queue.tick(t0 + ms(5000)).is_empty());
        assert!(queue.is_empty());
    }

    #[test]
    fn test_other_properties_and_early_signals_are_ignored() {
        let t0 = Instant::now();
        let mut queue = NotificationQueue::new();
        let id = queue.enqueue_at("Slide", Severity::Info, ms(1000), t0);
        queue.on_frame(t0);

        // Still visible: the slide-in finishing must not remove it
        assert!(queue
            .on_transition_end(id, TransitionProperty::Opacity)
            .is_none());

        queue.dismiss_at(id, t0 + ms(10));
        assert!(queue
            .on_transition_end(id, TransitionProperty::Transform)
            .is_none());
        assert_eq!(queue.get(id).unwrap().phase, ToastPhase::Hiding);
    }

    #[test]
    fn test_fallback_removes_when_signal_is_lost() {
        let t0 = Instant::now();
        let mut queue = NotificationQueue::new();
        let id = queue.enqueue_at("Lost", Severity::Info, ms(200), t0);
        queue.on_frame(t0);
        queue.tick(t0 + ms(200));

        let hidden_at = t0 + ms(200);
        assert!(queue.tick(hidden_at + ms(999)).is_empty());
        let events = queue.tick(hidden_at + ms(1000));
        assert_eq!(
            events,
            vec![ToastEvent::Removed {
                id,
                cause: RemovalCause::Fallback
            }]
        );
        assert!(queue.is_empty());
    }

    #[test]
    fn test_dismiss_cancels_display_timer() {
        let t0 = Instant::now();
        let mut queue = NotificationQueue::new();
        let id = queue.enqueue_at("Bye", Severity::Info, ms(3000), t0);
        queue.on_frame(t0);

        let event = queue.dismiss_at(id, t0 + ms(100));
        assert_eq!(
            event,
            Some(ToastEvent::Hiding {
                id,
                reason: HideReason::Dismissed
            })
        );
        assert!(queue.get(id).unwrap().hide_deadline().is_none());

        // Second dismiss and the original deadline are both no-ops
        assert!(queue.dismiss_at(id, t0 + ms(200)).is_none());
        let events = queue.tick(t0 + ms(3000));
        assert!(events
            .iter()
            .all(|e| !matches!(e, ToastEvent::Hiding { .. })));
    }

    #[test]
    fn test_dismiss_newest_skips_hiding_entries() {
        let t0 = Instant::now();
        let mut queue = NotificationQueue::new();
        let first = queue.enqueue_at("1", Severity::Info, ms(3000), t0);
        let second = queue.enqueue_at("2", Severity::Info, ms(3000), t0);
        queue.on_frame(t0);

        assert_eq!(queue.dismiss_newest_at(t0).map(|e| e.id()), Some(second));
        assert_eq!(queue.dismiss_newest_at(t0).map(|e| e.id()), Some(first));
        assert!(queue.dismiss_newest_at(t0).is_none());
    }

    #[test]
    fn test_oldest_is_evicted_beyond_max_active() {
        let t0 = Instant::now();
        let mut queue = NotificationQueue::new();
        let ids: Vec<ToastId> = (0..6)
            .map(|i| queue.enqueue_at(format!("toast {}", i), Severity::Info, ms(3000), t0))
            .collect();

        let events = queue.on_frame(t0);
        assert!(events.contains(&ToastEvent::Hiding {
            id: ids[0],
            reason: HideReason::Evicted
        }));
        assert_eq!(queue.entries().iter().filter(|e| !e.is_hiding()).count(), 5);

        // Evicted entries still leave through the normal path
        assert!(queue
            .on_transition_end(ids[0], TransitionProperty::Opacity)
            .is_some());
        assert_eq!(queue.len(), 5);
    }

    #[test]
    fn test_raw_input_is_coerced() {
        let t0 = Instant::now();
        let mut queue = NotificationQueue::new();
        let id = queue.enqueue_raw_at("   ", "shout", -5, t0);

        let entry = queue.get(id).unwrap();
        assert_eq!(entry.message, DEFAULT_MESSAGE);
        assert_eq!(entry.severity, Severity::Info);
        assert_eq!(entry.display_duration, DEFAULT_DISPLAY_DURATION);

        let id = queue.enqueue_raw_at("  Rate updated ", "SUCCESS", 1500, t0);
        let entry = queue.get(id).unwrap();
        assert_eq!(entry.message, "Rate updated");
        assert_eq!(entry.severity, Severity::Success);
        assert_eq!(entry.display_duration, ms(1500));
    }

    #[test]
    fn test_completed_fades_report_hiding_entries() {
        let t0 = Instant::now();
        let mut queue = NotificationQueue::new();
        let id = queue.enqueue_at("Fade", Severity::Info, ms(100), t0);
        queue.on_frame(t0);
        queue.tick(t0 + ms(100));

        assert!(queue.completed_fades(t0 + ms(200)).is_empty());
        assert_eq!(queue.completed_fades(t0 + ms(400)), vec![id]);
        assert_eq!(queue.opacity(id, t0 + ms(400)), Some(0.0));
    }

    #[test]
    fn test_configured_default_duration() {
        let config = QueueConfig::default().with_default_duration_ms(1200);
        let mut queue = NotificationQueue::with_config(config);
        let id = queue.enqueue_raw("Hi", "info", 0);
        assert_eq!(queue.get(id).unwrap().display_duration, ms(1200));
    }
}
