//! Toast entries and the events their lifecycle produces

use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::error::ResidualError;
use crate::models::ToastId;

/// Severity of a toast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
    Warning,
    #[default]
    Info,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Success,
        Severity::Error,
        Severity::Warning,
        Severity::Info,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }

    /// Parse anything, falling back to `Info` for unknown names
    pub fn parse_lenient(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }

    /// Errors interrupt; everything else is announced politely
    pub fn is_assertive(&self) -> bool {
        matches!(self, Self::Error)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Severity {
    type Err = ResidualError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|severity| severity.as_str() == normalized)
            .ok_or_else(|| ResidualError::validation(format!("Unknown severity: {}", s)))
    }
}

/// Where an entry is in its show/hide timeline
///
/// Removed entries are detached from the queue, so there is no phase for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastPhase {
    /// Inserted, not yet drawn
    Created,
    Visible,
    /// Fading out, waiting for the end of the opacity transition
    Hiding,
}

/// Animated properties that report a transition end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionProperty {
    Opacity,
    Transform,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HideReason {
    /// The entry's own display timer elapsed
    Expired,
    Dismissed,
    /// Pushed out by newer entries
    Evicted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalCause {
    TransitionEnd,
    /// The transition-end signal never arrived in time
    Fallback,
}

/// A state change of one entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastEvent {
    Shown(ToastId),
    Hiding { id: ToastId, reason: HideReason },
    Removed { id: ToastId, cause: RemovalCause },
}

impl ToastEvent {
    pub fn id(&self) -> ToastId {
        match self {
            Self::Shown(id) => *id,
            Self::Hiding { id, .. } => *id,
            Self::Removed { id, .. } => *id,
        }
    }
}

/// One toast and its timers
#[derive(Debug, Clone)]
pub struct ToastEntry {
    pub id: ToastId,
    pub message: String,
    pub severity: Severity,
    pub display_duration: Duration,
    pub phase: ToastPhase,
    pub created_at: Instant,
    /// Armed while the entry is not hiding
    pub(crate) hide_at: Option<Instant>,
    /// When hiding began; also the start of the fade
    pub(crate) hiding_since: Option<Instant>,
    /// Armed while hiding
    pub(crate) remove_at: Option<Instant>,
}

impl ToastEntry {
    pub(crate) fn new(
        message: String,
        severity: Severity,
        display_duration: Duration,
        now: Instant,
    ) -> Self {
        Self {
            id: ToastId::new(),
            message,
            severity,
            display_duration,
            phase: ToastPhase::Created,
            created_at: now,
            hide_at: Some(now + display_duration),
            hiding_since: None,
            remove_at: None,
        }
    }

    pub fn is_hiding(&self) -> bool {
        self.phase == ToastPhase::Hiding
    }

    /// Scheduled hide time, if the display timer is armed
    pub fn hide_deadline(&self) -> Option<Instant> {
        self.hide_at
    }

    /// Opacity at `now`: 0 before the first frame, 1 while visible, fading to 0 while hiding
    pub fn opacity(&self, now: Instant, fade: Duration) -> f64 {
        match self.phase {
            ToastPhase::Created => 0.0,
            ToastPhase::Visible => 1.0,
            ToastPhase::Hiding => {
                let Some(since) = self.hiding_since else {
                    return 0.0;
                };
                if fade.is_zero() {
                    return 0.0;
                }
                let elapsed = now.saturating_duration_since(since).as_secs_f64();
                (1.0 - elapsed / fade.as_secs_f64()).clamp(0.0, 1.0)
            }
        }
    }

    /// Whether the fade-out has run its course at `now`
    pub fn fade_complete(&self, now: Instant, fade: Duration) -> bool {
        match (self.phase, self.hiding_since) {
            (ToastPhase::Hiding, Some(since)) => now.saturating_duration_since(since) >= fade,
            _ => false,
        }
    }
}

/// Corner the stack grows from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StackAnchor {
    #[default]
    BottomRight,
    TopRight,
}

impl StackAnchor {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BottomRight => "bottom-right",
            Self::TopRight => "top-right",
        }
    }
}

impl fmt::Display for StackAnchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for StackAnchor {
    type Err = ResidualError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "bottom-right" | "bottom" => Ok(Self::BottomRight),
            "top-right" | "top" => Ok(Self::TopRight),
            other => Err(ResidualError::validation(format!(
                "Unknown toast position '{}'; expected bottom-right or top-right",
                other
            ))),
        }
    }
}

/// The container all toasts are stacked in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToastSurface {
    pub anchor: StackAnchor,
    pub created_at: Instant,
}

impl ToastSurface {
    pub fn new(anchor: StackAnchor, now: Instant) -> Self {
        Self {
            anchor,
            created_at: now,
        }
    }
}
