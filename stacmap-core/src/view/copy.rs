//! Transient "copied" acknowledgment for the copy-URL affordance.

use std::time::{Duration, Instant};

/// How long the "copied" acknowledgment stays visible.
pub const COPY_ACK_TTL: Duration = Duration::from_secs(3);

/// State behind the reusable copy-to-clipboard button.
///
/// The clipboard write itself belongs to the embedding UI; this tracks only
/// the acknowledgment window. A new acknowledgment restarts the window.
#[derive(Debug, Clone, Copy, Default)]
pub struct CopyFeedback {
    acknowledged_at: Option<Instant>,
}

impl CopyFeedback {
    /// Fresh state, nothing acknowledged.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that the URL was just copied.
    pub fn acknowledge(&mut self, now: Instant) {
        self.acknowledged_at = Some(now);
    }

    /// Whether the "copied" indicator should currently be shown.
    #[must_use]
    pub fn is_visible(&self, now: Instant) -> bool {
        self.acknowledged_at
            .is_some_and(|at| now.duration_since(at) < COPY_ACK_TTL)
    }

    /// Hides the indicator immediately.
    pub fn clear(&mut self) {
        self.acknowledged_at = None;
    }
}
