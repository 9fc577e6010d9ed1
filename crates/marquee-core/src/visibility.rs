//! Visibility state machine driven by intersection events
//!
//! A section is either revealed or not. Entering requires the visible ratio
//! to reach the threshold; leaving happens only when the target stops
//! intersecting, and only for repeatable sections. One-shot sections latch
//! after their first reveal.

use std::time::Duration;

use tracing::debug;

use crate::config::RevealConfig;
use crate::lifecycle::Lifecycle;
use crate::observer::IntersectionEvent;
use crate::timing::{is_due, Timestamp};

/// Per-instance visibility policy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibilityOptions {
    pub threshold: f64,
    /// Hide again on exit instead of latching after the first reveal
    pub repeatable: bool,
    /// A change commits only after the target has been stable this long
    pub debounce: Duration,
}

impl Default for VisibilityOptions {
    fn default() -> Self {
        Self::from(&RevealConfig::default())
    }
}

impl From<&RevealConfig> for VisibilityOptions {
    fn from(config: &RevealConfig) -> Self {
        Self {
            threshold: config.threshold,
            repeatable: config.repeatable,
            debounce: config.debounce(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibilityState {
    pub is_intersecting: bool,
    /// Latched on the first reveal, never reset
    pub has_ever_been_visible: bool,
    pub last_change: Timestamp,
}

impl Default for VisibilityState {
    fn default() -> Self {
        Self {
            is_intersecting: false,
            has_ever_been_visible: false,
            last_change: Duration::ZERO,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct PendingChange {
    visible: bool,
    since: Timestamp,
}

#[derive(Debug, Clone)]
pub struct VisibilityMachine {
    options: VisibilityOptions,
    state: VisibilityState,
    pending: Option<PendingChange>,
    disposed: bool,
}

impl VisibilityMachine {
    pub fn new(options: VisibilityOptions) -> Self {
        Self {
            options,
            state: VisibilityState::default(),
            pending: None,
            disposed: false,
        }
    }

    pub fn state(&self) -> &VisibilityState {
        &self.state
    }

    pub fn options(&self) -> &VisibilityOptions {
        &self.options
    }

    #[inline]
    pub fn is_revealed(&self) -> bool {
        self.state.is_intersecting
    }

    /// One-shot instance that has already revealed; no event can change it
    pub fn is_frozen(&self) -> bool {
        !self.options.repeatable && self.state.has_ever_been_visible
    }

    /// Whether the owner still needs intersection events
    pub fn wants_events(&self) -> bool {
        !self.disposed && !self.is_frozen()
    }

    /// Deadline at which a pending debounced change will commit
    pub fn next_deadline(&self) -> Option<Timestamp> {
        self.pending.map(|p| p.since + self.options.debounce)
    }

    /// Feed one observer event, in arrival order
    pub fn on_intersection(&mut self, event: IntersectionEvent, now: Timestamp) -> &VisibilityState {
        if self.disposed {
            return &self.state;
        }
        self.tick(now);

        let desired = if event.is_intersecting && event.ratio >= self.options.threshold {
            Some(true)
        } else if !event.is_intersecting {
            Some(false)
        } else {
            // Intersecting but below threshold: keep the current state
            None
        };

        if let Some(visible) = desired {
            self.request(visible, now);
        }
        &self.state
    }

    /// Commit a pending change whose debounce window has elapsed
    ///
    /// Returns true when the revealed state changed.
    pub fn tick(&mut self, now: Timestamp) -> bool {
        if self.disposed || !is_due(self.next_deadline(), now) {
            return false;
        }
        match self.pending.take() {
            Some(pending) => {
                let at = pending.since + self.options.debounce;
                self.commit(pending.visible, at);
                true
            }
            None => false,
        }
    }

    fn request(&mut self, visible: bool, now: Timestamp) {
        if !visible && !self.options.repeatable {
            // One-shot sections never hide again; before the first reveal an
            // exit simply cancels a pending entry
            self.pending = None;
            return;
        }

        if visible == self.state.is_intersecting {
            self.pending = None;
            return;
        }

        if self.options.debounce.is_zero() {
            self.commit(visible, now);
            return;
        }

        match self.pending {
            Some(pending) if pending.visible == visible => {}
            _ => {
                self.pending = Some(PendingChange {
                    visible,
                    since: now,
                });
            }
        }
    }

    fn commit(&mut self, visible: bool, at: Timestamp) {
        self.state.is_intersecting = visible;
        if visible && !self.state.has_ever_been_visible {
            self.state.has_ever_been_visible = true;
        }
        self.state.last_change = at;
        debug!(
            visible,
            repeatable = self.options.repeatable,
            at_ms = at.as_millis() as u64,
            "Visibility changed"
        );
    }
}

impl Lifecycle for VisibilityMachine {
    fn dispose(&mut self) {
        self.pending = None;
        self.disposed = true;
    }

    fn is_disposed(&self) -> bool {
        self.disposed
    }
}
