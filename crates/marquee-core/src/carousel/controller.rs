//! Carousel index controller
//!
//! Owns the active index of a circular collection. Index changes take a
//! transition lock for a fixed window; anything requested while locked is
//! dropped. Auto-advance runs on a fixed period and steps aside for an idle
//! window after every user navigation.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::CarouselConfig;
use crate::lifecycle::Lifecycle;
use crate::timing::{is_due, Timestamp};
use crate::{Error, Result};

/// Requested index change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Next,
    Prev,
    Goto(usize),
}

/// Who asked for a navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Click, swipe or key press; pauses auto-advance for the idle window
    User,
    /// Timers and code paths that should not count as interaction
    Programmatic,
}

/// Result of a navigation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Transition started (`from == to` for single-item carousels)
    Moved { from: usize, to: usize },
    /// A transition was already in flight
    Dropped,
    /// Controller has been torn down
    Disposed,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarouselOptions {
    pub auto_advance: bool,
    pub period: Duration,
    pub transition: Duration,
    pub idle_resume: Duration,
}

impl Default for CarouselOptions {
    fn default() -> Self {
        Self::from(&CarouselConfig::default())
    }
}

impl From<&CarouselConfig> for CarouselOptions {
    fn from(config: &CarouselConfig) -> Self {
        Self {
            auto_advance: config.auto_advance,
            period: config.period(),
            transition: config.transition(),
            idle_resume: config.idle_resume(),
        }
    }
}

/// Timer kinds, in the order they fire when due at the same instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum TimerKind {
    TransitionEnd,
    IdleResume,
    AutoAdvance,
}

#[derive(Debug, Clone)]
pub struct CarouselController {
    len: usize,
    index: usize,
    options: CarouselOptions,
    /// Transition lock expiry; `Some` while transitioning
    locked_until: Option<Timestamp>,
    /// Next auto-advance tick; `None` while paused or disabled
    next_auto_at: Option<Timestamp>,
    /// End of the idle window after user navigation
    resume_at: Option<Timestamp>,
    /// Held by hover/focus; blocks auto-advance until released
    held: bool,
    disposed: bool,
}

impl CarouselController {
    /// Create a controller over `len` items, starting at index 0
    pub fn new(len: usize, options: CarouselOptions, now: Timestamp) -> Result<Self> {
        if len == 0 {
            return Err(Error::EmptyCarousel);
        }

        let mut options = options;
        if options.auto_advance && options.period.is_zero() {
            warn!("Carousel auto-advance period is zero, disabling auto-advance");
            options.auto_advance = false;
        }

        let next_auto_at = options.auto_advance.then(|| now + options.period);
        info!(
            items = len,
            auto_advance = options.auto_advance,
            period_ms = options.period.as_millis() as u64,
            "Carousel mounted"
        );

        Ok(Self {
            len,
            index: 0,
            options,
            locked_until: None,
            next_auto_at,
            resume_at: None,
            held: false,
            disposed: false,
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false; construction rejects empty collections
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    #[inline]
    pub fn current_index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn is_transitioning(&self) -> bool {
        self.locked_until.is_some()
    }

    /// Inside the idle window that follows user navigation
    #[inline]
    pub fn is_user_controlled(&self) -> bool {
        self.resume_at.is_some()
    }

    /// Auto-advance will fire without further input
    pub fn is_auto_advancing(&self) -> bool {
        self.next_auto_at.is_some()
    }

    pub fn options(&self) -> &CarouselOptions {
        &self.options
    }

    /// Earliest pending timer, for drivers deciding how long to sleep
    pub fn next_deadline(&self) -> Option<Timestamp> {
        self.next_timer().map(|(at, _)| at)
    }

    /// Index `offset` places after the current one, wrapping
    pub fn wrapped(&self, offset: isize) -> usize {
        let len = self.len as isize;
        (((self.index as isize + offset) % len + len) % len) as usize
    }

    /// Advance to the next item (user-initiated)
    pub fn next(&mut self, now: Timestamp) -> Outcome {
        self.navigate(Navigation::Next, Origin::User, now)
            .unwrap_or(Outcome::Dropped)
    }

    /// Go back to the previous item (user-initiated)
    pub fn prev(&mut self, now: Timestamp) -> Outcome {
        self.navigate(Navigation::Prev, Origin::User, now)
            .unwrap_or(Outcome::Dropped)
    }

    /// Jump to `index` (user-initiated)
    pub fn goto(&mut self, index: usize, now: Timestamp) -> Result<Outcome> {
        self.navigate(Navigation::Goto(index), Origin::User, now)
    }

    /// General navigation entry point
    ///
    /// Out-of-range `Goto` is rejected before anything else happens, so the
    /// controller is left exactly as it was.
    pub fn navigate(&mut self, nav: Navigation, origin: Origin, now: Timestamp) -> Result<Outcome> {
        if let Navigation::Goto(index) = nav {
            if index >= self.len {
                return Err(Error::InvalidIndex {
                    index,
                    len: self.len,
                });
            }
        }
        if self.disposed {
            return Ok(Outcome::Disposed);
        }

        self.tick(now);

        if origin == Origin::User {
            self.note_interaction(now);
        }
        Ok(self.apply(nav, now))
    }

    /// Fire every timer due at or before `now`, in deadline order
    ///
    /// Returns true when the index changed.
    pub fn tick(&mut self, now: Timestamp) -> bool {
        if self.disposed {
            return false;
        }

        let before = self.index;
        while let Some((at, kind)) = self.next_timer() {
            if at > now {
                break;
            }
            match kind {
                TimerKind::TransitionEnd => {
                    self.locked_until = None;
                }
                TimerKind::IdleResume => {
                    self.resume_at = None;
                    if self.options.auto_advance && !self.held {
                        debug!(at_ms = at.as_millis() as u64, "Carousel auto-advance resumed");
                        self.next_auto_at = Some(at + self.options.period);
                    }
                }
                TimerKind::AutoAdvance => {
                    self.next_auto_at = Some(at + self.options.period);
                    self.apply(Navigation::Next, at);
                }
            }
        }
        self.index != before
    }

    /// Hold auto-advance (e.g. while hovered) until [`release`](Self::release)
    pub fn hold(&mut self) {
        if self.disposed || self.held {
            return;
        }
        self.held = true;
        self.next_auto_at = None;
    }

    /// Release a hold; auto-advance restarts one period from `now`
    /// unless an idle window is still running
    pub fn release(&mut self, now: Timestamp) {
        if self.disposed || !self.held {
            return;
        }
        self.tick(now);
        self.held = false;
        if self.options.auto_advance && self.resume_at.is_none() {
            self.next_auto_at = Some(now + self.options.period);
        }
    }

    pub fn is_held(&self) -> bool {
        self.held
    }

    /// Turn auto-advance on or off
    pub fn set_auto_advance(&mut self, enabled: bool, now: Timestamp) {
        if self.disposed {
            return;
        }
        self.tick(now);
        if enabled && self.options.period.is_zero() {
            warn!("Cannot enable carousel auto-advance with a zero period");
            return;
        }
        self.options.auto_advance = enabled;
        if !enabled {
            self.next_auto_at = None;
            self.resume_at = None;
        } else if self.next_auto_at.is_none() && self.resume_at.is_none() && !self.held {
            self.next_auto_at = Some(now + self.options.period);
        }
    }

    fn note_interaction(&mut self, now: Timestamp) {
        self.next_auto_at = None;
        if self.options.auto_advance {
            self.resume_at = Some(now + self.options.idle_resume);
        }
    }

    fn apply(&mut self, nav: Navigation, now: Timestamp) -> Outcome {
        if self.locked_until.is_some() {
            debug!(?nav, index = self.index, "Carousel navigation dropped during transition");
            return Outcome::Dropped;
        }

        let from = self.index;
        let to = match nav {
            Navigation::Next => self.wrapped(1),
            Navigation::Prev => self.wrapped(-1),
            Navigation::Goto(index) => index,
        };

        self.index = to;
        if !self.options.transition.is_zero() {
            self.locked_until = Some(now + self.options.transition);
        }
        debug!(from, to, at_ms = now.as_millis() as u64, "Carousel moved");
        Outcome::Moved { from, to }
    }

    fn next_timer(&self) -> Option<(Timestamp, TimerKind)> {
        [
            self.locked_until.map(|at| (at, TimerKind::TransitionEnd)),
            self.resume_at.map(|at| (at, TimerKind::IdleResume)),
            self.next_auto_at.map(|at| (at, TimerKind::AutoAdvance)),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    /// Whether a timer of any kind is due at `now`
    pub fn has_due_timer(&self, now: Timestamp) -> bool {
        is_due(self.next_deadline(), now)
    }
}

impl Lifecycle for CarouselController {
    fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.locked_until = None;
        self.next_auto_at = None;
        self.resume_at = None;
        self.disposed = true;
        info!(index = self.index, "Carousel unmounted");
    }

    fn is_disposed(&self) -> bool {
        self.disposed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::Mounted;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn manual(len: usize) -> CarouselController {
        CarouselController::new(
            len,
            CarouselOptions {
                auto_advance: false,
                period: ms(4000),
                transition: ms(500),
                idle_resume: ms(5000),
            },
            Duration::ZERO,
        )
        .unwrap()
    }

    fn autoplay(len: usize, period: u64, transition: u64, idle: u64) -> CarouselController {
        CarouselController::new(
            len,
            CarouselOptions {
                auto_advance: true,
                period: ms(period),
                transition: ms(transition),
                idle_resume: ms(idle),
            },
            Duration::ZERO,
        )
        .unwrap()
    }

    /// Small deterministic generator so sequences are reproducible
    fn lcg(seed: &mut u64) -> u64 {
        *seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        *seed >> 33
    }

    #[test]
    fn test_empty_rejected() {
        let err = CarouselController::new(0, CarouselOptions::default(), Duration::ZERO).unwrap_err();
        assert!(matches!(err, Error::EmptyCarousel));
    }

    #[test]
    fn test_starts_at_zero() {
        let c = manual(3);
        assert_eq!(c.current_index(), 0);
        assert!(!c.is_transitioning());
        assert!(!c.is_user_controlled());
    }

    #[test]
    fn test_wraparound_both_directions() {
        let mut c = manual(3);
        assert_eq!(c.prev(ms(0)), Outcome::Moved { from: 0, to: 2 });
        assert_eq!(c.next(ms(1000)), Outcome::Moved { from: 2, to: 0 });
    }

    #[test]
    fn test_index_stays_in_range() {
        let mut seed = 7;
        for len in 1..=6 {
            let mut c = manual(len);
            let mut now = 0;
            for _ in 0..300 {
                now += lcg(&mut seed) % 700;
                if lcg(&mut seed) % 2 == 0 {
                    c.next(ms(now));
                } else {
                    c.prev(ms(now));
                }
                assert!(c.current_index() < len);
            }
        }
    }

    #[test]
    fn test_n_nexts_close_the_cycle() {
        for len in 1..=5 {
            for start in 0..len {
                let mut c = manual(len);
                c.goto(start, ms(0)).unwrap();
                let mut now = 0;
                for _ in 0..len {
                    now += 500;
                    assert!(matches!(c.next(ms(now)), Outcome::Moved { .. }));
                }
                assert_eq!(c.current_index(), start, "len {} start {}", len, start);
            }
        }
    }

    #[test]
    fn test_next_while_locked_is_dropped() {
        let mut c = manual(4);
        c.next(ms(0));
        assert!(c.is_transitioning());
        assert_eq!(c.next(ms(100)), Outcome::Dropped);
        assert_eq!(c.prev(ms(200)), Outcome::Dropped);
        assert_eq!(c.current_index(), 1);
        // Lock clears after its window, not queued
        c.tick(ms(500));
        assert!(!c.is_transitioning());
        assert_eq!(c.current_index(), 1);
    }

    #[test]
    fn test_goto_out_of_range_leaves_state() {
        let mut c = autoplay(4, 4000, 500, 5000);
        let err = c.goto(4, ms(100)).unwrap_err();
        assert!(matches!(err, Error::InvalidIndex { index: 4, len: 4 }));
        assert_eq!(c.current_index(), 0);
        assert!(!c.is_transitioning());
        assert!(!c.is_user_controlled());
        assert_eq!(c.next_deadline(), Some(ms(4000)));
    }

    #[test]
    fn test_goto_then_immediate_next() {
        let mut c = manual(5);
        assert_eq!(c.goto(2, ms(0)).unwrap(), Outcome::Moved { from: 0, to: 2 });
        assert_eq!(c.next(ms(100)), Outcome::Dropped);
        assert_eq!(c.current_index(), 2);
        assert_eq!(c.next(ms(500)), Outcome::Moved { from: 2, to: 3 });
        assert_eq!(c.current_index(), 3);
    }

    #[test]
    fn test_single_item_respects_lock() {
        let mut c = manual(1);
        assert_eq!(c.next(ms(0)), Outcome::Moved { from: 0, to: 0 });
        assert!(c.is_transitioning());
        assert_eq!(c.prev(ms(10)), Outcome::Dropped);
        assert_eq!(c.prev(ms(600)), Outcome::Moved { from: 0, to: 0 });
        assert_eq!(c.current_index(), 0);
    }

    #[test]
    fn test_four_items_ten_units() {
        let mut c = autoplay(4, 4, 1, 5);
        for t in 1..=10 {
            c.tick(ms(t));
            if t != 4 && t != 8 {
                assert!(!c.is_transitioning(), "locked between ticks at {}", t);
            }
        }
        assert_eq!(c.current_index(), 2);
        assert!(!c.is_transitioning());
    }

    #[test]
    fn test_single_late_tick_catches_up() {
        let mut c = autoplay(4, 4000, 500, 5000);
        assert!(c.tick(ms(10_000)));
        assert_eq!(c.current_index(), 2);
        assert!(!c.is_transitioning());
        assert_eq!(c.next_deadline(), Some(ms(12_000)));
    }

    #[test]
    fn test_auto_advance_period() {
        let mut c = autoplay(10, 3000, 500, 5000);
        c.tick(ms(2999));
        assert_eq!(c.current_index(), 0);
        c.tick(ms(3000));
        assert_eq!(c.current_index(), 1);
        c.tick(ms(5999));
        assert_eq!(c.current_index(), 1);
        c.tick(ms(6000));
        assert_eq!(c.current_index(), 2);
    }

    #[test]
    fn test_user_navigation_pauses_then_resumes() {
        let mut c = autoplay(10, 4000, 500, 5000);
        c.next(ms(1000));
        assert_eq!(c.current_index(), 1);
        assert!(c.is_user_controlled());
        assert!(!c.is_auto_advancing());

        // Would have fired at 4000 and 8000 without the interaction
        c.tick(ms(5999));
        assert_eq!(c.current_index(), 1);

        // Idle window ends at 6000, next tick one period later
        c.tick(ms(6000));
        assert!(!c.is_user_controlled());
        assert_eq!(c.next_deadline(), Some(ms(10_000)));
        c.tick(ms(9999));
        assert_eq!(c.current_index(), 1);
        c.tick(ms(10_000));
        assert_eq!(c.current_index(), 2);
    }

    #[test]
    fn test_repeated_interaction_extends_idle_window() {
        let mut c = autoplay(10, 4000, 500, 5000);
        c.next(ms(1000));
        c.next(ms(4000));
        c.tick(ms(8999));
        assert!(c.is_user_controlled());
        c.tick(ms(9000));
        assert!(!c.is_user_controlled());
        assert_eq!(c.current_index(), 2);
        c.tick(ms(13_000));
        assert_eq!(c.current_index(), 3);
    }

    #[test]
    fn test_dropped_user_call_still_pauses() {
        let mut c = autoplay(4, 4000, 500, 5000);
        c.next(ms(0));
        assert_eq!(c.next(ms(100)), Outcome::Dropped);
        assert_eq!(c.next_deadline(), Some(ms(500)));
        c.tick(ms(500));
        assert_eq!(c.next_deadline(), Some(ms(5100)));
    }

    #[test]
    fn test_programmatic_navigation_does_not_pause() {
        let mut c = autoplay(4, 4000, 500, 5000);
        c.navigate(Navigation::Goto(3), Origin::Programmatic, ms(100)).unwrap();
        assert!(!c.is_user_controlled());
        c.tick(ms(4000));
        assert_eq!(c.current_index(), 0);
    }

    #[test]
    fn test_hold_and_release() {
        let mut c = autoplay(4, 4000, 500, 5000);
        c.hold();
        c.tick(ms(20_000));
        assert_eq!(c.current_index(), 0);
        c.release(ms(20_000));
        c.tick(ms(24_000));
        assert_eq!(c.current_index(), 1);
    }

    #[test]
    fn test_idle_resume_while_held_waits_for_release() {
        let mut c = autoplay(4, 4000, 500, 5000);
        c.next(ms(0));
        c.hold();
        c.tick(ms(30_000));
        assert_eq!(c.current_index(), 1);
        assert!(!c.is_auto_advancing());
        c.release(ms(30_000));
        assert_eq!(c.next_deadline(), Some(ms(34_000)));
    }

    #[test]
    fn test_set_auto_advance() {
        let mut c = manual(3);
        assert_eq!(c.next_deadline(), None);
        c.set_auto_advance(true, ms(100));
        assert_eq!(c.next_deadline(), Some(ms(4100)));
        c.set_auto_advance(false, ms(200));
        assert_eq!(c.next_deadline(), None);
    }

    #[test]
    fn test_zero_period_disables_auto_advance() {
        let c = autoplay(3, 0, 500, 5000);
        assert!(!c.options().auto_advance);
        assert_eq!(c.next_deadline(), None);
    }

    #[test]
    fn test_no_mutation_after_dispose() {
        let mut c = autoplay(4, 4000, 500, 5000);
        c.next(ms(0));
        c.dispose();
        let snapshot = (c.current_index(), c.is_transitioning(), c.is_user_controlled());
        assert!(!c.tick(ms(100_000)));
        assert_eq!(c.next(ms(100_001)), Outcome::Disposed);
        assert_eq!(c.goto(2, ms(100_002)).unwrap(), Outcome::Disposed);
        c.release(ms(100_003));
        c.set_auto_advance(true, ms(100_004));
        assert_eq!(
            (c.current_index(), c.is_transitioning(), c.is_user_controlled()),
            snapshot
        );
        assert_eq!(c.next_deadline(), None);
    }

    #[test]
    fn test_dispose_through_guard() {
        let mut guard = Mounted::new(autoplay(4, 4000, 500, 5000));
        guard.next(ms(0));
        assert!(guard.next_deadline().is_some());
        guard.dispose();
        assert!(guard.is_disposed());
        assert_eq!(guard.next_deadline(), None);
        assert_eq!(guard.next(ms(10_000)), Outcome::Disposed);
        assert_eq!(guard.current_index(), 1);
    }

    #[test]
    fn test_wrapped() {
        let mut c = manual(5);
        c.goto(4, ms(0)).unwrap();
        assert_eq!(c.wrapped(1), 0);
        assert_eq!(c.wrapped(-6), 3);
        assert_eq!(c.wrapped(12), 1);
    }
}
