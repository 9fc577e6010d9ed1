//! Responsive breakpoint tracking

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::BreakpointConfig;
use crate::lifecycle::Lifecycle;
use crate::timing::{is_due, Timestamp};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidthClass {
    Mobile,
    Tablet,
    Desktop,
}

impl fmt::Display for WidthClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WidthClass::Mobile => "mobile",
            WidthClass::Tablet => "tablet",
            WidthClass::Desktop => "desktop",
        };
        f.write_str(name)
    }
}

/// Upper bounds (inclusive) of the Mobile and Tablet classes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    pub mobile_max: u32,
    pub tablet_max: u32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self::from(&BreakpointConfig::default())
    }
}

impl From<&BreakpointConfig> for Thresholds {
    fn from(config: &BreakpointConfig) -> Self {
        Self {
            mobile_max: config.mobile_max,
            tablet_max: config.tablet_max,
        }
    }
}

/// Classify a viewport width
#[inline]
pub fn classify(width: u32, thresholds: &Thresholds) -> WidthClass {
    if width <= thresholds.mobile_max {
        WidthClass::Mobile
    } else if width <= thresholds.tablet_max {
        WidthClass::Tablet
    } else {
        WidthClass::Desktop
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreakpointState {
    pub width_class: WidthClass,
    pub last_measured_width: u32,
}

/// Debounced width classification
#[derive(Debug, Clone)]
pub struct BreakpointTracker {
    thresholds: Thresholds,
    debounce: Duration,
    state: BreakpointState,
    /// Latest unsampled width and when it arrived
    pending: Option<(u32, Timestamp)>,
    disposed: bool,
}

impl BreakpointTracker {
    /// Measure `width` immediately
    pub fn new(width: u32, config: &BreakpointConfig) -> Self {
        let thresholds = Thresholds::from(config);
        Self {
            thresholds,
            debounce: config.debounce(),
            state: BreakpointState {
                width_class: classify(width, &thresholds),
                last_measured_width: width,
            },
            pending: None,
            disposed: false,
        }
    }

    pub fn state(&self) -> &BreakpointState {
        &self.state
    }

    #[inline]
    pub fn width_class(&self) -> WidthClass {
        self.state.width_class
    }

    pub fn next_deadline(&self) -> Option<Timestamp> {
        self.pending.map(|(_, at)| at + self.debounce)
    }

    /// Record a resize; restarts the debounce window
    ///
    /// Returns the new class when it changed (zero debounce commits at once).
    pub fn on_resize(&mut self, width: u32, now: Timestamp) -> Option<WidthClass> {
        if self.disposed {
            return None;
        }
        self.pending = Some((width, now));
        if self.debounce.is_zero() {
            return self.tick(now);
        }
        None
    }

    /// Sample the latest width once the resize storm has settled
    pub fn tick(&mut self, now: Timestamp) -> Option<WidthClass> {
        if self.disposed || !is_due(self.next_deadline(), now) {
            return None;
        }
        let (width, _) = self.pending.take()?;
        self.measure(width)
    }

    fn measure(&mut self, width: u32) -> Option<WidthClass> {
        let class = classify(width, &self.thresholds);
        let previous = self.state.width_class;
        self.state = BreakpointState {
            width_class: class,
            last_measured_width: width,
        };
        if class != previous {
            debug!(width, from = %previous, to = %class, "Breakpoint changed");
            Some(class)
        } else {
            None
        }
    }
}

impl Lifecycle for BreakpointTracker {
    fn dispose(&mut self) {
        self.pending = None;
        self.disposed = true;
    }

    fn is_disposed(&self) -> bool {
        self.disposed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_boundaries() {
        let t = Thresholds::default();
        assert_eq!(classify(0, &t), WidthClass::Mobile);
        assert_eq!(classify(767, &t), WidthClass::Mobile);
        assert_eq!(classify(768, &t), WidthClass::Mobile);
        assert_eq!(classify(769, &t), WidthClass::Tablet);
        assert_eq!(classify(1023, &t), WidthClass::Tablet);
        assert_eq!(classify(1024, &t), WidthClass::Tablet);
        assert_eq!(classify(1025, &t), WidthClass::Desktop);
        assert_eq!(classify(u32::MAX, &t), WidthClass::Desktop);
    }

    #[test]
    fn test_monotonic_in_width() {
        let t = Thresholds::default();
        let mut prev = WidthClass::Mobile;
        for width in 0..2000 {
            let class = classify(width, &t);
            assert!(class >= prev, "width {}", width);
            prev = class;
        }
    }

    #[test]
    fn test_measures_on_creation() {
        let tracker = BreakpointTracker::new(1440, &BreakpointConfig::default());
        assert_eq!(tracker.width_class(), WidthClass::Desktop);
        assert_eq!(tracker.state().last_measured_width, 1440);
    }

    #[test]
    fn test_debounced_resize_storm() {
        let mut tracker = BreakpointTracker::new(1440, &BreakpointConfig::default());
        assert_eq!(tracker.on_resize(1200, ms(0)), None);
        assert_eq!(tracker.on_resize(900, ms(50)), None);
        assert_eq!(tracker.on_resize(600, ms(100)), None);
        // Window restarted at 100
        assert_eq!(tracker.tick(ms(200)), None);
        assert_eq!(tracker.width_class(), WidthClass::Desktop);
        assert_eq!(tracker.tick(ms(250)), Some(WidthClass::Mobile));
        assert_eq!(tracker.state().last_measured_width, 600);
        assert_eq!(tracker.next_deadline(), None);
    }

    #[test]
    fn test_same_class_updates_width_silently() {
        let mut tracker = BreakpointTracker::new(1100, &BreakpointConfig::default());
        tracker.on_resize(1300, ms(0));
        assert_eq!(tracker.tick(ms(150)), None);
        assert_eq!(tracker.state().last_measured_width, 1300);
    }

    #[test]
    fn test_zero_debounce_commits_immediately() {
        let config = BreakpointConfig {
            debounce_ms: 0,
            ..Default::default()
        };
        let mut tracker = BreakpointTracker::new(1440, &config);
        assert_eq!(tracker.on_resize(800, ms(5)), Some(WidthClass::Tablet));
    }

    #[test]
    fn test_dispose_drops_pending() {
        let mut tracker = BreakpointTracker::new(1440, &BreakpointConfig::default());
        tracker.on_resize(500, ms(0));
        tracker.dispose();
        assert_eq!(tracker.tick(ms(1000)), None);
        assert_eq!(tracker.on_resize(500, ms(1000)), None);
        assert_eq!(tracker.width_class(), WidthClass::Desktop);
    }
}
