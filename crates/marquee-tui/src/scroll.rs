//! Smooth page scrolling
//!
//! Same model as the reveal animations: explicit timestamps, eased progress
//! between a start and target row.

use std::time::Duration;

use marquee_core::timing::{lerp, progress};
use marquee_core::{EasingType, Timestamp};

#[derive(Debug, Clone, Copy)]
struct ActiveScroll {
    start: Timestamp,
    from: u16,
    to: u16,
}

/// Scroll animation controller for the page viewport
#[derive(Debug, Clone)]
pub struct ScrollAnimator {
    animation: Option<ActiveScroll>,
    duration: Duration,
    easing: EasingType,
    current: u16,
}

impl Default for ScrollAnimator {
    fn default() -> Self {
        Self::new(Duration::from_millis(150), EasingType::Cubic)
    }
}

impl ScrollAnimator {
    pub fn new(duration: Duration, easing: EasingType) -> Self {
        Self {
            animation: None,
            duration,
            easing,
            current: 0,
        }
    }

    #[inline]
    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    #[inline]
    pub fn current(&self) -> u16 {
        self.current
    }

    /// Final position once the running animation completes
    pub fn target(&self) -> u16 {
        self.animation.map(|a| a.to).unwrap_or(self.current)
    }

    /// Animate towards `target`, clamped to `max`
    pub fn scroll_to(&mut self, target: u16, max: u16, now: Timestamp) {
        let target = target.min(max);
        if self.easing == EasingType::None || self.duration.is_zero() {
            self.current = target;
            self.animation = None;
            return;
        }
        if target == self.current {
            self.animation = None;
            return;
        }
        self.animation = Some(ActiveScroll {
            start: now,
            from: self.current,
            to: target,
        });
    }

    /// Scroll relative to the pending target so repeated keys chain
    pub fn scroll_by(&mut self, delta: i32, max: u16, now: Timestamp) {
        let target = (self.target() as i32 + delta).clamp(0, max as i32) as u16;
        self.scroll_to(target, max, now);
    }

    /// Advance the animation; returns the row to display
    pub fn update(&mut self, now: Timestamp) -> u16 {
        if let Some(anim) = self.animation {
            let t = progress(anim.start, self.duration, now);
            if t >= 1.0 {
                self.current = anim.to;
                self.animation = None;
            } else {
                let eased = self.easing.ease(t);
                self.current = lerp(anim.from as f64, anim.to as f64, eased).round() as u16;
            }
        }
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_animates_to_target() {
        let mut scroll = ScrollAnimator::new(ms(100), EasingType::Linear);
        scroll.scroll_to(20, 100, ms(0));
        assert!(scroll.is_animating());
        assert_eq!(scroll.update(ms(50)), 10);
        assert_eq!(scroll.update(ms(100)), 20);
        assert!(!scroll.is_animating());
    }

    #[test]
    fn test_clamps_to_max() {
        let mut scroll = ScrollAnimator::new(ms(100), EasingType::Linear);
        scroll.scroll_to(500, 40, ms(0));
        assert_eq!(scroll.target(), 40);
        scroll.scroll_by(-100, 40, ms(10));
        assert_eq!(scroll.target(), 0);
    }

    #[test]
    fn test_scroll_by_chains_from_target() {
        let mut scroll = ScrollAnimator::new(ms(100), EasingType::Linear);
        scroll.scroll_by(5, 100, ms(0));
        scroll.scroll_by(5, 100, ms(10));
        assert_eq!(scroll.target(), 10);
    }

    #[test]
    fn test_easing_none_jumps() {
        let mut scroll = ScrollAnimator::new(ms(100), EasingType::None);
        scroll.scroll_to(7, 100, ms(0));
        assert_eq!(scroll.current(), 7);
        assert!(!scroll.is_animating());
    }
}
