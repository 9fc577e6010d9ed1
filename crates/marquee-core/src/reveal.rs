//! Reveal animations layered on top of visibility
//!
//! [`RevealAnimation`] turns "revealed since t" into eased progress, with an
//! optional stagger delay for items in a group. [`CountUp`] uses the same
//! progress to animate a stat counter from zero. With [`EasingType::None`]
//! nothing moves: items show their final frame the moment they start.

use std::time::Duration;

use crate::config::{EasingType, RevealConfig};
use crate::timing::{lerp, progress, Timestamp};

impl EasingType {
    /// Map linear progress `t` onto the curve
    ///
    /// `None` has no intermediate frames and always sits at the end state.
    pub fn ease(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            EasingType::None => 1.0,
            EasingType::Linear => t,
            EasingType::Cubic => 1.0 - (1.0 - t).powi(3),
            EasingType::Quintic => 1.0 - (1.0 - t).powi(5),
            EasingType::EaseOut if t >= 1.0 => 1.0,
            EasingType::EaseOut => 1.0 - (-10.0 * t).exp2(),
        }
    }

    pub fn is_animated(self) -> bool {
        self != EasingType::None
    }
}

/// Delay before item `index` of a staggered group starts animating
pub fn stagger_delay(config: &RevealConfig, index: usize) -> Duration {
    Duration::from_millis(config.stagger_base_ms + config.stagger_step_ms * index as u64)
}

#[derive(Debug, Clone)]
pub struct RevealAnimation {
    duration: Duration,
    easing: EasingType,
    delay: Duration,
    /// When the animation starts (reveal time plus delay)
    start: Option<Timestamp>,
}

impl RevealAnimation {
    pub fn new(duration: Duration, easing: EasingType, delay: Duration) -> Self {
        Self {
            duration,
            easing,
            delay,
            start: None,
        }
    }

    /// Animation for item `index` of a staggered group
    pub fn from_config(config: &RevealConfig, index: usize) -> Self {
        Self::new(config.animation_duration(), config.easing, stagger_delay(config, index))
    }

    /// Follow the visibility state; call whenever it may have changed
    pub fn sync(&mut self, revealed: bool, now: Timestamp) {
        match (revealed, self.start) {
            (true, None) => self.start = Some(now + self.delay),
            (false, Some(_)) => self.start = None,
            _ => {}
        }
    }

    /// Eased progress in [0, 1]
    pub fn progress(&self, now: Timestamp) -> f64 {
        match self.start {
            Some(start) if now >= start => self.easing.ease(progress(start, self.span(), now)),
            _ => 0.0,
        }
    }

    pub fn is_started(&self) -> bool {
        self.start.is_some()
    }

    /// Started and not yet finished
    pub fn is_running(&self, now: Timestamp) -> bool {
        matches!(self.start, Some(start) if now < start + self.span())
    }

    pub fn is_complete(&self, now: Timestamp) -> bool {
        matches!(self.start, Some(start) if now >= start + self.span())
    }

    /// Time spent moving; zero when motion is off
    fn span(&self) -> Duration {
        if self.easing.is_animated() {
            self.duration
        } else {
            Duration::ZERO
        }
    }
}

/// Stat counter that counts up to its target once revealed
#[derive(Debug, Clone)]
pub struct CountUp {
    target: u64,
    animation: RevealAnimation,
}

impl CountUp {
    pub fn new(target: u64, animation: RevealAnimation) -> Self {
        Self { target, animation }
    }

    pub fn target(&self) -> u64 {
        self.target
    }

    pub fn sync(&mut self, revealed: bool, now: Timestamp) {
        self.animation.sync(revealed, now);
    }

    /// Displayed value at `now`
    pub fn value(&self, now: Timestamp) -> u64 {
        let t = self.animation.progress(now);
        lerp(0.0, self.target as f64, t).round() as u64
    }

    pub fn is_running(&self, now: Timestamp) -> bool {
        self.animation.is_running(now)
    }
}
