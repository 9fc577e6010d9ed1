//! Viewport intersection observation
//!
//! [`ViewportObserver`] tracks one element through an [`IntersectionPlatform`],
//! the seam for whatever host primitive reports element/viewport overlap.
//! [`GeometryPlatform`] is a concrete platform that derives intersections from
//! layout rectangles.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use tracing::{debug, warn};

use crate::config::RevealConfig;
use crate::lifecycle::Lifecycle;
use crate::{Error, Result};

/// Identifier of a tracked element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u32);

/// Handle to an active platform subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Axis-aligned box in page coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    fn right(&self) -> i64 {
        self.x as i64 + self.width as i64
    }

    fn bottom(&self) -> i64 {
        self.y as i64 + self.height as i64
    }

    fn area(&self) -> f64 {
        self.width as f64 * self.height as f64
    }

    /// Grow (or shrink, for negative margins) on every side
    pub fn expand(&self, margin: i32) -> Rect {
        let grow = |extent: u32| {
            u32::try_from((extent as i64 + 2 * margin as i64).max(0)).unwrap_or(u32::MAX)
        };
        let width = grow(self.width);
        let height = grow(self.height);
        Rect {
            x: self.x.saturating_sub(margin),
            y: self.y.saturating_sub(margin),
            width,
            height,
        }
    }
}

/// Observation parameters for one target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserverOptions {
    /// Visible ratio that counts as "entered"
    pub threshold: f64,
    /// Pixels added around the viewport before intersecting
    pub root_margin: i32,
}

impl Default for ObserverOptions {
    fn default() -> Self {
        Self::from(&RevealConfig::default())
    }
}

impl From<&RevealConfig> for ObserverOptions {
    fn from(config: &RevealConfig) -> Self {
        Self {
            threshold: config.threshold,
            root_margin: config.root_margin,
        }
    }
}

/// One intersection report for a tracked element
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEvent {
    pub is_intersecting: bool,
    /// Fraction of the element inside the (margin-adjusted) viewport
    pub ratio: f64,
}

impl IntersectionEvent {
    pub fn visible() -> Self {
        Self {
            is_intersecting: true,
            ratio: 1.0,
        }
    }

    pub fn hidden() -> Self {
        Self {
            is_intersecting: false,
            ratio: 0.0,
        }
    }
}

/// Compute the intersection of `element` with `viewport` grown by `root_margin`
///
/// Edge-adjacent boxes count as intersecting with a ratio of zero. A zero-area
/// element inside the viewport has ratio 1.0.
pub fn intersection_ratio(element: Rect, viewport: Rect, root_margin: i32) -> IntersectionEvent {
    let root = viewport.expand(root_margin);

    let left = (element.x as i64).max(root.x as i64);
    let top = (element.y as i64).max(root.y as i64);
    let right = element.right().min(root.right());
    let bottom = element.bottom().min(root.bottom());

    if right < left || bottom < top {
        return IntersectionEvent::hidden();
    }

    let area = element.area();
    let ratio = if area == 0.0 {
        1.0
    } else {
        ((right - left) as f64 * (bottom - top) as f64 / area).clamp(0.0, 1.0)
    };

    IntersectionEvent {
        is_intersecting: true,
        ratio,
    }
}

/// Host intersection-detection primitive
pub trait IntersectionPlatform {
    /// Whether the primitive exists on this host
    fn is_supported(&self) -> bool {
        true
    }

    /// Start reporting intersections for `target`
    fn subscribe(&mut self, target: ElementId, options: ObserverOptions) -> Result<SubscriptionId>;

    /// Stop reporting and free the subscription. Unknown ids are ignored.
    fn unsubscribe(&mut self, subscription: SubscriptionId);
}

impl<P: IntersectionPlatform> IntersectionPlatform for Rc<RefCell<P>> {
    fn is_supported(&self) -> bool {
        self.borrow().is_supported()
    }

    fn subscribe(&mut self, target: ElementId, options: ObserverOptions) -> Result<SubscriptionId> {
        self.borrow_mut().subscribe(target, options)
    }

    fn unsubscribe(&mut self, subscription: SubscriptionId) {
        self.borrow_mut().unsubscribe(subscription)
    }
}

#[derive(Debug, Clone)]
struct GeometrySubscription {
    target: ElementId,
    options: ObserverOptions,
    /// Last reported (intersecting, at-or-above-threshold) pair
    last: Option<(bool, bool)>,
}

/// Platform computing intersections from element and viewport rectangles
///
/// Events are produced by [`GeometryPlatform::poll`], only when a target's
/// intersecting state or threshold side changes (plus once after subscribing),
/// mirroring how host observers report crossings rather than every frame.
#[derive(Debug, Default)]
pub struct GeometryPlatform {
    viewport: Rect,
    elements: HashMap<ElementId, Rect>,
    subscriptions: HashMap<u64, GeometrySubscription>,
    next_id: u64,
    unsupported: bool,
}

impl GeometryPlatform {
    pub fn new(viewport: Rect) -> Self {
        Self {
            viewport,
            ..Default::default()
        }
    }

    /// A platform without intersection support, for fail-open paths
    pub fn unsupported() -> Self {
        Self {
            unsupported: true,
            ..Default::default()
        }
    }

    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Rect) {
        self.viewport = viewport;
    }

    /// Scroll the viewport vertically to `y`
    pub fn scroll_to(&mut self, y: i32) {
        self.viewport.y = y;
    }

    /// Lay out (or move) an element
    pub fn place(&mut self, element: ElementId, rect: Rect) {
        self.elements.insert(element, rect);
    }

    /// Detach an element from the layout
    pub fn remove(&mut self, element: ElementId) {
        self.elements.remove(&element);
    }

    pub fn active_subscriptions(&self) -> usize {
        self.subscriptions.len()
    }

    /// Collect intersection changes since the last poll, in subscription order
    pub fn poll(&mut self) -> Vec<(SubscriptionId, IntersectionEvent)> {
        let mut ids: Vec<u64> = self.subscriptions.keys().copied().collect();
        ids.sort_unstable();

        let mut events = Vec::new();
        for id in ids {
            let Some(sub) = self.subscriptions.get_mut(&id) else {
                continue;
            };
            // Unattached targets produce nothing until placed
            let Some(rect) = self.elements.get(&sub.target) else {
                continue;
            };
            let event = intersection_ratio(*rect, self.viewport, sub.options.root_margin);
            let key = (event.is_intersecting, event.ratio >= sub.options.threshold);
            if sub.last != Some(key) {
                sub.last = Some(key);
                events.push((SubscriptionId(id), event));
            }
        }
        events
    }
}

impl IntersectionPlatform for GeometryPlatform {
    fn is_supported(&self) -> bool {
        !self.unsupported
    }

    fn subscribe(&mut self, target: ElementId, options: ObserverOptions) -> Result<SubscriptionId> {
        if self.unsupported {
            return Err(Error::ObserverUnavailable(
                "geometry platform created without intersection support".to_string(),
            ));
        }
        self.next_id += 1;
        let id = self.next_id;
        self.subscriptions.insert(
            id,
            GeometrySubscription {
                target,
                options,
                last: None,
            },
        );
        Ok(SubscriptionId(id))
    }

    fn unsubscribe(&mut self, subscription: SubscriptionId) {
        self.subscriptions.remove(&subscription.0);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Created, platform subscription not yet made
    Detached,
    Observing(SubscriptionId),
    /// Platform unavailable; target treated as always visible
    FailOpen,
    Released,
}

/// Observation of one target element
pub struct ViewportObserver<P: IntersectionPlatform> {
    platform: P,
    target: ElementId,
    options: ObserverOptions,
    phase: Phase,
}

impl<P: IntersectionPlatform> ViewportObserver<P> {
    /// Prepare to observe `target`; nothing happens until [`attach`](Self::attach)
    pub fn observe(platform: P, target: ElementId, options: ObserverOptions) -> Self {
        Self {
            platform,
            target,
            options,
            phase: Phase::Detached,
        }
    }

    pub fn target(&self) -> ElementId {
        self.target
    }

    pub fn options(&self) -> ObserverOptions {
        self.options
    }

    /// Subscribe once the target exists on the page
    ///
    /// Returns a synthetic visible event when the platform has no
    /// intersection support, so callers never block rendering on it.
    /// Attaching twice, or after release, does nothing.
    pub fn attach(&mut self) -> Option<IntersectionEvent> {
        if self.phase != Phase::Detached {
            return None;
        }

        if !self.platform.is_supported() {
            warn!(element = self.target.0, "Intersection observer unavailable, treating target as visible");
            self.phase = Phase::FailOpen;
            return Some(IntersectionEvent::visible());
        }

        match self.platform.subscribe(self.target, self.options) {
            Ok(subscription) => {
                debug!(element = self.target.0, subscription = subscription.0, "Observing target");
                self.phase = Phase::Observing(subscription);
                None
            }
            Err(e) => {
                warn!(element = self.target.0, error = %e, "Observer subscription failed, treating target as visible");
                self.phase = Phase::FailOpen;
                Some(IntersectionEvent::visible())
            }
        }
    }

    /// Filter a platform event, keeping it only if it belongs to this observer
    pub fn deliver(
        &self,
        subscription: SubscriptionId,
        event: IntersectionEvent,
    ) -> Option<IntersectionEvent> {
        match self.phase {
            Phase::Observing(active) if active == subscription => Some(event),
            _ => None,
        }
    }

    /// Stop observing and release the subscription. Safe to call repeatedly.
    pub fn unobserve(&mut self) {
        if let Phase::Observing(subscription) = self.phase {
            self.platform.unsubscribe(subscription);
            debug!(element = self.target.0, subscription = subscription.0, "Stopped observing target");
        }
        self.phase = Phase::Released;
    }

    pub fn is_observing(&self) -> bool {
        matches!(self.phase, Phase::Observing(_))
    }

    pub fn is_fail_open(&self) -> bool {
        self.phase == Phase::FailOpen
    }
}

impl<P: IntersectionPlatform> Lifecycle for ViewportObserver<P> {
    fn dispose(&mut self) {
        self.unobserve();
    }

    fn is_disposed(&self) -> bool {
        self.phase == Phase::Released
    }
}
