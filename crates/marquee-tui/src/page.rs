//! Landing page model
//!
//! Lays the sections out in page coordinates on a [`GeometryPlatform`] and
//! drives every controller from the preview's tick loop. One terminal row is
//! two columns tall, so pixel-based settings (root margin, breakpoints) keep
//! their meaning.

use std::cell::RefCell;
use std::rc::Rc;

use marquee_core::backend::SectionCopy;
use marquee_core::carousel::CarouselOptions;
use marquee_core::observer::{ElementId, GeometryPlatform, Rect};
use marquee_core::reveal::{CountUp, RevealAnimation};
use marquee_core::timing::earliest;
use marquee_core::visibility::VisibilityOptions;
use marquee_core::{
    AppConfig, BreakpointTracker, CarouselController, CarouselInput, Mounted, Navigation, ObserverOptions,
    Origin, Outcome, Result, Timestamp, ViewportObserver, VisibilityMachine, WidthClass,
};
use tracing::{debug, warn};

use crate::content::{CONTACT_LINES, SERVICES, STATS, TESTIMONIALS};
use crate::scroll::ScrollAnimator;

pub type SharedPlatform = Rc<RefCell<GeometryPlatform>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Hero,
    Services,
    Stats,
    Testimonials,
    Contact,
}

impl SectionKind {
    pub const ALL: [SectionKind; 5] = [
        SectionKind::Hero,
        SectionKind::Services,
        SectionKind::Stats,
        SectionKind::Testimonials,
        SectionKind::Contact,
    ];

    pub fn title(self) -> &'static str {
        match self {
            SectionKind::Hero => "Marquee Digital",
            SectionKind::Services => "What we do",
            SectionKind::Stats => "By the numbers",
            SectionKind::Testimonials => "What clients say",
            SectionKind::Contact => "Get in touch",
        }
    }

    /// Number of independently revealed items
    pub fn item_count(self) -> usize {
        match self {
            SectionKind::Hero => 3,
            SectionKind::Services => SERVICES.len(),
            SectionKind::Stats => STATS.len(),
            SectionKind::Testimonials => 1,
            SectionKind::Contact => CONTACT_LINES.len(),
        }
    }

    /// Items laid out side by side at `class`
    pub fn columns(self, class: WidthClass) -> usize {
        match (self, class) {
            (SectionKind::Services | SectionKind::Stats, WidthClass::Desktop) => 4,
            (SectionKind::Services | SectionKind::Stats, WidthClass::Tablet) => 2,
            _ => 1,
        }
    }

    /// Rows occupied by one item
    pub fn item_rows(self) -> u16 {
        match self {
            SectionKind::Hero | SectionKind::Contact => 2,
            SectionKind::Services | SectionKind::Stats => 3,
            SectionKind::Testimonials => 5,
        }
    }

    /// Total height in rows: title, blank line, item grid, trailing gap
    pub fn height(self, class: WidthClass) -> u16 {
        let grid_rows = self.item_count().div_ceil(self.columns(class)) as u16;
        2 + grid_rows * self.item_rows() + 1
    }
}

/// One observed section and its reveal state
pub struct Section {
    kind: SectionKind,
    element: ElementId,
    top: u16,
    height: u16,
    observer: Mounted<ViewportObserver<SharedPlatform>>,
    visibility: Mounted<VisibilityMachine>,
    items: Vec<RevealAnimation>,
    counters: Vec<CountUp>,
}

impl Section {
    pub fn kind(&self) -> SectionKind {
        self.kind
    }

    /// First row of the section
    pub fn top(&self) -> u16 {
        self.top
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn is_revealed(&self) -> bool {
        self.visibility.is_revealed()
    }

    pub fn is_observing(&self) -> bool {
        self.observer.is_observing()
    }

    pub fn is_fail_open(&self) -> bool {
        self.observer.is_fail_open()
    }

    /// Eased reveal progress of item `index`
    pub fn item_progress(&self, index: usize, now: Timestamp) -> f64 {
        self.items.get(index).map(|a| a.progress(now)).unwrap_or(1.0)
    }

    /// Displayed value of stat counter `index`
    pub fn counter_value(&self, index: usize, now: Timestamp) -> Option<u64> {
        self.counters.get(index).map(|c| c.value(now))
    }

    fn sync(&mut self, now: Timestamp) {
        let revealed = self.visibility.is_revealed();
        for item in &mut self.items {
            item.sync(revealed, now);
        }
        for counter in &mut self.counters {
            counter.sync(revealed, now);
        }
    }

    fn is_animating(&self, now: Timestamp) -> bool {
        self.items.iter().any(|a| a.is_running(now)) || self.counters.iter().any(|c| c.is_running(now))
    }
}

pub struct Page {
    platform: SharedPlatform,
    sections: Vec<Section>,
    hero: SectionCopy,
    carousel: Mounted<CarouselController>,
    breakpoints: Mounted<BreakpointTracker>,
    scroll: ScrollAnimator,
    cols: u16,
    rows: u16,
    px_per_column: u32,
}

impl Page {
    /// Build the page for a `cols` x `rows` viewport
    pub fn new(config: &AppConfig, hero: SectionCopy, cols: u16, rows: u16, now: Timestamp) -> Result<Self> {
        let platform = Rc::new(RefCell::new(GeometryPlatform::new(Rect::default())));
        Self::with_platform(platform, config, hero, cols, rows, now)
    }

    /// Build the page on an existing platform
    pub fn with_platform(
        platform: SharedPlatform,
        config: &AppConfig,
        hero: SectionCopy,
        cols: u16,
        rows: u16,
        now: Timestamp,
    ) -> Result<Self> {
        let px_per_column = config.preview.px_per_column.max(1);
        let breakpoints = Mounted::new(BreakpointTracker::new(
            cols as u32 * px_per_column,
            &config.tokens.breakpoints,
        ));

        let observer_options = ObserverOptions::from(&config.reveal);
        let visibility_options = VisibilityOptions::from(&config.reveal);
        let sections = SectionKind::ALL
            .iter()
            .enumerate()
            .map(|(i, &kind)| {
                let element = ElementId(i as u32 + 1);
                let items = (0..kind.item_count())
                    .map(|n| RevealAnimation::from_config(&config.reveal, n))
                    .collect();
                let counters = if kind == SectionKind::Stats {
                    STATS
                        .iter()
                        .enumerate()
                        .map(|(n, stat)| {
                            CountUp::new(stat.value, RevealAnimation::from_config(&config.reveal, n))
                        })
                        .collect()
                } else {
                    Vec::new()
                };
                Section {
                    kind,
                    element,
                    top: 0,
                    height: 0,
                    observer: Mounted::new(ViewportObserver::observe(
                        Rc::clone(&platform),
                        element,
                        observer_options,
                    )),
                    visibility: Mounted::new(VisibilityMachine::new(visibility_options)),
                    items,
                    counters,
                }
            })
            .collect();

        let carousel = Mounted::new(CarouselController::new(
            TESTIMONIALS.len(),
            CarouselOptions::from(&config.carousel),
            now,
        )?);

        let mut page = Self {
            platform,
            sections,
            hero,
            carousel,
            breakpoints,
            scroll: ScrollAnimator::default(),
            cols,
            rows,
            px_per_column,
        };

        page.layout();
        for section in &mut page.sections {
            if let Some(event) = section.observer.attach() {
                section.visibility.on_intersection(event, now);
            }
        }
        page.deliver(now);
        Ok(page)
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section(&self, kind: SectionKind) -> Option<&Section> {
        self.sections.iter().find(|s| s.kind == kind)
    }

    pub fn hero(&self) -> &SectionCopy {
        &self.hero
    }

    pub fn carousel(&self) -> &CarouselController {
        &self.carousel
    }

    #[inline]
    pub fn width_class(&self) -> WidthClass {
        self.breakpoints.width_class()
    }

    pub fn width_px(&self) -> u32 {
        self.cols as u32 * self.px_per_column
    }

    pub fn viewport_rows(&self) -> u16 {
        self.rows
    }

    #[inline]
    pub fn scroll_offset(&self) -> u16 {
        self.scroll.current()
    }

    pub fn content_height(&self) -> u16 {
        self.sections.iter().map(|s| s.height).sum()
    }

    pub fn max_scroll(&self) -> u16 {
        self.content_height().saturating_sub(self.rows)
    }

    /// Subscriptions still held on the platform
    pub fn active_observers(&self) -> usize {
        self.platform.borrow().active_subscriptions()
    }

    /// Advance every controller to `now`
    pub fn tick(&mut self, now: Timestamp) {
        if self.breakpoints.tick(now).is_some() {
            self.layout();
        }
        self.carousel.tick(now);

        let top = self.scroll.update(now);
        let row_px = self.row_px();
        self.platform.borrow_mut().scroll_to(top as i32 * row_px);
        self.deliver(now);
    }

    /// Terminal resized; the width class follows after the debounce window
    pub fn resize(&mut self, cols: u16, rows: u16, now: Timestamp) {
        self.cols = cols;
        self.rows = rows;
        let width_px = self.width_px();
        self.breakpoints.on_resize(width_px, now);
        self.layout();

        let max = self.max_scroll();
        if self.scroll.target() > max {
            self.scroll.scroll_to(max, max, now);
        }
        self.deliver(now);
    }

    pub fn scroll_by(&mut self, delta: i32, now: Timestamp) {
        let max = self.max_scroll();
        self.scroll.scroll_by(delta, max, now);
    }

    pub fn scroll_to(&mut self, row: u16, now: Timestamp) {
        let max = self.max_scroll();
        self.scroll.scroll_to(row, max, now);
    }

    /// Route a key to the testimonials carousel
    pub fn carousel_input(&mut self, input: CarouselInput, now: Timestamp) -> Option<Outcome> {
        let nav = input.navigation(self.carousel.len())?;
        self.carousel_navigate(nav, now)
    }

    /// User navigation of the testimonials carousel
    pub fn carousel_navigate(&mut self, nav: Navigation, now: Timestamp) -> Option<Outcome> {
        match self.carousel.navigate(nav, Origin::User, now) {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                warn!(error = %e, "Carousel input rejected");
                None
            }
        }
    }

    /// Flip auto-advance; returns the new setting
    pub fn toggle_autoplay(&mut self, now: Timestamp) -> bool {
        let enabled = !self.carousel.options().auto_advance;
        self.carousel.set_auto_advance(enabled, now);
        self.carousel.options().auto_advance
    }

    /// Hold or release the carousel, as hovering would; returns whether held
    pub fn toggle_hold(&mut self, now: Timestamp) -> bool {
        if self.carousel.is_held() {
            self.carousel.release(now);
        } else {
            self.carousel.hold();
        }
        self.carousel.is_held()
    }

    /// Whether the next frame will differ from this one without input
    pub fn needs_fast_update(&self, now: Timestamp) -> bool {
        self.scroll.is_animating()
            || self.carousel.is_transitioning()
            || self.sections.iter().any(|s| s.is_animating(now))
    }

    /// Earliest controller deadline, for sizing the idle poll
    pub fn next_deadline(&self) -> Option<Timestamp> {
        let mut deadlines = vec![self.carousel.next_deadline(), self.breakpoints.next_deadline()];
        deadlines.extend(self.sections.iter().map(|s| s.visibility.next_deadline()));
        earliest(&deadlines)
    }

    fn row_px(&self) -> i32 {
        self.px_per_column as i32 * 2
    }

    fn layout(&mut self) {
        let class = self.breakpoints.width_class();
        let row_px = self.row_px();
        let width_px = self.width_px();

        let mut platform = self.platform.borrow_mut();
        platform.set_viewport(Rect::new(
            0,
            self.scroll.current() as i32 * row_px,
            width_px,
            self.rows as u32 * row_px as u32,
        ));

        let mut top = 0u16;
        for section in &mut self.sections {
            section.top = top;
            section.height = section.kind.height(class);
            platform.place(
                section.element,
                Rect::new(0, top as i32 * row_px, width_px, section.height as u32 * row_px as u32),
            );
            top += section.height;
        }
        debug!(%class, width_px, content_rows = top, "Page laid out");
    }

    fn deliver(&mut self, now: Timestamp) {
        let events = self.platform.borrow_mut().poll();
        for (subscription, event) in events {
            for section in &mut self.sections {
                if let Some(event) = section.observer.deliver(subscription, event) {
                    if section.visibility.wants_events() {
                        section.visibility.on_intersection(event, now);
                    }
                }
            }
        }

        for section in &mut self.sections {
            section.visibility.tick(now);
            section.sync(now);
            if section.visibility.is_frozen() && section.observer.is_observing() {
                debug!(section = ?section.kind, "Section revealed, releasing observer");
                section.observer.unobserve();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::default_hero;
    use std::time::Duration;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn page(cols: u16, rows: u16) -> Page {
        Page::new(&AppConfig::default(), default_hero(), cols, rows, ms(0)).unwrap()
    }

    fn revealed(page: &Page, kind: SectionKind) -> bool {
        page.section(kind).unwrap().is_revealed()
    }

    #[test]
    fn test_desktop_layout() {
        let page = page(120, 24);
        assert_eq!(page.width_class(), WidthClass::Desktop);
        let heights: Vec<u16> = page.sections().iter().map(|s| s.height()).collect();
        assert_eq!(heights, vec![9, 6, 6, 8, 7]);
        assert_eq!(page.content_height(), 36);
        assert_eq!(page.max_scroll(), 12);
        assert_eq!(page.section(SectionKind::Stats).unwrap().top(), 15);
    }

    #[test]
    fn test_initial_reveal_follows_viewport() {
        let page = page(120, 24);
        assert!(revealed(&page, SectionKind::Hero));
        assert!(revealed(&page, SectionKind::Services));
        assert!(revealed(&page, SectionKind::Testimonials));
        assert!(!revealed(&page, SectionKind::Contact));
        // Revealed one-shot sections release their observers
        assert_eq!(page.active_observers(), 1);
        assert!(page.section(SectionKind::Contact).unwrap().is_observing());
    }

    #[test]
    fn test_scroll_reveals_and_latches() {
        let mut page = page(120, 24);
        page.scroll_to(page.max_scroll(), ms(0));
        page.tick(ms(200));
        assert_eq!(page.scroll_offset(), 12);
        assert!(revealed(&page, SectionKind::Contact));
        assert_eq!(page.active_observers(), 0);

        page.scroll_to(0, ms(300));
        page.tick(ms(500));
        assert!(revealed(&page, SectionKind::Contact));
    }

    #[test]
    fn test_counters_run_after_reveal() {
        let mut page = page(120, 24);
        page.tick(ms(5000));
        let stats = page.section(SectionKind::Stats).unwrap();
        assert_eq!(stats.counter_value(0, ms(5000)), Some(STATS[0].value));
        assert_eq!(stats.counter_value(3, ms(5000)), Some(STATS[3].value));
        assert!(!page.needs_fast_update(ms(5000)));
    }

    #[test]
    fn test_fail_open_reveals_everything() {
        let platform = Rc::new(RefCell::new(GeometryPlatform::unsupported()));
        let page = Page::with_platform(platform, &AppConfig::default(), default_hero(), 120, 24, ms(0)).unwrap();
        for section in page.sections() {
            assert!(section.is_revealed(), "{:?}", section.kind());
            assert!(section.is_fail_open());
        }
    }

    #[test]
    fn test_resize_reflows_after_debounce() {
        let mut page = page(120, 24);
        page.resize(60, 24, ms(1000));
        assert_eq!(page.width_class(), WidthClass::Desktop);
        page.tick(ms(1150));
        assert_eq!(page.width_class(), WidthClass::Mobile);
        assert_eq!(page.section(SectionKind::Services).unwrap().height(), 15);
    }

    #[test]
    fn test_carousel_keys_and_autoplay() {
        let mut page = page(120, 24);
        assert_eq!(
            page.carousel_input(CarouselInput::Digit(3), ms(100)),
            Some(Outcome::Moved { from: 0, to: 2 })
        );
        assert_eq!(page.carousel_input(CarouselInput::Digit(9), ms(100)), None);
        assert!(page.carousel().is_user_controlled());
        assert!(!page.toggle_autoplay(ms(200)));
        assert!(!page.carousel().is_auto_advancing());
        assert!(page.toggle_autoplay(ms(300)));
    }

    #[test]
    fn test_drop_releases_subscriptions() {
        let platform = Rc::new(RefCell::new(GeometryPlatform::new(Rect::default())));
        let page = Page::with_platform(
            Rc::clone(&platform),
            &AppConfig::default(),
            default_hero(),
            120,
            24,
            ms(0),
        )
        .unwrap();
        assert_eq!(platform.borrow().active_subscriptions(), 1);
        drop(page);
        assert_eq!(platform.borrow().active_subscriptions(), 0);
    }
}
