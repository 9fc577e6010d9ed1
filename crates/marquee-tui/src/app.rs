use anyhow::Result;
use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use marquee_core::backend::SectionCopy;
use marquee_core::carousel::SwipeTracker;
use marquee_core::{AppConfig, Clock, Outcome, SystemClock, Timestamp};

use crate::input::Action;
use crate::page::Page;
use crate::theme::Theme;

/// Main application state for the terminal preview
pub struct App {
    pub page: Page,
    pub theme: Theme,
    pub should_quit: bool,
    pub status_message: Option<String>,
    clock: Box<dyn Clock>,
    swipe: SwipeTracker,
    px_per_column: i32,
}

impl App {
    /// Create the preview for a terminal of `cols` x `rows`
    pub fn new(config: &AppConfig, hero: SectionCopy, cols: u16, rows: u16) -> Result<Self> {
        Self::with_clock(config, hero, cols, rows, Box::new(SystemClock::new()))
    }

    pub fn with_clock(
        config: &AppConfig,
        hero: SectionCopy,
        cols: u16,
        rows: u16,
        clock: Box<dyn Clock>,
    ) -> Result<Self> {
        let now = clock.now();
        let page = Page::new(config, hero, cols, page_rows(rows), now)?;
        Ok(Self {
            page,
            theme: Theme::from_tokens(&config.tokens),
            should_quit: false,
            status_message: None,
            clock,
            swipe: SwipeTracker::new(config.carousel.swipe_threshold),
            px_per_column: config.preview.px_per_column.max(1) as i32,
        })
    }

    #[inline]
    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    pub fn tick(&mut self) {
        let now = self.now();
        self.page.tick(now);
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        let now = self.now();
        self.page.resize(cols, page_rows(rows), now);
    }

    pub fn needs_fast_update(&self) -> bool {
        self.page.needs_fast_update(self.now())
    }

    /// Drag with the left button to swipe the carousel
    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        let x = mouse.column as i32 * self.px_per_column;
        let y = mouse.row as i32 * self.px_per_column * 2;
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => self.swipe.begin(x, y),
            MouseEventKind::Up(MouseButton::Left) => {
                if let Some(nav) = self.swipe.end(x, y) {
                    let now = self.now();
                    if let Some(outcome) = self.page.carousel_navigate(nav, now) {
                        self.report(outcome);
                    }
                }
            }
            MouseEventKind::ScrollDown => self.handle_action(Action::ScrollDown),
            MouseEventKind::ScrollUp => self.handle_action(Action::ScrollUp),
            _ => {}
        }
    }

    pub fn handle_action(&mut self, action: Action) {
        let now = self.now();
        let rows = self.page.viewport_rows() as i32;
        match action {
            Action::Quit => self.should_quit = true,
            Action::ScrollDown => self.page.scroll_by(1, now),
            Action::ScrollUp => self.page.scroll_by(-1, now),
            Action::ScrollPageDown => self.page.scroll_by(rows / 2, now),
            Action::ScrollPageUp => self.page.scroll_by(-rows / 2, now),
            Action::JumpToTop => self.page.scroll_to(0, now),
            Action::JumpToBottom => {
                let max = self.page.max_scroll();
                self.page.scroll_to(max, now);
            }
            Action::Carousel(input) => {
                if let Some(outcome) = self.page.carousel_input(input, now) {
                    self.report(outcome);
                }
            }
            Action::ToggleAutoplay => {
                let enabled = self.page.toggle_autoplay(now);
                self.status_message = Some(
                    if enabled { "Autoplay on" } else { "Autoplay off" }.to_string(),
                );
            }
            Action::ToggleHold => {
                let held = self.page.toggle_hold(now);
                self.status_message = Some(
                    if held { "Carousel held" } else { "Carousel released" }.to_string(),
                );
            }
            Action::None => {}
        }
    }

    fn report(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Dropped => {
                self.status_message = Some("Transition in progress".to_string());
            }
            Outcome::Moved { to, .. } => {
                self.status_message = Some(format!(
                    "Testimonial {}/{}",
                    to + 1,
                    self.page.carousel().len()
                ));
            }
            Outcome::Disposed => {}
        }
    }
}

/// Rows left for the page once the status bar is drawn
fn page_rows(rows: u16) -> u16 {
    rows.saturating_sub(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::default_hero;
    use marquee_core::{CarouselInput, ManualClock};
    use std::time::Duration;

    fn app(clock: &ManualClock) -> App {
        App::with_clock(
            &AppConfig::default(),
            default_hero(),
            120,
            25,
            Box::new(clock.clone()),
        )
        .unwrap()
    }

    #[test]
    fn test_quit() {
        let clock = ManualClock::new();
        let mut app = app(&clock);
        app.handle_action(Action::Quit);
        assert!(app.should_quit);
    }

    #[test]
    fn test_jump_to_bottom_animates() {
        let clock = ManualClock::new();
        let mut app = app(&clock);
        app.handle_action(Action::JumpToBottom);
        assert!(app.needs_fast_update());
        clock.advance(Duration::from_millis(500));
        app.tick();
        assert_eq!(app.page.scroll_offset(), app.page.max_scroll());
    }

    #[test]
    fn test_swipe_left_advances() {
        use crossterm::event::KeyModifiers;

        let clock = ManualClock::new();
        let mut app = app(&clock);
        let mouse = |kind, column| MouseEvent {
            kind,
            column,
            row: 10,
            modifiers: KeyModifiers::NONE,
        };
        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 60));
        app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 40));
        assert_eq!(app.page.carousel().current_index(), 1);

        // Too short to count as a swipe
        clock.advance(Duration::from_millis(1000));
        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 60));
        app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 58));
        assert_eq!(app.page.carousel().current_index(), 1);
    }

    #[test]
    fn test_carousel_lock_reported() {
        let clock = ManualClock::new();
        let mut app = app(&clock);
        app.handle_action(Action::Carousel(CarouselInput::ArrowRight));
        assert_eq!(app.status_message.as_deref(), Some("Testimonial 2/4"));
        app.handle_action(Action::Carousel(CarouselInput::ArrowRight));
        assert_eq!(app.status_message.as_deref(), Some("Transition in progress"));
        assert_eq!(app.page.carousel().current_index(), 1);
    }
}
