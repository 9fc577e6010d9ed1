use std::io;
use std::sync::Arc;

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};
use tracing::{info, warn};

use marquee_core::backend::{load_section_copy, Filter, HttpContentSource, SectionCopy};
use marquee_core::AppConfig;
use marquee_tui::{
    content::default_hero,
    event::{AppEvent, EventHandler},
    input::handle_key_event,
    widgets::{PageWidget, StatusBarWidget},
    App,
};

/// Collection and row holding the remotely editable hero copy
const HERO_COLLECTION: &str = "hero_content";

pub async fn run(config: Arc<AppConfig>) -> Result<()> {
    // Resolve hero copy before taking over the terminal
    let hero = load_hero(&config).await;

    let mut terminal = setup_terminal()?;

    let result = main_loop(&mut terminal, &config, hero);

    let restored = restore_terminal();
    terminal.show_cursor()?;
    restored?;

    result
}

type PreviewTerminal = Terminal<CrosstermBackend<io::Stdout>>;

fn setup_terminal() -> Result<PreviewTerminal> {
    enable_raw_mode()?;
    with_rollback(
        || {
            execute!(
                io::stdout(),
                EnterAlternateScreen,
                EnableMouseCapture,
                SetTitle("Marquee preview")
            )?;
            Ok(Terminal::new(CrosstermBackend::new(io::stdout()))?)
        },
        || {
            if let Err(e) = restore_terminal() {
                warn!(error = %e, "Failed to restore terminal");
            }
        },
    )
}

/// Leave raw mode and the alternate screen; fine after a partial setup
fn restore_terminal() -> io::Result<()> {
    let raw = disable_raw_mode();
    let screen = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
    raw.and(screen)
}

/// Run `setup`, undoing it with `rollback` if it fails
fn with_rollback<T>(setup: impl FnOnce() -> Result<T>, rollback: impl FnOnce()) -> Result<T> {
    let result = setup();
    if result.is_err() {
        rollback();
    }
    result
}

fn main_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    config: &AppConfig,
    hero: SectionCopy,
) -> Result<()> {
    let (cols, rows) = crossterm::terminal::size()?;
    let mut app = App::new(config, hero, cols, rows)?;
    let event_handler = EventHandler::new(config.preview.tick_rate_ms);
    info!(cols, rows, "Preview started");

    loop {
        app.tick();

        // Draw UI
        terminal.draw(|frame| {
            let layout = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(1), Constraint::Length(1)])
                .split(frame.area());

            PageWidget::render(frame, layout[0], &app);
            StatusBarWidget::render(frame, layout[1], &app);
        })?;

        // Faster polling while anything is moving
        if let Some(event) = event_handler.next(app.needs_fast_update())? {
            match event {
                AppEvent::Key(key) => {
                    app.status_message = None;
                    app.handle_action(handle_key_event(key));
                }
                AppEvent::Mouse(mouse) => app.handle_mouse(mouse),
                AppEvent::Resize(cols, rows) => app.resize(cols, rows),
                AppEvent::Tick => {}
            }
        }

        if app.should_quit {
            break;
        }
    }

    info!("Preview closed");
    Ok(())
}

async fn load_hero(config: &AppConfig) -> SectionCopy {
    if config.backend.content_base_url.is_none() {
        return default_hero();
    }
    match HttpContentSource::new(config) {
        Ok(source) => {
            let filter = Filter::eq("section", "home");
            load_section_copy(&source, HERO_COLLECTION, Some(&filter), default_hero()).await
        }
        Err(e) => {
            warn!(error = %e, "Content source unavailable, using built-in hero copy");
            default_hero()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_failed_setup_rolls_back() {
        let rolled_back = Cell::new(false);
        let result: Result<()> = with_rollback(
            || Err(anyhow::anyhow!("alternate screen unavailable")),
            || rolled_back.set(true),
        );
        assert!(result.is_err());
        assert!(rolled_back.get());
    }

    #[test]
    fn test_successful_setup_keeps_state() {
        let rolled_back = Cell::new(false);
        let result = with_rollback(|| Ok(7), || rolled_back.set(true));
        assert_eq!(result.unwrap(), 7);
        assert!(!rolled_back.get());
    }
}
