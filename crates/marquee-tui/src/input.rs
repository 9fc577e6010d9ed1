use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use marquee_core::CarouselInput;

/// Input action that can be performed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    ScrollDown,
    ScrollUp,
    ScrollPageDown,
    ScrollPageUp,
    JumpToTop,
    JumpToBottom,
    Carousel(CarouselInput),
    ToggleAutoplay,
    /// Hold the carousel while "hovered"
    ToggleHold,
    None,
}

/// Handle a key event and return the corresponding action
pub fn handle_key_event(key: KeyEvent) -> Action {
    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), KeyModifiers::NONE) | (KeyCode::Esc, _) => Action::Quit,
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,

        (KeyCode::Char('j'), KeyModifiers::NONE) | (KeyCode::Down, _) => Action::ScrollDown,
        (KeyCode::Char('k'), KeyModifiers::NONE) | (KeyCode::Up, _) => Action::ScrollUp,
        (KeyCode::Char('d'), KeyModifiers::CONTROL) | (KeyCode::PageDown, _) => {
            Action::ScrollPageDown
        }
        (KeyCode::Char('u'), KeyModifiers::CONTROL) | (KeyCode::PageUp, _) => Action::ScrollPageUp,
        (KeyCode::Char('g'), KeyModifiers::NONE) => Action::JumpToTop,
        (KeyCode::Char('G'), _) => Action::JumpToBottom,

        (KeyCode::Char('h'), KeyModifiers::NONE) | (KeyCode::Left, _) => {
            Action::Carousel(CarouselInput::ArrowLeft)
        }
        (KeyCode::Char('l'), KeyModifiers::NONE) | (KeyCode::Right, _) => {
            Action::Carousel(CarouselInput::ArrowRight)
        }
        (KeyCode::Home, _) => Action::Carousel(CarouselInput::Home),
        (KeyCode::End, _) => Action::Carousel(CarouselInput::End),
        (KeyCode::Char(c @ '1'..='9'), KeyModifiers::NONE) => {
            Action::Carousel(CarouselInput::Digit(c as u8 - b'0'))
        }

        (KeyCode::Char(' '), _) => Action::ToggleAutoplay,
        (KeyCode::Char('p'), KeyModifiers::NONE) => Action::ToggleHold,

        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_carousel_keys() {
        assert_eq!(
            handle_key_event(key(KeyCode::Char('l'))),
            Action::Carousel(CarouselInput::ArrowRight)
        );
        assert_eq!(
            handle_key_event(key(KeyCode::Char('3'))),
            Action::Carousel(CarouselInput::Digit(3))
        );
        assert_eq!(
            handle_key_event(key(KeyCode::Home)),
            Action::Carousel(CarouselInput::Home)
        );
    }

    #[test]
    fn test_scroll_and_quit() {
        assert_eq!(handle_key_event(key(KeyCode::Char('j'))), Action::ScrollDown);
        assert_eq!(
            handle_key_event(KeyEvent::new(KeyCode::Char('d'), KeyModifiers::CONTROL)),
            Action::ScrollPageDown
        );
        assert_eq!(handle_key_event(key(KeyCode::Char('q'))), Action::Quit);
        assert_eq!(handle_key_event(key(KeyCode::Char('z'))), Action::None);
    }
}
