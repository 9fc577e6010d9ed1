//! Keyboard and swipe input for carousels

use std::str::FromStr;

use super::controller::Navigation;

/// Discrete carousel input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarouselInput {
    ArrowLeft,
    ArrowRight,
    Home,
    End,
    /// 1-based slide number, as printed on pagination dots
    Digit(u8),
}

impl CarouselInput {
    /// Map onto a navigation request for a carousel of `len` items
    ///
    /// Digits beyond the item count map to nothing.
    pub fn navigation(self, len: usize) -> Option<Navigation> {
        match self {
            CarouselInput::ArrowLeft => Some(Navigation::Prev),
            CarouselInput::ArrowRight => Some(Navigation::Next),
            CarouselInput::Home => Some(Navigation::Goto(0)),
            CarouselInput::End => len.checked_sub(1).map(Navigation::Goto),
            CarouselInput::Digit(d) => {
                let d = d as usize;
                (d >= 1 && d <= len).then(|| Navigation::Goto(d - 1))
            }
        }
    }
}

impl FromStr for CarouselInput {
    type Err = String;

    /// Parse key names as reported by browsers ("ArrowLeft", "Home", "3")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ArrowLeft" | "Left" => Ok(CarouselInput::ArrowLeft),
            "ArrowRight" | "Right" => Ok(CarouselInput::ArrowRight),
            "Home" => Ok(CarouselInput::Home),
            "End" => Ok(CarouselInput::End),
            _ => match s.parse::<u8>() {
                Ok(d) if (1..=9).contains(&d) => Ok(CarouselInput::Digit(d)),
                _ => Err(format!("Unknown carousel key: '{}'", s)),
            },
        }
    }
}

/// Detects horizontal swipes from pointer start/end positions
#[derive(Debug, Clone)]
pub struct SwipeTracker {
    threshold: u32,
    start: Option<(i32, i32)>,
}

impl SwipeTracker {
    pub fn new(threshold: u32) -> Self {
        Self {
            threshold,
            start: None,
        }
    }

    pub fn begin(&mut self, x: i32, y: i32) {
        self.start = Some((x, y));
    }

    pub fn cancel(&mut self) {
        self.start = None;
    }

    /// Finish a gesture
    ///
    /// Swiping left moves to the next slide, right to the previous one.
    /// Short or mostly vertical gestures are ignored.
    pub fn end(&mut self, x: i32, y: i32) -> Option<Navigation> {
        let (sx, sy) = self.start.take()?;
        let dx = x as i64 - sx as i64;
        let dy = y as i64 - sy as i64;

        if dx.unsigned_abs() < self.threshold as u64 || dx.abs() <= dy.abs() {
            return None;
        }
        if dx < 0 {
            Some(Navigation::Next)
        } else {
            Some(Navigation::Prev)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(CarouselInput::ArrowLeft.navigation(4), Some(Navigation::Prev));
        assert_eq!(CarouselInput::ArrowRight.navigation(4), Some(Navigation::Next));
        assert_eq!(CarouselInput::Home.navigation(4), Some(Navigation::Goto(0)));
        assert_eq!(CarouselInput::End.navigation(4), Some(Navigation::Goto(3)));
        assert_eq!(CarouselInput::Digit(2).navigation(4), Some(Navigation::Goto(1)));
        assert_eq!(CarouselInput::Digit(5).navigation(4), None);
        assert_eq!(CarouselInput::End.navigation(0), None);
    }

    #[test]
    fn test_parse_keys() {
        assert_eq!("ArrowLeft".parse::<CarouselInput>(), Ok(CarouselInput::ArrowLeft));
        assert_eq!("End".parse::<CarouselInput>(), Ok(CarouselInput::End));
        assert_eq!("7".parse::<CarouselInput>(), Ok(CarouselInput::Digit(7)));
        assert!("0".parse::<CarouselInput>().is_err());
        assert!("Enter".parse::<CarouselInput>().is_err());
    }

    #[test]
    fn test_swipe_directions() {
        let mut swipe = SwipeTracker::new(50);
        swipe.begin(300, 100);
        assert_eq!(swipe.end(200, 110), Some(Navigation::Next));
        swipe.begin(100, 100);
        assert_eq!(swipe.end(180, 90), Some(Navigation::Prev));
    }

    #[test]
    fn test_swipe_ignored() {
        let mut swipe = SwipeTracker::new(50);
        // Too short
        swipe.begin(100, 100);
        assert_eq!(swipe.end(140, 100), None);
        // Mostly vertical (page scroll)
        swipe.begin(100, 100);
        assert_eq!(swipe.end(40, 300), None);
        // No gesture in progress
        assert_eq!(swipe.end(0, 0), None);
        swipe.begin(0, 0);
        swipe.cancel();
        assert_eq!(swipe.end(-200, 0), None);
    }
}
