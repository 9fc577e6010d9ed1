//! Carousel and slider control
//!
//! - `controller` - index, transition lock, auto-advance with idle resume
//! - `input` - keyboard and swipe mapping onto navigation requests

pub mod controller;
pub mod input;

pub use controller::{CarouselController, CarouselOptions, Navigation, Origin, Outcome};
pub use input::{CarouselInput, SwipeTracker};
