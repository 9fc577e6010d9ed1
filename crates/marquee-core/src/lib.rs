pub mod backend;
pub mod breakpoint;
pub mod carousel;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod observer;
pub mod reveal;
pub mod timing;
pub mod visibility;

pub use breakpoint::{classify, BreakpointTracker, WidthClass};
pub use carousel::{CarouselController, CarouselInput, Navigation, Origin, Outcome};
pub use config::{AppConfig, EasingType};
pub use error::{Error, Result};
pub use lifecycle::{Lifecycle, Mounted};
pub use observer::{IntersectionEvent, ObserverOptions, ViewportObserver};
pub use timing::{Clock, ManualClock, SystemClock, Timestamp};
pub use visibility::{VisibilityMachine, VisibilityState};
