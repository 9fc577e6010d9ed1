//! Mount/unmount pairing for controllers
//!
//! Every controller that owns timers or subscriptions implements [`Lifecycle`].
//! Wrapping it in [`Mounted`] ties disposal to scope exit, so a section that is
//! torn down early (or unwinds) never leaves a live timer behind.

use std::ops::{Deref, DerefMut};

/// Controllers with resources that must be released on teardown
pub trait Lifecycle {
    /// Cancel all outstanding timers and subscriptions. Must be idempotent.
    fn dispose(&mut self);

    fn is_disposed(&self) -> bool;
}

/// RAII guard that disposes its controller when dropped
#[derive(Debug)]
pub struct Mounted<T: Lifecycle> {
    inner: T,
}

impl<T: Lifecycle> Mounted<T> {
    pub fn new(inner: T) -> Self {
        tracing::trace!(controller = std::any::type_name::<T>(), "Mounted");
        Self { inner }
    }

    /// Dispose now, before the guard goes out of scope
    pub fn unmount(mut self) {
        self.inner.dispose();
    }
}

impl<T: Lifecycle> Deref for Mounted<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.inner
    }
}

impl<T: Lifecycle> DerefMut for Mounted<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.inner
    }
}

impl<T: Lifecycle> Drop for Mounted<T> {
    fn drop(&mut self) {
        if !self.inner.is_disposed() {
            tracing::trace!(controller = std::any::type_name::<T>(), "Unmounted");
            self.inner.dispose();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    struct CountingController {
        disposed: bool,
        count: Rc<Cell<u32>>,
    }

    impl Lifecycle for CountingController {
        fn dispose(&mut self) {
            if !self.disposed {
                self.disposed = true;
                self.count.set(self.count.get() + 1);
            }
        }

        fn is_disposed(&self) -> bool {
            self.disposed
        }
    }

    #[test]
    fn test_drop_disposes() {
        let count = Rc::new(Cell::new(0));
        {
            let _mounted = Mounted::new(CountingController {
                disposed: false,
                count: count.clone(),
            });
        }
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_unmount_disposes_once() {
        let count = Rc::new(Cell::new(0));
        let mounted = Mounted::new(CountingController {
            disposed: false,
            count: count.clone(),
        });
        mounted.unmount();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_disposes_on_unwind() {
        let count = Rc::new(Cell::new(0));
        let inner = count.clone();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(move || {
            let _mounted = Mounted::new(CountingController {
                disposed: false,
                count: inner,
            });
            panic!("render failed");
        }));
        assert!(result.is_err());
        assert_eq!(count.get(), 1);
    }
}
