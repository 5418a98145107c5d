use core::time::Duration;
use std::{
    sync::{
        Arc, OnceLock,
        atomic::{AtomicI64, Ordering},
    },
    thread::{self, JoinHandle},
    time::Instant,
};

use crate::{SystemClock, TimeSource};

/// Shared ticker thread that updates every millisecond.
#[derive(Debug)]
struct SharedTickerInner {
    current: AtomicI64,
    _handle: OnceLock<JoinHandle<()>>,
}

/// A time source that samples the wall clock once, at construction, and then
/// advances with a monotonic timer.
///
/// Readings are still milliseconds since the Unix epoch, but they never go
/// backward, even if the system clock is adjusted externally. A generator
/// driven by this clock therefore never reports
/// [`Error::ClockMovedBackward`]; the price is that readings drift from the
/// wall clock by however much the system clock is later corrected.
///
/// Internally, a background thread updates a shared atomic counter once per
/// millisecond, measured with `Instant`. The thread exits once the last clone
/// of the clock is dropped.
///
/// [`Error::ClockMovedBackward`]: crate::Error::ClockMovedBackward
#[derive(Clone, Debug)]
pub struct MonotonicClock {
    inner: Arc<SharedTickerInner>,
    epoch_offset: i64, // unix millis at construction
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    /// Constructs a ticking clock anchored at the current wall-clock time.
    ///
    /// # Example
    ///
    /// ```
    /// use idutils::{MonotonicClock, TimeSource};
    ///
    /// let clock = MonotonicClock::new();
    /// let first = clock.current_millis();
    ///
    /// std::thread::sleep(std::time::Duration::from_millis(5));
    ///
    /// // The counter may lag a tick behind the sleep, but never goes back.
    /// assert!(clock.current_millis() >= first);
    /// ```
    pub fn new() -> Self {
        let start = Instant::now();
        let epoch_offset = SystemClock.current_millis();

        let inner = Arc::new(SharedTickerInner {
            current: AtomicI64::new(0),
            _handle: OnceLock::new(),
        });

        let weak_inner = Arc::downgrade(&inner);
        let handle = thread::spawn(move || {
            let mut tick = 0;

            loop {
                let Some(inner_ref) = weak_inner.upgrade() else {
                    break;
                };

                // Absolute target time of the next tick
                let target = start + Duration::from_millis(tick);

                let now = Instant::now();
                if now < target {
                    thread::sleep(target - now);
                }

                let now_ms = start.elapsed().as_millis() as u64;
                inner_ref.current.store(now_ms as i64, Ordering::Relaxed);

                // Align to next tick after the current actual time
                tick = now_ms + 1;
            }
        });

        // Freshly created, so the cell is always empty here.
        let _ = inner._handle.set(handle);

        Self {
            inner,
            epoch_offset,
        }
    }
}

impl TimeSource for MonotonicClock {
    fn current_millis(&self) -> i64 {
        self.epoch_offset + self.inner.current.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monotonic_clock_starts_at_wall_time() {
        let before = SystemClock.current_millis();
        let clock = MonotonicClock::new();
        let after = SystemClock.current_millis();

        let reading = clock.current_millis();
        assert!(reading >= before);
        // the ticker may not have stored its first tick yet
        assert!(reading <= after + 1_000);
    }

    #[test]
    fn monotonic_clock_never_goes_backward() {
        let clock = MonotonicClock::new();
        let mut last = clock.current_millis();
        for _ in 0..1_000 {
            let now = clock.current_millis();
            assert!(now >= last);
            last = now;
        }
    }

    #[test]
    fn monotonic_clock_advances() {
        let clock = MonotonicClock::new();
        let first = clock.current_millis();
        thread::sleep(Duration::from_millis(20));
        assert!(clock.current_millis() > first);
    }

    #[test]
    fn clones_share_the_ticker() {
        let clock = MonotonicClock::new();
        let clone = clock.clone();
        assert!(Arc::ptr_eq(&clock.inner, &clone.inner));
        drop(clock);
        thread::sleep(Duration::from_millis(2));
        assert!(clone.current_millis() > 0);
    }
}
