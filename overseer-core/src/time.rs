//! Time management for sensor channels
//!
//! Provides the clock abstraction the engine is driven by:
//! - Monotonic millisecond counter (platform timer, or `Instant` on std)
//! - Fixed clock (tests, simulation, replaying captured data)

/// Timestamp in milliseconds since device boot
pub type Timestamp = u64;

/// Source of time for the control loop
///
/// The engine never reads a clock by itself. The control loop asks a
/// `TimeSource` once per scheduling period and hands the value to every
/// channel it updates, so all channels of one loop iteration agree on `now`.
pub trait TimeSource {
    /// Get current timestamp in milliseconds
    fn now(&self) -> Timestamp;

    /// Get precision in milliseconds
    fn precision_ms(&self) -> u32 {
        1
    }
}

/// Monotonic time source backed by `std::time::Instant`
///
/// Starts at 0 on construction, always increases.
#[cfg(feature = "std")]
#[derive(Debug, Clone)]
pub struct MonotonicTime {
    start: std::time::Instant,
}

#[cfg(feature = "std")]
impl MonotonicTime {
    /// Start counting from now
    pub fn new() -> Self {
        Self {
            start: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "std")]
impl Default for MonotonicTime {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl TimeSource for MonotonicTime {
    fn now(&self) -> Timestamp {
        self.start.elapsed().as_millis() as Timestamp
    }
}

/// Fixed time source for testing and replay
#[derive(Debug, Clone, Default)]
pub struct FixedTime {
    timestamp: Timestamp,
}

impl FixedTime {
    /// Clock frozen at `timestamp`
    pub fn new(timestamp: Timestamp) -> Self {
        Self { timestamp }
    }

    /// Jump to an absolute time (may go backwards)
    pub fn set(&mut self, timestamp: Timestamp) {
        self.timestamp = timestamp;
    }

    /// Move forward by `ms`
    pub fn advance(&mut self, ms: u64) {
        self.timestamp = self.timestamp.saturating_add(ms);
    }
}

impl TimeSource for FixedTime {
    fn now(&self) -> Timestamp {
        self.timestamp
    }
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn now(&self) -> Timestamp {
        (**self).now()
    }

    fn precision_ms(&self) -> u32 {
        (**self).precision_ms()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_time_advances() {
        let mut time = FixedTime::new(1000);
        assert_eq!(time.now(), 1000);

        time.advance(500);
        assert_eq!(time.now(), 1500);

        time.set(200);
        assert_eq!(time.now(), 200);
    }

    #[test]
    fn fixed_time_saturates() {
        let mut time = FixedTime::new(u64::MAX - 1);
        time.advance(10);
        assert_eq!(time.now(), u64::MAX);
    }

    #[cfg(feature = "std")]
    #[test]
    fn monotonic_never_goes_back() {
        let clock = MonotonicTime::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
        assert_eq!(clock.precision_ms(), 1);
    }

    #[test]
    fn borrowed_source() {
        fn read<T: TimeSource>(clock: T) -> Timestamp {
            clock.now()
        }

        let time = FixedTime::new(42);
        assert_eq!(read(&time), 42);
    }
}
