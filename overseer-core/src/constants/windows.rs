//! Rolling Window Durations
//!
//! Peaks are reported over many overlapping horizons at once. The set is
//! shared by every sensor family so telemetry consumers see the same keys
//! for acceleration, current and humidity.

/// Standard rolling windows in seconds, ascending.
///
/// 1 s through 1 min catch individual events (an impact, an inrush current),
/// 5 min through 30 min show sustained load.
pub const STANDARD_WINDOWS_SECS: [u32; 11] = [1, 5, 10, 15, 30, 45, 60, 300, 600, 900, 1800];

/// Maximum number of windows per channel.
///
/// Bounds the `heapless` storage of window specs and maxima tables.
pub const MAX_WINDOWS: usize = 16;
