//! Filter Defaults

/// Default EMA smoothing factor.
///
/// Weights the newest sample at 10%. Roughly a 10-sample time constant,
/// i.e. 5 s at the 500 ms inertial update interval.
pub const DEFAULT_SMOOTHING_ALPHA: f32 = 0.1;

/// Default spike passthrough threshold.
///
/// Unit-less; matches the inertial family's 3 g. Families with other units
/// override it.
pub const DEFAULT_SPIKE_THRESHOLD: f32 = 3.0;

/// Default smoothing factor for the samples-per-second estimate.
///
/// Deliberately slower than the signal filter: the rate is a health metric
/// and should not jump on a single late tick.
pub const DEFAULT_RATE_ALPHA: f32 = 0.05;
