//! Constants for Overseer Core
//!
//! Default parameters used by the engine when the caller does not override
//! them. Device-family defaults (spike thresholds in g or amps, valid ranges)
//! live with the families in `overseer-devices`; only unit-free values are
//! here.
//!
//! ## Organization
//!
//! - **Time**: unit conversions
//! - **Windows**: the standard rolling-window set
//! - **Filter**: smoothing and rate-estimator defaults
//! - **Buffers**: capacity limits

/// Time unit conversions.
pub mod time;

/// Standard rolling-window durations.
pub mod windows;

/// Smoothing and sample-rate estimator defaults.
pub mod filter;

/// History and window-table capacities.
pub mod buffers;

pub use time::MS_PER_SECOND;
pub use windows::{STANDARD_WINDOWS_SECS, MAX_WINDOWS};
pub use filter::{DEFAULT_SMOOTHING_ALPHA, DEFAULT_SPIKE_THRESHOLD, DEFAULT_RATE_ALPHA};
pub use buffers::DEFAULT_HISTORY_CAPACITY;
