//! Error Types for Acquisition and Configuration
//!
//! ## Design Philosophy
//!
//! The engine is meant to run forever on a microcontroller without anyone
//! watching it, so nothing in the tick path is allowed to abort:
//!
//! 1. **Small Size**: Variants carry at most three `f32` values. Errors are
//!    returned on every bad tick and copied into snapshots.
//!
//! 2. **No Heap Allocation**: Messages are `&'static str` only.
//!
//! 3. **Copy Semantics**: Errors implement `Copy` so a channel can keep the
//!    last failure around without ownership games.
//!
//! ## Error Categories
//!
//! ### Acquisition failures ([`AcquireError`])
//! Raised by a [`SampleSource`](crate::traits::SampleSource) or by the
//! engine's own sanity checks. The channel counts a bad read and leaves the
//! rest of its state untouched for that tick.
//!
//! ### Clock regression
//! Not an error type at all. A timestamp that does not move forward is
//! reported as [`RateUpdate::ClockRegression`](crate::rate::RateUpdate) and
//! only affects the sample-rate estimate.
//!
//! ### Configuration errors ([`ConfigError`])
//! Returned when building a [`ChannelConfig`](crate::channel::ChannelConfig)
//! or a [`WindowSpec`](crate::window::WindowSpec). These fail fast so a bad
//! alpha can never turn into NaN deep inside the filter.
//!
//! ```rust
//! use overseer_core::{AcquireError, ChannelConfig, ChannelEngine, TickOutcome};
//!
//! let mut channel: ChannelEngine<64> = ChannelEngine::new("current", ChannelConfig::default())?;
//!
//! match channel.tick(1_000, Err(AcquireError::Timeout)) {
//!     TickOutcome::BadRead(AcquireError::Timeout) => {
//!         // bus was slow, the next tick will try again
//!     }
//!     _ => unreachable!(),
//! }
//! assert_eq!(channel.snapshot().bad_reads, 1);
//! # Ok::<(), overseer_core::ConfigError>(())
//! ```

use thiserror_no_std::Error;

/// Result type for acquisition operations
pub type AcquireResult<T> = Result<T, AcquireError>;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Why a sample could not be taken this tick
#[derive(Error, Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum AcquireError {
    /// Collaborator had nothing to report
    #[error("No valid reading available")]
    NoReading,

    /// Conversion still in progress (`nb::Error::WouldBlock`)
    #[error("Sensor not ready")]
    NotReady,

    /// Bus transaction failed
    #[error("Bus error: {reason}")]
    Bus {
        /// Short description from the driver layer
        reason: &'static str,
    },

    /// Device did not answer in time
    #[error("Sensor timed out")]
    Timeout,

    /// Value is NaN or infinite
    #[error("Invalid value: not a finite number")]
    InvalidValue,

    /// Value outside the physically valid range of the channel
    #[error("Value {value} outside range [{min}, {max}]")]
    OutOfRange {
        /// The rejected reading
        value: f32,
        /// Lower bound of the channel's valid range
        min: f32,
        /// Upper bound of the channel's valid range
        max: f32,
    },

    /// Source does not expose this channel index
    #[error("Unknown channel {channel}")]
    UnknownChannel {
        /// Requested channel index
        channel: usize,
    },
}

/// Invalid construction parameters
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// Smoothing alpha must lie in (0, 1]
    #[error("Smoothing alpha {alpha} outside (0, 1]")]
    InvalidAlpha {
        /// Rejected alpha
        alpha: f32,
    },

    /// Rate estimator alpha must lie in (0, 1]
    #[error("Rate alpha {alpha} outside (0, 1]")]
    InvalidRateAlpha {
        /// Rejected alpha
        alpha: f32,
    },

    /// Spike threshold must be positive and finite
    #[error("Spike threshold {threshold} must be positive")]
    InvalidSpikeThreshold {
        /// Rejected threshold
        threshold: f32,
    },

    /// Valid range bounds are reversed or not finite
    #[error("Invalid range [{min}, {max}]")]
    InvalidRange {
        /// Lower bound
        min: f32,
        /// Upper bound
        max: f32,
    },

    /// At least one window duration is required
    #[error("Window list is empty")]
    EmptyWindows,

    /// More windows than `MAX_WINDOWS`
    #[error("Too many windows: {count} > {max}")]
    TooManyWindows {
        /// Requested number of windows
        count: usize,
        /// Compile-time limit
        max: usize,
    },

    /// A zero-length window would never contain anything
    #[error("Window duration must be non-zero")]
    ZeroWindow,

    /// Durations must be strictly ascending
    #[error("Window {secs}s is not greater than its predecessor")]
    UnsortedWindows {
        /// Offending duration in seconds
        secs: u32,
    },

    /// Source reports a different channel count than the engine holds
    #[error("Source has {actual} channels, engine expects {expected}")]
    ChannelMismatch {
        /// Channels the engine was built for
        expected: usize,
        /// Channels the source reports
        actual: usize,
    },
}

#[cfg(feature = "defmt")]
impl defmt::Format for AcquireError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::NoReading => defmt::write!(fmt, "No reading"),
            Self::NotReady => defmt::write!(fmt, "Not ready"),
            Self::Bus { reason } => defmt::write!(fmt, "Bus: {}", reason),
            Self::Timeout => defmt::write!(fmt, "Timeout"),
            Self::InvalidValue => defmt::write!(fmt, "Invalid value"),
            Self::OutOfRange { value, min, max } =>
                defmt::write!(fmt, "Value {} outside [{}, {}]", value, min, max),
            Self::UnknownChannel { channel } =>
                defmt::write!(fmt, "Unknown channel {}", channel),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ConfigError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::InvalidAlpha { alpha } => defmt::write!(fmt, "Alpha {} outside (0, 1]", alpha),
            Self::InvalidRateAlpha { alpha } =>
                defmt::write!(fmt, "Rate alpha {} outside (0, 1]", alpha),
            Self::InvalidSpikeThreshold { threshold } =>
                defmt::write!(fmt, "Spike threshold {} not positive", threshold),
            Self::InvalidRange { min, max } => defmt::write!(fmt, "Invalid range [{}, {}]", min, max),
            Self::EmptyWindows => defmt::write!(fmt, "Empty window list"),
            Self::TooManyWindows { count, max } =>
                defmt::write!(fmt, "Too many windows: {} > {}", count, max),
            Self::ZeroWindow => defmt::write!(fmt, "Zero window"),
            Self::UnsortedWindows { secs } => defmt::write!(fmt, "Window {}s out of order", secs),
            Self::ChannelMismatch { expected, actual } =>
                defmt::write!(fmt, "Source has {} channels, expected {}", actual, expected),
        }
    }
}

/// Check a raw reading against a closed range
pub fn check_range(value: f32, min: f32, max: f32) -> AcquireResult<f32> {
    if value < min || value > max {
        Err(AcquireError::OutOfRange { value, min, max })
    } else {
        Ok(value)
    }
}

/// Check that an alpha lies in (0, 1]
pub(crate) fn check_unit_alpha(alpha: f32) -> bool {
    alpha.is_finite() && alpha > 0.0 && alpha <= 1.0
}
