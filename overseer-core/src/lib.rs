//! Signal conditioning and rolling-extremum engine for Overseer
//!
//! Turns a stream of raw scalar readings into smoothed values, peak
//! statistics over a set of rolling windows, a lifetime peak and a
//! sample-rate estimate. Designed for microcontrollers polling sensors in a
//! cooperative loop.
//!
//! Key constraints:
//! - No heap allocation; every buffer is sized at compile time
//! - No panics or errors in the tick path
//! - Independent instances, no global state
//!
//! ```no_run
//! use overseer_core::{ChannelConfig, ChannelEngine, FixedTime, TimeSource};
//!
//! let clock = FixedTime::new(0);
//! let mut channel: ChannelEngine = ChannelEngine::new("pitch", ChannelConfig::default())?;
//!
//! // Each loop iteration: read the part, tick the channel
//! channel.tick(clock.now(), Ok(0.42));
//! println!("{}", channel.snapshot());
//! # Ok::<(), overseer_core::ConfigError>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

#[macro_use]
mod logging;

pub mod buffer;
pub mod channel;
pub mod conditioner;
pub mod constants;
pub mod errors;
pub mod extremum;
pub mod rate;
pub mod sensor;
pub mod snapshot;
pub mod time;
pub mod traits;
pub mod window;

// Public API
pub use buffer::{HistoryBuffer, Sample};
pub use channel::{ChannelConfig, ChannelEngine, ChannelPhase, TickOutcome};
pub use conditioner::{condition, Conditioned, SignalConditioner};
pub use errors::{AcquireError, AcquireResult, ConfigError, ConfigResult};
pub use extremum::{track_extremum, LifetimeExtremum};
pub use rate::{estimate_rate, RateEstimator, RateUpdate};
pub use sensor::SensorEngine;
pub use snapshot::ChannelSnapshot;
pub use time::{FixedTime, TimeSource, Timestamp};
pub use traits::{FnSource, SampleSource};
pub use window::{WindowLabel, WindowMax, WindowMaxima, WindowSpec};

#[cfg(feature = "std")]
pub use time::MonotonicTime;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
