//! Sensor families for the Overseer channel engine
//!
//! Each family is an acquisition strategy ([`SampleSource`](overseer_core::SampleSource))
//! over a small driver trait; the conditioning and windowing pipeline is the
//! same for all of them. The [`Monitor`] ties one engine per family to the
//! main loop.
//!
//! | Family | Driver trait | Channels |
//! |--------|--------------|----------|
//! | [`imu`] | [`MotionBus`] | accel x, y, z (g) |
//! | [`energy`] | [`AdcChannel`] | current (A) |
//! | [`environment`] | [`Hygrometer`] | humidity (%), temperature (°C) |

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

#[macro_use]
mod logging;

mod bus;

pub mod config;
pub mod energy;
pub mod environment;
pub mod errors;
pub mod imu;
pub mod monitor;

// Public API
pub use config::{CurrentConfig, EnvironmentConfig, FilterConfig, ImuConfig, MonitorConfig};
pub use energy::{AdcChannel, CurrentSensorConfig, CurrentSource};
pub use environment::{ClimateReading, DhtModel, EnvironmentSource, Hygrometer};
pub use errors::{DeviceError, DeviceResult};
pub use imu::{AccelRange, Attitude, ImuSource, MotionBus, RawMotion};
pub use monitor::{Interval, Monitor, MonitorSnapshot, PollSummary};
