//! Humidity and temperature family
//!
//! DHT11/DHT22 class parts: one slow single-wire transaction returns both
//! values. The part refuses to be polled faster than its minimum interval,
//! which the monitor schedule respects.

use core::fmt::Debug;

use overseer_core::{AcquireError, AcquireResult, SampleSource, SensorEngine};

use crate::bus::acquire_error;

/// Channel labels: relative humidity (%), temperature (°C)
pub const ENVIRONMENT_CHANNELS: [&str; 2] = ["humidity", "temperature"];

/// Spike passthrough threshold, in the channel's own unit
pub const ENVIRONMENT_SPIKE_THRESHOLD: f32 = 0.3;

/// One combined measurement
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ClimateReading {
    /// Relative humidity, percent
    pub humidity_pct: f32,
    /// Temperature, degrees Celsius
    pub temperature_c: f32,
}

/// Driver for a combined humidity/temperature part
pub trait Hygrometer {
    /// Driver-specific bus error
    type Error: Debug;

    /// Start or finish one measurement
    fn read_climate(&mut self) -> nb::Result<ClimateReading, Self::Error>;
}

impl<H: Hygrometer + ?Sized> Hygrometer for &mut H {
    type Error = H::Error;

    fn read_climate(&mut self) -> nb::Result<ClimateReading, Self::Error> {
        (**self).read_climate()
    }
}

/// Supported part variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DhtModel {
    /// 20–90 %RH, 0–50 °C, 1 Hz
    #[default]
    Dht11,
    /// 0–100 %RH, −40–80 °C, 0.5 Hz
    Dht22,
}

impl DhtModel {
    /// Measurable humidity range, percent
    pub const fn humidity_range(self) -> (f32, f32) {
        match self {
            Self::Dht11 => (20.0, 90.0),
            Self::Dht22 => (0.0, 100.0),
        }
    }

    /// Measurable temperature range, °C
    pub const fn temperature_range(self) -> (f32, f32) {
        match self {
            Self::Dht11 => (0.0, 50.0),
            Self::Dht22 => (-40.0, 80.0),
        }
    }

    /// Shortest allowed time between measurements
    pub const fn min_interval_ms(self) -> u64 {
        match self {
            Self::Dht11 => 1_000,
            Self::Dht22 => 2_000,
        }
    }

    /// Valid range per channel, in channel order
    pub const fn channel_ranges(self) -> [(f32, f32); 2] {
        [self.humidity_range(), self.temperature_range()]
    }
}

/// Acquisition strategy for the environment family
pub struct EnvironmentSource<H> {
    sensor: H,
    model: DhtModel,
    latest: Option<ClimateReading>,
}

impl<H: Hygrometer> EnvironmentSource<H> {
    /// Wrap a driver for `model`
    pub fn new(sensor: H, model: DhtModel) -> Self {
        Self {
            sensor,
            model,
            latest: None,
        }
    }

    /// Part variant
    pub fn model(&self) -> DhtModel {
        self.model
    }

    /// Last successful measurement
    pub fn latest(&self) -> Option<ClimateReading> {
        self.latest
    }

    /// The driver
    pub fn sensor_mut(&mut self) -> &mut H {
        &mut self.sensor
    }
}

impl<H: Hygrometer> SampleSource for EnvironmentSource<H> {
    fn channels(&self) -> usize {
        ENVIRONMENT_CHANNELS.len()
    }

    fn refresh(&mut self) -> AcquireResult<()> {
        self.latest = None;
        let reading = self
            .sensor
            .read_climate()
            .map_err(|error| acquire_error(error, "hygrometer"))?;
        self.latest = Some(reading);
        Ok(())
    }

    fn acquire(&mut self, channel: usize) -> AcquireResult<f32> {
        let reading = self.latest.ok_or(AcquireError::NoReading)?;
        match channel {
            0 => Ok(reading.humidity_pct),
            1 => Ok(reading.temperature_c),
            _ => Err(AcquireError::UnknownChannel { channel }),
        }
    }
}

/// Humidity and temperature channels with `N` samples of history each
pub type EnvironmentEngine<H, const N: usize> = SensorEngine<EnvironmentSource<H>, 2, N>;

#[cfg(test)]
mod tests {
    use super::*;

    struct Room {
        ready: bool,
    }

    impl Hygrometer for Room {
        type Error = ();

        fn read_climate(&mut self) -> nb::Result<ClimateReading, ()> {
            if self.ready {
                Ok(ClimateReading { humidity_pct: 45.0, temperature_c: 21.5 })
            } else {
                Err(nb::Error::WouldBlock)
            }
        }
    }

    #[test]
    fn model_limits() {
        assert_eq!(DhtModel::Dht11.min_interval_ms(), 1_000);
        assert_eq!(DhtModel::Dht22.min_interval_ms(), 2_000);
        assert_eq!(DhtModel::Dht22.channel_ranges(), [(0.0, 100.0), (-40.0, 80.0)]);
        assert_eq!(DhtModel::default(), DhtModel::Dht11);
    }

    #[test]
    fn channels_in_label_order() {
        let mut source = EnvironmentSource::new(Room { ready: true }, DhtModel::Dht22);
        source.refresh().unwrap();
        assert_eq!(source.acquire(0), Ok(45.0));
        assert_eq!(source.acquire(1), Ok(21.5));
        assert_eq!(source.acquire(2), Err(AcquireError::UnknownChannel { channel: 2 }));
    }

    #[test]
    fn busy_part_is_not_ready() {
        let mut source = EnvironmentSource::new(Room { ready: false }, DhtModel::Dht11);
        assert_eq!(source.refresh(), Err(AcquireError::NotReady));
        assert_eq!(source.latest(), None);
        assert_eq!(source.acquire(0), Err(AcquireError::NoReading));
    }
}
