//! Monitor configuration
//!
//! Plain values with defaults matching the fitted parts. Where they are
//! loaded from (flash, a file, a host command) is outside this crate; with
//! the `serde` feature every struct can be (de)serialized as is.

use overseer_core::{
    constants::{DEFAULT_RATE_ALPHA, DEFAULT_SMOOTHING_ALPHA},
    ChannelConfig, WindowSpec,
};

use crate::{
    energy::{CurrentSensorConfig, CURRENT_CHANNELS, CURRENT_SPIKE_THRESHOLD_A, CURRENT_VALID_RANGE_A},
    environment::{DhtModel, ENVIRONMENT_CHANNELS, ENVIRONMENT_SPIKE_THRESHOLD},
    imu::{AccelRange, IMU_CHANNELS, IMU_SPIKE_THRESHOLD_G, IMU_UPDATE_INTERVAL_MS},
};

/// Default telemetry report period
pub const DEFAULT_REPORT_INTERVAL_MS: u64 = 5_000;

/// Default current sampling period
pub const CURRENT_UPDATE_INTERVAL_MS: u64 = 100;

/// Smoothing parameters shared by the channels of one family
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FilterConfig {
    /// EMA smoothing factor
    pub alpha: f32,
    /// Spike passthrough threshold in the family's unit
    pub spike_threshold: f32,
    /// Sample-rate EMA factor
    pub rate_alpha: f32,
}

impl FilterConfig {
    /// Filter with the default alphas and the given threshold
    pub const fn with_threshold(spike_threshold: f32) -> Self {
        Self {
            alpha: DEFAULT_SMOOTHING_ALPHA,
            spike_threshold,
            rate_alpha: DEFAULT_RATE_ALPHA,
        }
    }

    /// Channel parameters for one channel of the family
    pub fn channel(&self, windows: &WindowSpec, valid_range: Option<(f32, f32)>) -> ChannelConfig {
        let config = ChannelConfig::default()
            .with_alpha(self.alpha)
            .with_spike_threshold(self.spike_threshold)
            .with_rate_alpha(self.rate_alpha)
            .with_windows(windows.clone());
        match valid_range {
            Some((min, max)) => config.with_valid_range(min, max),
            None => config,
        }
    }
}

/// Inertial family
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImuConfig {
    /// Poll the part at all
    pub enabled: bool,
    /// Polling period
    pub update_interval_ms: u64,
    /// Accelerometer full scale
    pub range: AccelRange,
    /// Smoothing
    pub filter: FilterConfig,
    /// Rolling windows
    pub windows: WindowSpec,
}

impl Default for ImuConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            update_interval_ms: IMU_UPDATE_INTERVAL_MS,
            range: AccelRange::G2,
            filter: FilterConfig::with_threshold(IMU_SPIKE_THRESHOLD_G),
            windows: WindowSpec::standard(),
        }
    }
}

impl ImuConfig {
    /// Labelled channel parameters, in axis order
    pub fn channels(&self) -> [(&'static str, ChannelConfig); 3] {
        // Readings beyond full scale can only be bus garbage
        let limit = self.range.full_scale_g();
        IMU_CHANNELS.map(|label| (label, self.filter.channel(&self.windows, Some((-limit, limit)))))
    }
}

/// Current family
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CurrentConfig {
    /// Poll the part at all
    pub enabled: bool,
    /// Polling period
    pub update_interval_ms: u64,
    /// Electrical parameters
    pub sensor: CurrentSensorConfig,
    /// Smoothing
    pub filter: FilterConfig,
    /// Plausible amps
    pub valid_range: (f32, f32),
    /// Rolling windows
    pub windows: WindowSpec,
}

impl Default for CurrentConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            update_interval_ms: CURRENT_UPDATE_INTERVAL_MS,
            sensor: CurrentSensorConfig::default(),
            filter: FilterConfig::with_threshold(CURRENT_SPIKE_THRESHOLD_A),
            valid_range: CURRENT_VALID_RANGE_A,
            windows: WindowSpec::standard(),
        }
    }
}

impl CurrentConfig {
    /// Labelled channel parameters
    pub fn channels(&self) -> [(&'static str, ChannelConfig); 1] {
        CURRENT_CHANNELS.map(|label| (label, self.filter.channel(&self.windows, Some(self.valid_range))))
    }
}

/// Humidity/temperature family
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnvironmentConfig {
    /// Poll the part at all
    pub enabled: bool,
    /// Part variant
    pub model: DhtModel,
    /// Requested polling period; never faster than the part allows
    pub update_interval_ms: u64,
    /// Smoothing
    pub filter: FilterConfig,
    /// Rolling windows
    pub windows: WindowSpec,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        let model = DhtModel::default();
        Self {
            enabled: true,
            model,
            update_interval_ms: model.min_interval_ms(),
            filter: FilterConfig::with_threshold(ENVIRONMENT_SPIKE_THRESHOLD),
            windows: WindowSpec::standard(),
        }
    }
}

impl EnvironmentConfig {
    /// Polling period clamped to the part's minimum
    pub fn effective_interval_ms(&self) -> u64 {
        self.update_interval_ms.max(self.model.min_interval_ms())
    }

    /// Labelled channel parameters, valid ranges from the model
    pub fn channels(&self) -> [(&'static str, ChannelConfig); 2] {
        let ranges = self.model.channel_ranges();
        core::array::from_fn(|i| {
            (ENVIRONMENT_CHANNELS[i], self.filter.channel(&self.windows, Some(ranges[i])))
        })
    }
}

/// Everything the monitor needs
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonitorConfig {
    /// Inertial family
    pub imu: ImuConfig,
    /// Current family
    pub current: CurrentConfig,
    /// Humidity/temperature family
    pub environment: EnvironmentConfig,
    /// Emit periodic reports through the log
    pub reporting: bool,
    /// Report period
    pub report_interval_ms: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            imu: ImuConfig::default(),
            current: CurrentConfig::default(),
            environment: EnvironmentConfig::default(),
            reporting: true,
            report_interval_ms: DEFAULT_REPORT_INTERVAL_MS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn family_defaults() {
        let config = MonitorConfig::default();
        assert_eq!(config.imu.update_interval_ms, 500);
        assert_eq!(config.imu.filter.alpha, 0.1);
        assert_eq!(config.imu.filter.spike_threshold, 3.0);
        assert_eq!(config.imu.filter.rate_alpha, 0.05);
        assert_eq!(config.current.filter.spike_threshold, 0.3);
        assert_eq!(config.current.valid_range, (-35.0, 35.0));
        assert_eq!(config.report_interval_ms, 5_000);
        assert_eq!(config.imu.windows.len(), 11);
    }

    #[test]
    fn channel_configs_carry_ranges() {
        let imu = ImuConfig { range: AccelRange::G8, ..ImuConfig::default() };
        let [(label, x), ..] = imu.channels();
        assert_eq!(label, "accel_x");
        assert_eq!(x.valid_range, Some((-8.0, 8.0)));
        assert!(x.validate().is_ok());

        let [(label, current)] = CurrentConfig::default().channels();
        assert_eq!(label, "current");
        assert_eq!(current.valid_range, Some((-35.0, 35.0)));
        assert_eq!(current.spike_threshold, 0.3);

        let env = EnvironmentConfig { model: DhtModel::Dht22, ..EnvironmentConfig::default() };
        let [(h, humidity), (t, temperature)] = env.channels();
        assert_eq!((h, t), ("humidity", "temperature"));
        assert_eq!(humidity.valid_range, Some((0.0, 100.0)));
        assert_eq!(temperature.valid_range, Some((-40.0, 80.0)));
    }

    #[test]
    fn environment_interval_respects_part() {
        let config = EnvironmentConfig {
            model: DhtModel::Dht22,
            update_interval_ms: 500,
            ..EnvironmentConfig::default()
        };
        assert_eq!(config.effective_interval_ms(), 2_000);
    }
}
