//! Errors raised while assembling sensor families
//!
//! Tick-time failures stay [`AcquireError`](overseer_core::AcquireError)s and
//! are counted by the channels. These only come out of constructors.

use overseer_core::ConfigError;
use thiserror_no_std::Error;

/// Result type for device construction
pub type DeviceResult<T> = Result<T, DeviceError>;

/// Invalid device or channel parameters
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum DeviceError {
    /// Channel or window configuration rejected by the engine
    #[error("Channel configuration: {0}")]
    Config(#[from] ConfigError),

    /// Current sensor slope must be positive
    #[error("Sensitivity {mv_per_a} mV/A must be positive")]
    InvalidSensitivity {
        /// Rejected slope
        mv_per_a: f32,
    },

    /// ADC resolution outside 1..=16 bits
    #[error("ADC resolution of {bits} bits not supported")]
    InvalidAdcBits {
        /// Rejected resolution
        bits: u8,
    },

    /// ADC reference voltage must be positive
    #[error("Supply voltage {volts} V must be positive")]
    InvalidSupply {
        /// Rejected voltage
        volts: f32,
    },

    /// Schedules need a non-zero period
    #[error("Interval must be non-zero")]
    ZeroInterval,
}

#[cfg(feature = "defmt")]
impl defmt::Format for DeviceError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::Config(error) => defmt::write!(fmt, "Config: {}", error),
            Self::InvalidSensitivity { mv_per_a } =>
                defmt::write!(fmt, "Sensitivity {} mV/A", mv_per_a),
            Self::InvalidAdcBits { bits } => defmt::write!(fmt, "ADC bits {}", bits),
            Self::InvalidSupply { volts } => defmt::write!(fmt, "Supply {} V", volts),
            Self::ZeroInterval => defmt::write!(fmt, "Zero interval"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_core_config_errors() {
        let error: DeviceError = ConfigError::EmptyWindows.into();
        assert_eq!(error, DeviceError::Config(ConfigError::EmptyWindows));
    }

    #[cfg(feature = "std")]
    #[test]
    fn display_messages() {
        assert_eq!(
            DeviceError::InvalidAdcBits { bits: 20 }.to_string(),
            "ADC resolution of 20 bits not supported"
        );
        assert_eq!(
            DeviceError::Config(ConfigError::ZeroWindow).to_string(),
            "Channel configuration: Window duration must be non-zero"
        );
    }
}
