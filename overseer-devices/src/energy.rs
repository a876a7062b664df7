//! Current sensor family
//!
//! A hall-effect current sensor (WCS1800 class) on an ADC input. The output
//! voltage sits at the zero point for 0 A and moves by the sensitivity per
//! amp in either direction.
//!
//! ```text
//! volts = counts * vcc / (2^bits - 1)
//! amps  = (volts - zero_point) * 1000 / sensitivity_mv_per_amp + offset
//! ```

use core::fmt::Debug;

use overseer_core::{AcquireError, AcquireResult, SampleSource, SensorEngine};

use crate::{
    bus::acquire_error,
    errors::{DeviceError, DeviceResult},
};

/// Channel label
pub const CURRENT_CHANNELS: [&str; 1] = ["current"];

/// Sensitivity of the part, mV per amp
pub const DEFAULT_SENSITIVITY_MV_PER_A: f32 = 66.0;

/// Supply and ADC reference voltage
pub const DEFAULT_VCC: f32 = 3.3;

/// ADC resolution
pub const DEFAULT_ADC_BITS: u8 = 12;

/// Plausible range of the part in amps (rated ±30 A)
pub const CURRENT_VALID_RANGE_A: (f32, f32) = (-35.0, 35.0);

/// Spike passthrough threshold in amps
pub const CURRENT_SPIKE_THRESHOLD_A: f32 = 0.3;

/// Driver for one ADC input
pub trait AdcChannel {
    /// Driver-specific bus error
    type Error: Debug;

    /// Latest conversion in counts
    fn read_counts(&mut self) -> nb::Result<u16, Self::Error>;
}

impl<A: AdcChannel + ?Sized> AdcChannel for &mut A {
    type Error = A::Error;

    fn read_counts(&mut self) -> nb::Result<u16, Self::Error> {
        (**self).read_counts()
    }
}

/// Electrical parameters of the sensor and the ADC in front of it
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CurrentSensorConfig {
    /// Output slope, mV per amp
    pub sensitivity_mv_per_a: f32,
    /// ADC reference voltage
    pub vcc: f32,
    /// ADC resolution in bits (1..=16)
    pub adc_bits: u8,
    /// Output voltage at 0 A
    pub zero_point_volts: f32,
    /// Added to every converted value, amps
    pub offset_a: f32,
}

impl Default for CurrentSensorConfig {
    fn default() -> Self {
        Self {
            sensitivity_mv_per_a: DEFAULT_SENSITIVITY_MV_PER_A,
            vcc: DEFAULT_VCC,
            adc_bits: DEFAULT_ADC_BITS,
            zero_point_volts: DEFAULT_VCC / 2.0,
            offset_a: 0.0,
        }
    }
}

impl CurrentSensorConfig {
    /// Set the output slope
    pub fn with_sensitivity(mut self, mv_per_a: f32) -> Self {
        self.sensitivity_mv_per_a = mv_per_a;
        self
    }

    /// Set the zero-current voltage
    pub fn with_zero_point(mut self, volts: f32) -> Self {
        self.zero_point_volts = volts;
        self
    }

    /// Set the additive offset
    pub fn with_offset(mut self, amps: f32) -> Self {
        self.offset_a = amps;
        self
    }

    /// Reject parameters that would divide by zero or overflow the count range
    pub fn validate(&self) -> DeviceResult<()> {
        let mv = self.sensitivity_mv_per_a;
        if !(mv.is_finite() && mv > 0.0) {
            return Err(DeviceError::InvalidSensitivity { mv_per_a: mv });
        }
        if !(1..=16).contains(&self.adc_bits) {
            return Err(DeviceError::InvalidAdcBits { bits: self.adc_bits });
        }
        if !(self.vcc.is_finite() && self.vcc > 0.0) {
            return Err(DeviceError::InvalidSupply { volts: self.vcc });
        }
        Ok(())
    }

    /// Largest count the ADC produces
    pub fn full_scale(&self) -> u16 {
        ((1u32 << self.adc_bits) - 1) as u16
    }

    /// Counts to volts
    pub fn counts_to_volts(&self, counts: u16) -> f32 {
        counts as f32 * self.vcc / self.full_scale() as f32
    }

    /// Volts to amps, offset included
    pub fn volts_to_amps(&self, volts: f32) -> f32 {
        (volts - self.zero_point_volts) * 1000.0 / self.sensitivity_mv_per_a + self.offset_a
    }
}

/// Acquisition strategy for the current family
pub struct CurrentSource<A> {
    adc: A,
    config: CurrentSensorConfig,
    amps: Option<f32>,
    volts: f32,
}

impl<A: AdcChannel> CurrentSource<A> {
    /// Wrap an ADC input with validated sensor parameters
    pub fn new(adc: A, config: CurrentSensorConfig) -> DeviceResult<Self> {
        config.validate()?;
        Ok(Self {
            adc,
            config,
            amps: None,
            volts: 0.0,
        })
    }

    /// Sensor parameters
    pub fn config(&self) -> &CurrentSensorConfig {
        &self.config
    }

    /// Voltage behind the last accepted conversion
    pub fn volts(&self) -> f32 {
        self.volts
    }

    /// The driver
    pub fn adc_mut(&mut self) -> &mut A {
        &mut self.adc
    }

    /// Change the additive offset
    pub fn set_offset(&mut self, amps: f32) {
        self.config.offset_a = amps;
    }

    /// One conversion to volts, waiting out `WouldBlock`
    pub fn read_volts(&mut self) -> AcquireResult<f32> {
        let counts = nb::block!(self.adc.read_counts())
            .map_err(|error| acquire_error(nb::Error::Other(error), "current adc"))?;
        self.checked_volts(counts)
    }

    /// One conversion to amps, bypassing the engine
    pub fn read_amps(&mut self) -> AcquireResult<f32> {
        let volts = self.read_volts()?;
        Ok(self.config.volts_to_amps(volts))
    }

    /// Mean of `samples` direct conversions
    pub fn read_averaged(&mut self, samples: u8) -> AcquireResult<f32> {
        if samples == 0 {
            return Err(AcquireError::NoReading);
        }
        let mut sum = 0.0;
        for _ in 0..samples {
            sum += self.read_amps()?;
        }
        Ok(sum / samples as f32)
    }

    fn checked_volts(&self, counts: u16) -> AcquireResult<f32> {
        let full_scale = self.config.full_scale();
        if counts > full_scale {
            return Err(AcquireError::OutOfRange {
                value: counts as f32,
                min: 0.0,
                max: full_scale as f32,
            });
        }
        Ok(self.config.counts_to_volts(counts))
    }
}

impl<A: AdcChannel> SampleSource for CurrentSource<A> {
    fn channels(&self) -> usize {
        CURRENT_CHANNELS.len()
    }

    fn refresh(&mut self) -> AcquireResult<()> {
        self.amps = None;

        let counts = self
            .adc
            .read_counts()
            .map_err(|error| acquire_error(error, "current adc"))?;
        let volts = self.checked_volts(counts)?;

        self.volts = volts;
        self.amps = Some(self.config.volts_to_amps(volts));
        Ok(())
    }

    fn acquire(&mut self, channel: usize) -> AcquireResult<f32> {
        match channel {
            0 => self.amps.ok_or(AcquireError::NoReading),
            _ => Err(AcquireError::UnknownChannel { channel }),
        }
    }
}

/// Single current channel with `N` samples of history
pub type CurrentEngine<A, const N: usize> = SensorEngine<CurrentSource<A>, 1, N>;
