//! Inertial sensor family
//!
//! A 6-axis motion part (MPU-6000/6050 class) read as one burst per tick.
//! The engine tracks the three accelerometer axes in g; pitch and roll are
//! derived from the same burst and kept alongside.
//!
//! ```rust
//! use overseer_devices::imu::{AccelRange, ImuSource, MotionBus, RawMotion};
//! use overseer_core::SampleSource;
//!
//! struct Level;
//!
//! impl MotionBus for Level {
//!     type Error = ();
//!
//!     fn read_motion(&mut self) -> nb::Result<RawMotion, ()> {
//!         Ok(RawMotion { accel: [0, 0, 16_384], gyro: [0; 3] })
//!     }
//! }
//!
//! let mut imu = ImuSource::new(Level, AccelRange::G2);
//! imu.refresh().unwrap();
//! assert_eq!(imu.acquire(2), Ok(1.0));
//! assert_eq!(imu.attitude().pitch_deg, 0.0);
//! ```

use core::fmt::Debug;

use overseer_core::{AcquireError, AcquireResult, SampleSource, SensorEngine};

use crate::bus::acquire_error;

/// Channel labels, in axis order
pub const IMU_CHANNELS: [&str; 3] = ["accel_x", "accel_y", "accel_z"];

/// Default polling period of the inertial part
pub const IMU_UPDATE_INTERVAL_MS: u64 = 500;

/// Spike passthrough threshold in g
pub const IMU_SPIKE_THRESHOLD_G: f32 = 3.0;

const RAD_TO_DEG: f32 = 180.0 / core::f32::consts::PI;

/// One burst read: accelerometer and gyroscope counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawMotion {
    /// Accelerometer x, y, z in LSB
    pub accel: [i16; 3],
    /// Gyroscope x, y, z in LSB
    pub gyro: [i16; 3],
}

/// Driver for a 6-axis motion part
pub trait MotionBus {
    /// Driver-specific bus error
    type Error: Debug;

    /// Read all six axes in one transaction
    fn read_motion(&mut self) -> nb::Result<RawMotion, Self::Error>;
}

impl<B: MotionBus + ?Sized> MotionBus for &mut B {
    type Error = B::Error;

    fn read_motion(&mut self) -> nb::Result<RawMotion, Self::Error> {
        (**self).read_motion()
    }
}

/// Accelerometer full-scale range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AccelRange {
    /// ±2 g
    #[default]
    G2,
    /// ±4 g
    G4,
    /// ±8 g
    G8,
    /// ±16 g
    G16,
}

impl AccelRange {
    /// Sensitivity in LSB per g
    pub const fn lsb_per_g(self) -> f32 {
        match self {
            Self::G2 => 16_384.0,
            Self::G4 => 8_192.0,
            Self::G8 => 4_096.0,
            Self::G16 => 2_048.0,
        }
    }

    /// Largest representable magnitude in g
    pub const fn full_scale_g(self) -> f32 {
        match self {
            Self::G2 => 2.0,
            Self::G4 => 4.0,
            Self::G8 => 8.0,
            Self::G16 => 16.0,
        }
    }

    /// Counts to g
    pub fn to_g(self, counts: i16) -> f32 {
        counts as f32 / self.lsb_per_g()
    }
}

/// Orientation derived from the gravity vector
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Attitude {
    /// Rotation about the y axis, degrees
    pub pitch_deg: f32,
    /// Rotation about the x axis, degrees
    pub roll_deg: f32,
}

impl Attitude {
    /// Pitch and roll from an acceleration vector in g
    pub fn from_accel([x, y, z]: [f32; 3]) -> Self {
        Self {
            pitch_deg: libm::atan2f(x, libm::sqrtf(y * y + z * z)) * RAD_TO_DEG,
            roll_deg: libm::atan2f(y, libm::sqrtf(x * x + z * z)) * RAD_TO_DEG,
        }
    }
}

/// Acquisition strategy for the inertial family
pub struct ImuSource<B> {
    bus: B,
    range: AccelRange,
    accel_g: Option<[f32; 3]>,
    raw: RawMotion,
    attitude: Attitude,
}

impl<B: MotionBus> ImuSource<B> {
    /// Wrap a driver configured for `range`
    pub fn new(bus: B, range: AccelRange) -> Self {
        Self {
            bus,
            range,
            accel_g: None,
            raw: RawMotion::default(),
            attitude: Attitude::default(),
        }
    }

    /// Configured full-scale range
    pub fn range(&self) -> AccelRange {
        self.range
    }

    /// Attitude from the last successful burst
    pub fn attitude(&self) -> Attitude {
        self.attitude
    }

    /// Counts from the last successful burst
    pub fn raw(&self) -> RawMotion {
        self.raw
    }

    /// The driver
    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }
}

impl<B: MotionBus> SampleSource for ImuSource<B> {
    fn channels(&self) -> usize {
        IMU_CHANNELS.len()
    }

    fn refresh(&mut self) -> AcquireResult<()> {
        // A failed burst must not leave stale axes behind
        self.accel_g = None;

        let raw = self
            .bus
            .read_motion()
            .map_err(|error| acquire_error(error, "imu"))?;
        let accel = raw.accel.map(|counts| self.range.to_g(counts));

        self.raw = raw;
        self.attitude = Attitude::from_accel(accel);
        self.accel_g = Some(accel);
        Ok(())
    }

    fn acquire(&mut self, channel: usize) -> AcquireResult<f32> {
        let accel = self.accel_g.ok_or(AcquireError::NoReading)?;
        accel
            .get(channel)
            .copied()
            .ok_or(AcquireError::UnknownChannel { channel })
    }
}

/// Three accelerometer channels with `N` samples of history each
pub type ImuEngine<B, const N: usize> = SensorEngine<ImuSource<B>, 3, N>;

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(nb::Result<RawMotion, &'static str>);

    impl MotionBus for Fixed {
        type Error = &'static str;

        fn read_motion(&mut self) -> nb::Result<RawMotion, &'static str> {
            self.0.clone()
        }
    }

    #[test]
    fn range_sensitivity() {
        assert_eq!(AccelRange::G2.to_g(16_384), 1.0);
        assert_eq!(AccelRange::G4.to_g(-8_192), -1.0);
        assert_eq!(AccelRange::G8.to_g(2_048), 0.5);
        assert_eq!(AccelRange::G16.full_scale_g(), 16.0);
    }

    #[test]
    fn attitude_from_gravity() {
        let level = Attitude::from_accel([0.0, 0.0, 1.0]);
        assert_eq!(level, Attitude { pitch_deg: 0.0, roll_deg: 0.0 });

        let nose_up = Attitude::from_accel([1.0, 0.0, 0.0]);
        assert!((nose_up.pitch_deg - 90.0).abs() < 1e-4);

        let rolled = Attitude::from_accel([0.0, 1.0, 1.0]);
        assert!((rolled.roll_deg - 45.0).abs() < 1e-4);
    }

    #[test]
    fn acquire_before_refresh_has_no_reading() {
        let mut imu = ImuSource::new(Fixed(Err(nb::Error::WouldBlock)), AccelRange::G2);
        assert_eq!(imu.acquire(0), Err(AcquireError::NoReading));
    }

    #[test]
    fn refresh_converts_all_axes() {
        let raw = RawMotion { accel: [8_192, -16_384, 16_384], gyro: [1, 2, 3] };
        let mut imu = ImuSource::new(Fixed(Ok(raw)), AccelRange::G2);

        assert_eq!(imu.refresh(), Ok(()));
        assert_eq!(imu.acquire(0), Ok(0.5));
        assert_eq!(imu.acquire(1), Ok(-1.0));
        assert_eq!(imu.acquire(2), Ok(1.0));
        assert_eq!(imu.acquire(3), Err(AcquireError::UnknownChannel { channel: 3 }));
        assert_eq!(imu.raw().gyro, [1, 2, 3]);
    }

    #[test]
    fn failed_burst_clears_axes() {
        let raw = RawMotion { accel: [0, 0, 16_384], gyro: [0; 3] };
        let mut imu = ImuSource::new(Fixed(Ok(raw)), AccelRange::G2);
        imu.refresh().unwrap();

        imu.bus_mut().0 = Err(nb::Error::Other("nack"));
        assert_eq!(imu.refresh(), Err(AcquireError::Bus { reason: "imu" }));
        assert_eq!(imu.acquire(2), Err(AcquireError::NoReading));
    }
}
