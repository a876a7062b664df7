//! Core traits for sample acquisition
//!
//! The engine never talks to hardware. Each sensor family supplies a
//! [`SampleSource`] strategy and reuses the identical conditioning and
//! aggregation pipeline. Keep implementations simple: one bus transaction per
//! tick, bounded time, no retries.

use crate::errors::{AcquireError, AcquireResult};

/// Per-channel raw scalar acquisition
///
/// ## Example Implementation
///
/// ```rust
/// use overseer_core::traits::SampleSource;
/// use overseer_core::AcquireError;
///
/// struct Thermistor {
///     counts: Option<u16>,
/// }
///
/// impl SampleSource for Thermistor {
///     fn channels(&self) -> usize {
///         1
///     }
///
///     fn acquire(&mut self, channel: usize) -> Result<f32, AcquireError> {
///         match (channel, self.counts) {
///             (0, Some(c)) => Ok(c as f32 * 0.1),
///             (0, None) => Err(AcquireError::NoReading),
///             _ => Err(AcquireError::UnknownChannel { channel }),
///         }
///     }
/// }
/// ```
pub trait SampleSource {
    /// Number of scalar channels this source produces
    fn channels(&self) -> usize;

    /// Fetch fresh data once per tick, before any `acquire` call
    ///
    /// Multi-axis parts read all axes in one bus transaction here. A failure
    /// marks every channel of the tick as a bad read.
    fn refresh(&mut self) -> AcquireResult<()> {
        Ok(())
    }

    /// Raw value of `channel` for the current tick
    fn acquire(&mut self, channel: usize) -> AcquireResult<f32>;
}

impl<S: SampleSource + ?Sized> SampleSource for &mut S {
    fn channels(&self) -> usize {
        (**self).channels()
    }

    fn refresh(&mut self) -> AcquireResult<()> {
        (**self).refresh()
    }

    fn acquire(&mut self, channel: usize) -> AcquireResult<f32> {
        (**self).acquire(channel)
    }
}

/// Acquisition strategy from a closure
///
/// ```rust
/// use overseer_core::traits::{FnSource, SampleSource};
///
/// let mut level = 0.0;
/// let mut source = FnSource::new(1, move |_channel| {
///     level += 0.5;
///     Ok(level)
/// });
/// assert_eq!(source.acquire(0), Ok(0.5));
/// ```
pub struct FnSource<F> {
    channels: usize,
    acquire: F,
}

impl<F> FnSource<F>
where
    F: FnMut(usize) -> AcquireResult<f32>,
{
    /// Wrap `acquire` as a source with `channels` channels
    pub fn new(channels: usize, acquire: F) -> Self {
        Self { channels, acquire }
    }
}

impl<F> SampleSource for FnSource<F>
where
    F: FnMut(usize) -> AcquireResult<f32>,
{
    fn channels(&self) -> usize {
        self.channels
    }

    fn acquire(&mut self, channel: usize) -> AcquireResult<f32> {
        if channel >= self.channels {
            return Err(AcquireError::UnknownChannel { channel });
        }
        (self.acquire)(channel)
    }
}

/// Trait for values that can be fed to the filter
pub trait Validatable {
    /// Check if the value is a usable number (not NaN, not infinite)
    fn is_valid(&self) -> bool;
}

impl Validatable for f32 {
    fn is_valid(&self) -> bool {
        self.is_finite()
    }
}

impl Validatable for f64 {
    fn is_valid(&self) -> bool {
        self.is_finite()
    }
}
