//! Multi-channel engine bound to one acquisition strategy
//!
//! A 3-axis accelerometer is one [`SensorEngine`] with three channels, a
//! current clamp is one with a single channel. Every channel runs the same
//! [`ChannelEngine`] pipeline; only the [`SampleSource`] differs.
//!
//! ```rust
//! use overseer_core::{ChannelConfig, FnSource, SensorEngine};
//!
//! let axes = FnSource::new(3, |axis| Ok(axis as f32 * 0.5));
//! let mut sensor: SensorEngine<_, 3, 64> =
//!     SensorEngine::new(axes, ["x", "y", "z"], ChannelConfig::default())?;
//!
//! let outcomes = sensor.tick(1_000);
//! assert!(outcomes.iter().all(|o| o.is_accepted()));
//! assert_eq!(sensor.snapshot()[2].smoothed, 1.0);
//! # Ok::<(), overseer_core::ConfigError>(())
//! ```

use heapless::Vec;

use crate::{
    channel::{ChannelConfig, ChannelEngine, TickOutcome},
    constants::buffers::DEFAULT_HISTORY_CAPACITY,
    errors::{ConfigError, ConfigResult},
    snapshot::ChannelSnapshot,
    time::Timestamp,
    traits::SampleSource,
};

/// `C` channels fed by one source, each with `N` samples of history
pub struct SensorEngine<S, const C: usize, const N: usize = DEFAULT_HISTORY_CAPACITY> {
    source: S,
    channels: Vec<ChannelEngine<N>, C>,
    refresh_failures: u64,
}

impl<S, const C: usize, const N: usize> SensorEngine<S, C, N>
where
    S: SampleSource,
{
    /// Same configuration on every channel
    pub fn new(source: S, labels: [&'static str; C], config: ChannelConfig) -> ConfigResult<Self> {
        Self::with_configs(source, labels.map(|label| (label, config.clone())))
    }

    /// Individual configuration per channel
    pub fn with_configs(
        source: S,
        configs: [(&'static str, ChannelConfig); C],
    ) -> ConfigResult<Self> {
        let actual = source.channels();
        if actual != C {
            return Err(ConfigError::ChannelMismatch { expected: C, actual });
        }

        let mut channels = Vec::new();
        for (label, config) in configs {
            // Exactly C pushes into capacity C
            let _ = channels.push(ChannelEngine::new(label, config)?);
        }

        Ok(Self {
            source,
            channels,
            refresh_failures: 0,
        })
    }

    /// Acquire and process one sample per channel
    ///
    /// The source is refreshed once; if that fails every channel records a
    /// bad read with the refresh error.
    pub fn tick(&mut self, now: Timestamp) -> [TickOutcome; C] {
        let refreshed = self.source.refresh();
        if let Err(error) = refreshed {
            self.refresh_failures += 1;
            log_debug!("refresh failed at {}: {:?}", now, error);
        }

        let source = &mut self.source;
        let channels = &mut self.channels;
        core::array::from_fn(|index| {
            let reading = refreshed.and_then(|()| source.acquire(index));
            channels[index].tick(now, reading)
        })
    }

    /// Snapshot of every channel, in channel order
    pub fn snapshot(&self) -> [ChannelSnapshot; C] {
        core::array::from_fn(|index| self.channels[index].snapshot())
    }

    /// Channel by index
    pub fn channel(&self, index: usize) -> Option<&ChannelEngine<N>> {
        self.channels.get(index)
    }

    /// All channels
    pub fn channels(&self) -> &[ChannelEngine<N>] {
        &self.channels
    }

    /// Ticks whose refresh failed
    pub fn refresh_failures(&self) -> u64 {
        self.refresh_failures
    }

    /// The acquisition strategy
    pub fn source(&self) -> &S {
        &self.source
    }

    /// The acquisition strategy, mutably (reconfiguring the part, tests)
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }
}
