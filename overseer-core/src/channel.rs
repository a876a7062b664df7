//! Channel Engine
//!
//! ## Overview
//!
//! One `ChannelEngine` tracks one scalar stream: one accelerometer axis, one
//! current reading, one humidity value. It composes the pipeline stages and
//! owns their state exclusively:
//!
//! ```text
//!  raw ──► screen ──► condition ──► lifetime peak
//!                         │
//!                         ▼
//!                  history append ──► prune ──► window peaks
//!                         │
//!                         ▼
//!                  rate estimate ──► counters
//! ```
//!
//! ## Lifecycle
//!
//! `Uninitialized → Active`. The transition happens on the first successful
//! acquisition; there is no shutdown state.
//!
//! ## Failure handling
//!
//! A failed or implausible reading (collaborator error, NaN, outside the
//! configured valid range) increments `bad_reads` and changes nothing else.
//! A timestamp that does not move forward is still conditioned and stored;
//! only the rate estimator skips it and counts it as dropped. Nothing in
//! [`ChannelEngine::tick`] returns an error or panics.
//!
//! ## Usage Example
//!
//! ```rust
//! use overseer_core::{ChannelConfig, ChannelEngine, TickOutcome};
//!
//! let config = ChannelConfig::default()
//!     .with_alpha(0.2)
//!     .with_spike_threshold(1.5)
//!     .with_valid_range(-35.0, 35.0);
//! let mut current: ChannelEngine<256> = ChannelEngine::new("current", config)?;
//!
//! current.tick(0, Ok(1.0));
//! current.tick(100, Ok(1.2));
//!
//! let snapshot = current.snapshot();
//! assert_eq!(snapshot.total_samples, 2);
//! assert!(snapshot.windows.get("1s").unwrap() > 1.0);
//! # Ok::<(), overseer_core::ConfigError>(())
//! ```

use crate::{
    buffer::{HistoryBuffer, Sample},
    conditioner::{Conditioned, SignalConditioner},
    constants::{
        buffers::DEFAULT_HISTORY_CAPACITY,
        filter::{DEFAULT_RATE_ALPHA, DEFAULT_SMOOTHING_ALPHA, DEFAULT_SPIKE_THRESHOLD},
    },
    errors::{check_range, AcquireError, AcquireResult, ConfigError, ConfigResult},
    extremum::LifetimeExtremum,
    rate::{RateEstimator, RateUpdate},
    snapshot::ChannelSnapshot,
    time::Timestamp,
    traits::Validatable,
    window::{self, WindowMaxima, WindowSpec},
};

/// Construction parameters of one channel
///
/// Values only; where they come from (constants, a config file, a remote
/// command) is the caller's business.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChannelConfig {
    /// EMA smoothing factor, (0, 1]
    pub alpha: f32,
    /// Divergence between smoothed and raw that triggers passthrough
    pub spike_threshold: f32,
    /// EMA factor of the samples-per-second estimate, (0, 1]
    pub rate_alpha: f32,
    /// Rolling windows reported by the channel
    pub windows: WindowSpec,
    /// Physically plausible raw range; readings outside are bad reads
    pub valid_range: Option<(f32, f32)>,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_SMOOTHING_ALPHA,
            spike_threshold: DEFAULT_SPIKE_THRESHOLD,
            rate_alpha: DEFAULT_RATE_ALPHA,
            windows: WindowSpec::standard(),
            valid_range: None,
        }
    }
}

impl ChannelConfig {
    /// Set the smoothing factor
    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }

    /// Set the spike passthrough threshold
    pub fn with_spike_threshold(mut self, threshold: f32) -> Self {
        self.spike_threshold = threshold;
        self
    }

    /// Set the rate estimator smoothing factor
    pub fn with_rate_alpha(mut self, alpha: f32) -> Self {
        self.rate_alpha = alpha;
        self
    }

    /// Replace the window set
    pub fn with_windows(mut self, windows: WindowSpec) -> Self {
        self.windows = windows;
        self
    }

    /// Reject raw readings outside `[min, max]`
    pub fn with_valid_range(mut self, min: f32, max: f32) -> Self {
        self.valid_range = Some((min, max));
        self
    }

    /// Check every parameter; called by [`ChannelEngine::new`]
    pub fn validate(&self) -> ConfigResult<()> {
        // Conditioner and estimator carry their own checks
        SignalConditioner::new(self.alpha, self.spike_threshold)?;
        RateEstimator::new(self.rate_alpha)?;

        if self.windows.is_empty() {
            return Err(ConfigError::EmptyWindows);
        }

        if let Some((min, max)) = self.valid_range {
            if !(min.is_valid() && max.is_valid() && min <= max) {
                return Err(ConfigError::InvalidRange { min, max });
            }
        }

        Ok(())
    }
}

/// Lifecycle phase of a channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ChannelPhase {
    /// No successful acquisition yet
    #[default]
    Uninitialized,
    /// Running the full pipeline on every tick
    Active,
}

/// What one tick did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// Sample went through the pipeline
    Accepted {
        /// Conditioner output
        conditioned: Conditioned,
        /// Rate estimator result (includes clock regression)
        rate: RateUpdate,
    },
    /// Sample rejected; only `bad_reads` changed
    BadRead(AcquireError),
}

impl TickOutcome {
    /// True unless the reading was rejected
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }
}

/// Conditioning and extremum pipeline for one scalar stream
#[derive(Debug, Clone)]
pub struct ChannelEngine<const N: usize = DEFAULT_HISTORY_CAPACITY> {
    label: &'static str,
    windows: WindowSpec,
    valid_range: Option<(f32, f32)>,
    phase: ChannelPhase,

    conditioner: SignalConditioner,
    lifetime: LifetimeExtremum,
    history: HistoryBuffer<N>,
    window_maxima: WindowMaxima,
    rate: RateEstimator,

    current_raw: f32,
    current_smoothed: f32,
    total_samples: u64,
    bad_reads: u64,
    last_update: Option<Timestamp>,
    last_error: Option<AcquireError>,
}

impl<const N: usize> ChannelEngine<N> {
    /// Create a channel; fails fast on invalid parameters
    pub fn new(label: &'static str, config: ChannelConfig) -> ConfigResult<Self> {
        config.validate()?;

        Ok(Self {
            label,
            window_maxima: WindowMaxima::zeroed(&config.windows),
            conditioner: SignalConditioner::new(config.alpha, config.spike_threshold)?,
            rate: RateEstimator::new(config.rate_alpha)?,
            windows: config.windows,
            valid_range: config.valid_range,
            phase: ChannelPhase::Uninitialized,
            lifetime: LifetimeExtremum::default(),
            history: HistoryBuffer::new(),
            current_raw: 0.0,
            current_smoothed: 0.0,
            total_samples: 0,
            bad_reads: 0,
            last_update: None,
            last_error: None,
        })
    }

    /// Run one update with the reading acquired at `now`
    pub fn tick(&mut self, now: Timestamp, reading: AcquireResult<f32>) -> TickOutcome {
        let raw = match reading.and_then(|value| self.screen(value)) {
            Ok(raw) => raw,
            Err(error) => {
                self.bad_reads += 1;
                self.last_error = Some(error);
                log_debug!("{}: bad read at {}: {:?}", self.label, now, error);
                return TickOutcome::BadRead(error);
            }
        };

        if self.phase == ChannelPhase::Uninitialized {
            self.phase = ChannelPhase::Active;
            log_debug!("{}: active at {}", self.label, now);
        }

        let conditioned = self.conditioner.apply(raw);
        self.lifetime.update(conditioned.smoothed);

        // A regressed clock must not unsort the history
        let stamp = self
            .history
            .newest()
            .map_or(now, |newest| newest.timestamp.max(now));
        self.history.append(Sample::new(stamp, conditioned.smoothed));
        self.history.prune(stamp, self.windows.largest_ms());
        self.window_maxima = window::compute(&self.history, &self.windows, stamp);

        let rate = self.rate.update(now);

        self.current_raw = raw;
        self.current_smoothed = conditioned.smoothed;
        self.total_samples += 1;
        self.last_update = Some(now);
        self.last_error = None;

        TickOutcome::Accepted { conditioned, rate }
    }

    /// Reject non-finite and out-of-range readings
    fn screen(&self, value: f32) -> AcquireResult<f32> {
        if !value.is_valid() {
            return Err(AcquireError::InvalidValue);
        }
        match self.valid_range {
            Some((min, max)) => check_range(value, min, max),
            None => Ok(value),
        }
    }

    /// Point-in-time copy of the channel state
    pub fn snapshot(&self) -> ChannelSnapshot {
        ChannelSnapshot {
            label: self.label,
            phase: self.phase,
            raw: self.current_raw,
            smoothed: self.current_smoothed,
            lifetime: self.lifetime,
            windows: self.window_maxima.clone(),
            total_samples: self.total_samples,
            dropped_samples: self.rate.dropped(),
            bad_reads: self.bad_reads,
            spikes: self.conditioner.spikes(),
            evicted_samples: self.history.evicted(),
            history_len: self.history.len(),
            samples_per_second: self.rate.rate(),
            last_update: self.last_update,
            last_error: self.last_error,
        }
    }

    /// Channel name used in logs and snapshots
    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Current lifecycle phase
    pub fn phase(&self) -> ChannelPhase {
        self.phase
    }

    /// Latest smoothed value
    pub fn smoothed(&self) -> f32 {
        self.current_smoothed
    }

    /// All-time peak
    pub fn lifetime(&self) -> LifetimeExtremum {
        self.lifetime
    }

    /// Latest window peaks
    pub fn window_maxima(&self) -> &WindowMaxima {
        &self.window_maxima
    }

    /// Retained history, oldest first
    pub fn history(&self) -> &HistoryBuffer<N> {
        &self.history
    }

    /// Configured windows
    pub fn windows(&self) -> &WindowSpec {
        &self.windows
    }
}
