//! Exponential Smoothing with Spike Passthrough
//!
//! ## Filter
//!
//! ```text
//! candidate = alpha * raw + (1 - alpha) * prev_smoothed
//!
//! |candidate - raw| <= spike_threshold  →  smoothed = candidate
//! |candidate - raw| >  spike_threshold  →  smoothed = raw
//! ```
//!
//! `alpha` in (0, 1]: larger is more responsive, smaller is smoother.
//!
//! ## Spike passthrough
//!
//! When the smoothed candidate lags the raw value by more than the threshold,
//! the divergence is taken as a real step rather than noise and the output
//! snaps to the raw value. A genuine 2 g impact therefore shows up in the
//! peaks immediately instead of being averaged away over a dozen samples.
//!
//! The comparison is smoothed-vs-raw. A persistently noisy input whose
//! excursions exceed the threshold will pass through unsmoothed every time.
//!
//! ## Seeding
//!
//! The first sample seeds `prev_smoothed = raw`, so the first output equals
//! the raw value and is never flagged as a spike.

use crate::errors::{check_unit_alpha, ConfigError, ConfigResult};

/// Output of one conditioning step
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Conditioned {
    /// Value to store and report
    pub smoothed: f32,
    /// True when the raw value was passed through unsmoothed
    pub spike: bool,
}

/// One EMA step with spike passthrough
///
/// Pure function; the caller persists `prev_smoothed`.
pub fn condition(raw: f32, prev_smoothed: f32, alpha: f32, spike_threshold: f32) -> Conditioned {
    let candidate = alpha * raw + (1.0 - alpha) * prev_smoothed;

    if libm::fabsf(candidate - raw) > spike_threshold {
        Conditioned { smoothed: raw, spike: true }
    } else {
        Conditioned { smoothed: candidate, spike: false }
    }
}

/// Stateful conditioner for a single channel
#[derive(Debug, Clone)]
pub struct SignalConditioner {
    alpha: f32,
    spike_threshold: f32,
    last_smoothed: Option<f32>,
    spikes: u64,
}

impl SignalConditioner {
    /// Create a conditioner, rejecting parameters that would produce NaN
    pub fn new(alpha: f32, spike_threshold: f32) -> ConfigResult<Self> {
        if !check_unit_alpha(alpha) {
            return Err(ConfigError::InvalidAlpha { alpha });
        }
        if !(spike_threshold.is_finite() && spike_threshold > 0.0) {
            return Err(ConfigError::InvalidSpikeThreshold { threshold: spike_threshold });
        }

        Ok(Self {
            alpha,
            spike_threshold,
            last_smoothed: None,
            spikes: 0,
        })
    }

    /// Condition the next raw value
    pub fn apply(&mut self, raw: f32) -> Conditioned {
        let prev = self.last_smoothed.unwrap_or(raw);
        let out = condition(raw, prev, self.alpha, self.spike_threshold);

        if out.spike {
            self.spikes += 1;
            log_trace!("spike passthrough: raw={} prev={}", raw, prev);
        }

        self.last_smoothed = Some(out.smoothed);
        out
    }

    /// Last smoothed output, `None` before the first sample
    pub fn last(&self) -> Option<f32> {
        self.last_smoothed
    }

    /// Number of spike passthroughs so far
    pub fn spikes(&self) -> u64 {
        self.spikes
    }

    /// Smoothing factor
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Divergence that triggers passthrough
    pub fn spike_threshold(&self) -> f32 {
        self.spike_threshold
    }

    /// Forget the filter state; the next sample seeds again
    pub fn reset(&mut self) {
        self.last_smoothed = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_step_is_smoothed() {
        let out = condition(1.0, 0.0, 0.1, 3.0);
        assert!((out.smoothed - 0.1).abs() < 1e-6);
        assert!(!out.spike);
    }

    #[test]
    fn large_step_passes_through() {
        // candidate = 0.1*100 + 0.9*1 = 10.9, |10.9 - 100| = 89.1 > 3
        let out = condition(100.0, 1.0, 0.1, 3.0);
        assert_eq!(out.smoothed, 100.0);
        assert!(out.spike);
    }

    #[test]
    fn divergence_at_threshold_is_smoothed() {
        // alpha 0.5: candidate = 2.0, |2 - 4| = 2 == threshold
        let out = condition(4.0, 0.0, 0.5, 2.0);
        assert_eq!(out.smoothed, 2.0);
        assert!(!out.spike);
    }

    #[test]
    fn alpha_one_tracks_raw() {
        let out = condition(-7.25, 3.0, 1.0, 0.01);
        assert_eq!(out.smoothed, -7.25);
        assert!(!out.spike);
    }

    #[test]
    fn first_sample_seeds() {
        let mut conditioner = SignalConditioner::new(0.1, 0.3).unwrap();
        assert_eq!(conditioner.last(), None);

        // Large absolute value but no spike: prev is seeded with raw
        let out = conditioner.apply(25.0);
        assert_eq!(out.smoothed, 25.0);
        assert!(!out.spike);
        assert_eq!(conditioner.spikes(), 0);
    }

    #[test]
    fn state_carries_between_calls() {
        let mut conditioner = SignalConditioner::new(0.5, 10.0).unwrap();
        conditioner.apply(0.0);
        let out = conditioner.apply(4.0);
        assert_eq!(out.smoothed, 2.0);
        let out = conditioner.apply(4.0);
        assert_eq!(out.smoothed, 3.0);
        assert_eq!(conditioner.last(), Some(3.0));
    }

    #[test]
    fn spikes_are_counted() {
        let mut conditioner = SignalConditioner::new(0.1, 0.3).unwrap();
        conditioner.apply(0.0);
        conditioner.apply(5.0);
        conditioner.apply(-5.0);
        assert_eq!(conditioner.spikes(), 2);

        conditioner.reset();
        assert_eq!(conditioner.last(), None);
    }

    #[test]
    fn rejects_bad_parameters() {
        assert!(matches!(
            SignalConditioner::new(0.0, 1.0),
            Err(ConfigError::InvalidAlpha { .. })
        ));
        assert!(matches!(
            SignalConditioner::new(1.1, 1.0),
            Err(ConfigError::InvalidAlpha { .. })
        ));
        assert!(matches!(
            SignalConditioner::new(0.1, 0.0),
            Err(ConfigError::InvalidSpikeThreshold { .. })
        ));
        assert!(matches!(
            SignalConditioner::new(0.1, f32::INFINITY),
            Err(ConfigError::InvalidSpikeThreshold { .. })
        ));
    }
}
