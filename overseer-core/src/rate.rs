//! Samples-per-second estimation
//!
//! The rate is derived from inter-arrival deltas and smoothed with its own
//! EMA. A tick whose timestamp does not move forward (duplicate timestamp or
//! clock stepping back) cannot yield a rate; it is counted as dropped and the
//! previous estimate is carried. The sample itself is still processed by the
//! channel, only the rate bookkeeping skips it.

use crate::{
    constants::time::MS_PER_SECOND,
    errors::{check_unit_alpha, ConfigError, ConfigResult},
    time::Timestamp,
};

/// Result of one rate update
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RateUpdate {
    /// First sample: only the timestamp was recorded
    Seeded,
    /// New smoothed estimate
    Updated {
        /// Samples per second
        rate: f32,
    },
    /// `now <= last`; estimate carried forward
    ClockRegression {
        /// Previous sample time
        last: Timestamp,
        /// Offending sample time
        now: Timestamp,
    },
}

/// One estimator step
///
/// Pure function of its inputs. Returns the new estimate (or the carried one)
/// alongside what happened.
pub fn estimate_rate(
    now: Timestamp,
    last_time: Option<Timestamp>,
    prev_rate: f32,
    alpha: f32,
) -> (f32, RateUpdate) {
    let Some(last) = last_time else {
        return (prev_rate, RateUpdate::Seeded);
    };

    if now <= last {
        return (prev_rate, RateUpdate::ClockRegression { last, now });
    }

    let delta_ms = (now - last) as f32;
    let instant = MS_PER_SECOND as f32 / delta_ms;
    let rate = alpha * instant + (1.0 - alpha) * prev_rate;
    (rate, RateUpdate::Updated { rate })
}

/// Stateful estimator for one channel
#[derive(Debug, Clone)]
pub struct RateEstimator {
    alpha: f32,
    last_time: Option<Timestamp>,
    rate: f32,
    dropped: u64,
}

impl RateEstimator {
    /// Create an estimator with smoothing factor `alpha` in (0, 1]
    pub fn new(alpha: f32) -> ConfigResult<Self> {
        if !check_unit_alpha(alpha) {
            return Err(ConfigError::InvalidRateAlpha { alpha });
        }
        Ok(Self {
            alpha,
            last_time: None,
            rate: 0.0,
            dropped: 0,
        })
    }

    /// Record a sample arriving at `now`
    pub fn update(&mut self, now: Timestamp) -> RateUpdate {
        let (rate, update) = estimate_rate(now, self.last_time, self.rate, self.alpha);
        self.rate = rate;

        if let RateUpdate::ClockRegression { last, now } = update {
            self.dropped += 1;
            log_warn!("clock regression: last={} now={}, sample dropped from rate", last, now);
        }

        self.last_time = Some(now);
        update
    }

    /// Current smoothed samples per second
    pub fn rate(&self) -> f32 {
        self.rate
    }

    /// Time of the last recorded sample
    pub fn last_time(&self) -> Option<Timestamp> {
        self.last_time
    }

    /// Samples that could not contribute a rate
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_sample_only_seeds() {
        assert_eq!(estimate_rate(1_000, None, 0.0, 0.05), (0.0, RateUpdate::Seeded));
    }

    #[test]
    fn rate_from_delta() {
        // 100 ms apart = 10 Hz instant; alpha 1 takes it verbatim
        let (rate, update) = estimate_rate(1_100, Some(1_000), 0.0, 1.0);
        assert_eq!(rate, 10.0);
        assert_eq!(update, RateUpdate::Updated { rate: 10.0 });

        // alpha 0.5 blends with the previous 2 Hz
        let (rate, _) = estimate_rate(1_100, Some(1_000), 2.0, 0.5);
        assert_eq!(rate, 6.0);
    }

    #[test]
    fn duplicate_timestamp_is_regression() {
        let (rate, update) = estimate_rate(1_000, Some(1_000), 4.0, 0.5);
        assert_eq!(rate, 4.0);
        assert_eq!(update, RateUpdate::ClockRegression { last: 1_000, now: 1_000 });
    }

    #[test]
    fn estimator_counts_drops_and_carries_rate() {
        let mut estimator = RateEstimator::new(1.0).unwrap();
        assert_eq!(estimator.update(1_000), RateUpdate::Seeded);
        assert_eq!(estimator.update(1_500), RateUpdate::Updated { rate: 2.0 });

        assert!(matches!(estimator.update(1_200), RateUpdate::ClockRegression { .. }));
        assert_eq!(estimator.rate(), 2.0);
        assert_eq!(estimator.dropped(), 1);
        assert_eq!(estimator.last_time(), Some(1_200));

        // Measured from the regressed timestamp
        assert_eq!(estimator.update(1_450), RateUpdate::Updated { rate: 4.0 });
    }

    #[test]
    fn converges_to_steady_rate() {
        let mut estimator = RateEstimator::new(0.05).unwrap();
        let mut now = 0;
        for _ in 0..400 {
            now += 500;
            estimator.update(now);
        }
        assert!((estimator.rate() - 2.0).abs() < 0.01);
    }

    #[test]
    fn rejects_bad_alpha() {
        assert!(matches!(
            RateEstimator::new(0.0),
            Err(ConfigError::InvalidRateAlpha { .. })
        ));
    }
}
