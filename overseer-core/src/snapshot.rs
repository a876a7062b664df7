//! Read-only view of a channel for reporting

use core::fmt;

use crate::{
    channel::ChannelPhase, errors::AcquireError, extremum::LifetimeExtremum, time::Timestamp,
    window::WindowMaxima,
};

/// Point-in-time copy of one channel's observable state
///
/// Decoupled from the engine: taking a snapshot never changes anything, and
/// the copy stays valid while the channel keeps ticking.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ChannelSnapshot {
    /// Channel name
    pub label: &'static str,
    /// Lifecycle phase
    pub phase: ChannelPhase,
    /// Last accepted raw reading
    pub raw: f32,
    /// Last smoothed value (signed)
    pub smoothed: f32,
    /// All-time peak
    pub lifetime: LifetimeExtremum,
    /// Peak |smoothed| per configured window
    pub windows: WindowMaxima,
    /// Successfully processed ticks
    pub total_samples: u64,
    /// Ticks skipped by the rate estimator (clock regression)
    pub dropped_samples: u64,
    /// Rejected readings
    pub bad_reads: u64,
    /// Spike passthroughs
    pub spikes: u64,
    /// Samples lost to the history capacity ceiling
    pub evicted_samples: u64,
    /// Samples currently retained
    pub history_len: usize,
    /// Smoothed acquisition rate
    pub samples_per_second: f32,
    /// Time of the last accepted sample
    pub last_update: Option<Timestamp>,
    /// Error of the most recent tick, cleared by the next good one
    pub last_error: Option<AcquireError>,
}

impl ChannelSnapshot {
    /// False while the most recent reading was rejected
    pub fn is_valid(&self) -> bool {
        self.last_error.is_none() && self.phase == ChannelPhase::Active
    }
}

impl fmt::Display for ChannelSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: raw={:.3} smooth={:.3} peak={:.3} ({:+.3}) sps={:.2} total={} dropped={} bad={} spikes={}",
            self.label,
            self.raw,
            self.smoothed,
            self.lifetime.max_abs,
            self.lifetime.direction,
            self.samples_per_second,
            self.total_samples,
            self.dropped_samples,
            self.bad_reads,
            self.spikes,
        )?;
        if !self.windows.is_empty() {
            write!(f, " {}", self.windows)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ChannelConfig, ChannelEngine, WindowSpec};

    #[test]
    fn display_lists_counters_and_windows() {
        let config = ChannelConfig::default().with_windows(WindowSpec::new(&[1, 5]).unwrap());
        let mut channel: ChannelEngine<16> = ChannelEngine::new("x", config).unwrap();
        channel.tick(0, Ok(1.5));

        let text = channel.snapshot().to_string();
        assert!(text.starts_with("x: raw=1.500 smooth=1.500 peak=1.500 (+1.500)"));
        assert!(text.contains("total=1 dropped=0 bad=0"));
        assert!(text.ends_with("[1s]=1.500 [5s]=1.500"));
    }

    #[test]
    fn validity_tracks_last_tick() {
        let mut channel: ChannelEngine<16> =
            ChannelEngine::new("x", ChannelConfig::default()).unwrap();
        assert!(!channel.snapshot().is_valid());

        channel.tick(0, Ok(1.0));
        assert!(channel.snapshot().is_valid());

        channel.tick(10, Err(AcquireError::NotReady));
        assert!(!channel.snapshot().is_valid());
    }
}
