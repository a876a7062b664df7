//! Time-Ordered History Buffer for Rolling Windows
//!
//! ## Overview
//!
//! Each channel keeps the smoothed samples it produced over the largest
//! configured window (30 minutes by default). The window aggregator scans this
//! history on every update, so it has to stay sorted and it has to stay small.
//!
//! ## Design Rationale
//!
//! ### Pruning by age
//!
//! Samples are appended at the tail with non-decreasing timestamps, which
//! means the oldest sample is always at the head. Pruning is a single forward
//! scan that pops the head while it is older than `now - max_window_ms`:
//!
//! ```text
//!   cutoff = now - max_window_ms
//!       │
//!  ┌────┼────┬─────┬─────┬─────┐
//!  │ t0 │ t1 │ t2  │ t3  │ t4  │   t0 < cutoff <= t1
//!  └────┴────┴─────┴─────┴─────┘
//!    ↑ popped          newest ↑
//! ```
//!
//! Cost is O(removed) per call, amortised O(1) per sample.
//!
//! ### Hard ceiling
//!
//! Age-based pruning alone bounds the buffer by
//! `max_window_ms / min_inter_sample_time`, which is unbounded if the sample
//! rate jumps or the clock misbehaves. Storage is therefore a
//! `heapless::Deque<Sample, N>` and, when full, the oldest sample is evicted
//! before the new one goes in. Evictions are counted so callers can tell that
//! their longest windows are no longer fully covered.
//!
//! ## Usage Example
//!
//! ```rust
//! use overseer_core::buffer::{HistoryBuffer, Sample};
//!
//! let mut history: HistoryBuffer<8> = HistoryBuffer::new();
//! history.append(Sample::new(1_000, 0.5));
//! history.append(Sample::new(7_000, -1.5));
//!
//! // Keep the last 5 seconds as of t=8000
//! let removed = history.prune(8_000, 5_000);
//! assert_eq!(removed, 1);
//! assert_eq!(history.oldest().map(|s| s.timestamp), Some(7_000));
//! ```

use heapless::Deque;

use crate::time::Timestamp;

/// One conditioned value at one instant
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sample {
    /// Monotonic milliseconds
    pub timestamp: Timestamp,
    /// Signed value as produced by the conditioner
    pub value: f32,
}

impl Sample {
    /// Create a sample
    pub const fn new(timestamp: Timestamp, value: f32) -> Self {
        Self { timestamp, value }
    }
}

/// Bounded, oldest-first record of recent samples for one channel
///
/// ## Type Parameter
///
/// - `N`: hard ceiling on stored samples. Size it for the largest window at
///   the expected sample rate; 30 minutes at 2 Hz needs 3600.
///
/// ## Internal Invariants
///
/// - Timestamps are non-decreasing from head to tail (callers append in order)
/// - `len() <= N`
#[derive(Debug, Clone)]
pub struct HistoryBuffer<const N: usize> {
    samples: Deque<Sample, N>,
    evicted: u64,
}

impl<const N: usize> HistoryBuffer<N> {
    /// Creates an empty buffer
    pub const fn new() -> Self {
        Self {
            samples: Deque::new(),
            evicted: 0,
        }
    }

    /// Append a sample at the tail
    ///
    /// Caller guarantees `sample.timestamp` is not older than [`newest`](Self::newest).
    /// When the buffer is full the oldest sample is dropped first.
    pub fn append(&mut self, sample: Sample) {
        debug_assert!(
            self.newest().map_or(true, |last| last.timestamp <= sample.timestamp),
            "history appended out of order"
        );

        if self.samples.is_full() {
            self.samples.pop_front();
            self.evicted += 1;
            log_warn!("history full at {} samples, evicting oldest", N);
        }

        // Cannot fail: a slot was freed above if there was none
        let _ = self.samples.push_back(sample);
    }

    /// Remove every sample with `timestamp < now - max_window_ms`
    ///
    /// Returns the number of samples removed.
    pub fn prune(&mut self, now: Timestamp, max_window_ms: u64) -> usize {
        let cutoff = now.saturating_sub(max_window_ms);
        let mut removed = 0;

        while let Some(head) = self.samples.front() {
            if head.timestamp >= cutoff {
                break;
            }
            self.samples.pop_front();
            removed += 1;
        }

        removed
    }

    /// Number of stored samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if buffer is empty
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Check if the hard ceiling is reached
    pub fn is_full(&self) -> bool {
        self.samples.is_full()
    }

    /// Hard ceiling `N`
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Oldest retained sample
    pub fn oldest(&self) -> Option<&Sample> {
        self.samples.front()
    }

    /// Most recent sample
    pub fn newest(&self) -> Option<&Sample> {
        self.samples.back()
    }

    /// Samples dropped by the hard ceiling since creation
    pub fn evicted(&self) -> u64 {
        self.evicted
    }

    /// Iterate from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &Sample> + '_ {
        self.samples.iter()
    }

    /// Drop all samples (eviction count is kept)
    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

impl<const N: usize> Default for HistoryBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled<const N: usize>(timestamps: &[u64]) -> HistoryBuffer<N> {
        let mut buffer = HistoryBuffer::new();
        for (i, &t) in timestamps.iter().enumerate() {
            buffer.append(Sample::new(t, i as f32));
        }
        buffer
    }

    #[test]
    fn empty_buffer() {
        let buffer: HistoryBuffer<5> = HistoryBuffer::new();
        assert!(buffer.is_empty());
        assert_eq!(buffer.len(), 0);
        assert_eq!(buffer.capacity(), 5);
        assert!(buffer.oldest().is_none());
        assert!(buffer.newest().is_none());
    }

    #[test]
    fn append_keeps_order() {
        let buffer = filled::<8>(&[10, 20, 20, 30]);
        let timestamps: Vec<u64> = buffer.iter().map(|s| s.timestamp).collect();
        assert_eq!(timestamps, vec![10, 20, 20, 30]);
        assert_eq!(buffer.newest().unwrap().value, 3.0);
    }

    #[test]
    fn prune_removes_only_stale_head() {
        let mut buffer = filled::<8>(&[1_000, 2_000, 3_000, 4_000]);

        // cutoff = 4500 - 2000 = 2500
        assert_eq!(buffer.prune(4_500, 2_000), 2);
        assert_eq!(buffer.oldest().unwrap().timestamp, 3_000);

        // Entry exactly at the cutoff survives
        assert_eq!(buffer.prune(5_000, 2_000), 0);
        assert_eq!(buffer.len(), 2);
    }

    #[test]
    fn prune_before_window_elapsed() {
        let mut buffer = filled::<4>(&[0, 100]);
        // now < max_window: cutoff saturates at zero
        assert_eq!(buffer.prune(500, 1_800_000), 0);
        assert_eq!(buffer.len(), 2);
    }

    #[test]
    fn hard_ceiling_evicts_oldest() {
        let mut buffer = filled::<3>(&[1, 2, 3]);
        assert!(buffer.is_full());

        buffer.append(Sample::new(4, 9.0));
        buffer.append(Sample::new(5, 9.5));

        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.evicted(), 2);
        let timestamps: Vec<u64> = buffer.iter().map(|s| s.timestamp).collect();
        assert_eq!(timestamps, vec![3, 4, 5]);
    }

    #[test]
    fn clear_keeps_eviction_count() {
        let mut buffer = filled::<2>(&[1, 2, 3]);
        buffer.clear();
        assert!(buffer.is_empty());
        assert_eq!(buffer.evicted(), 1);
    }
}
