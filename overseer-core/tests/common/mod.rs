//! Shared fixtures for integration tests
//!
//! - Deterministic signal generators (no RNG crate, reproducible runs)
//! - Channel builders with small history capacities
//! - Tick drivers that feed a series into a channel

#![allow(dead_code)]

pub mod generators;

use overseer_core::{
    ChannelConfig, ChannelEngine, TickOutcome, Timestamp, WindowSpec,
};

/// History capacity used by most integration tests
pub const TEST_CAPACITY: usize = 256;

/// Channel with the default filter and the given windows
pub fn channel_with_windows(windows: &[u32]) -> ChannelEngine<TEST_CAPACITY> {
    let spec = WindowSpec::new(windows).expect("valid windows");
    ChannelEngine::new("test", ChannelConfig::default().with_windows(spec)).expect("valid config")
}

/// Channel that follows the input exactly (alpha 1, no spike passthrough)
pub fn passthrough_channel(windows: &[u32]) -> ChannelEngine<TEST_CAPACITY> {
    let spec = WindowSpec::new(windows).expect("valid windows");
    let config = ChannelConfig::default()
        .with_alpha(1.0)
        .with_spike_threshold(f32::MAX)
        .with_windows(spec);
    ChannelEngine::new("passthrough", config).expect("valid config")
}

/// Feed `(timestamp, value)` pairs and collect the outcomes
pub fn feed<const N: usize>(
    channel: &mut ChannelEngine<N>,
    series: &[(Timestamp, f32)],
) -> Vec<TickOutcome> {
    series
        .iter()
        .map(|&(now, value)| channel.tick(now, Ok(value)))
        .collect()
}

/// Float comparison with an absolute tolerance
pub fn approx_eq(a: f32, b: f32, tolerance: f32) -> bool {
    (a - b).abs() <= tolerance
}
