//! Deterministic test series
//!
//! A linear congruential generator keeps the noise reproducible between runs
//! and platforms.

use overseer_core::Timestamp;

/// Minimal LCG noise source
pub struct Noise {
    seed: u32,
}

impl Noise {
    pub fn new(seed: u32) -> Self {
        Self { seed }
    }

    /// Uniform value in [-amplitude, amplitude]
    pub fn next(&mut self, amplitude: f32) -> f32 {
        self.seed = self.seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        let uniform = self.seed as f32 / u32::MAX as f32;
        (uniform - 0.5) * 2.0 * amplitude
    }
}

/// Constant level with bounded noise at a fixed interval
pub fn noisy_level(
    start: Timestamp,
    interval_ms: u64,
    count: usize,
    level: f32,
    amplitude: f32,
    seed: u32,
) -> Vec<(Timestamp, f32)> {
    let mut noise = Noise::new(seed);
    (0..count)
        .map(|i| (start + i as u64 * interval_ms, level + noise.next(amplitude)))
        .collect()
}

/// Quiet signal with a single impulse at `spike_index`
pub fn impulse(
    start: Timestamp,
    interval_ms: u64,
    count: usize,
    spike_index: usize,
    spike: f32,
) -> Vec<(Timestamp, f32)> {
    (0..count)
        .map(|i| {
            let value = if i == spike_index { spike } else { 0.0 };
            (start + i as u64 * interval_ms, value)
        })
        .collect()
}

/// Sine wave sampled at a fixed interval
pub fn sine(
    start: Timestamp,
    interval_ms: u64,
    count: usize,
    amplitude: f32,
    period_ms: u64,
) -> Vec<(Timestamp, f32)> {
    (0..count)
        .map(|i| {
            let t = i as u64 * interval_ms;
            let phase = 2.0 * core::f32::consts::PI * (t % period_ms) as f32 / period_ms as f32;
            (start + t, amplitude * phase.sin())
        })
        .collect()
}
