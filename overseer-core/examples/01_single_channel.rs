//! Single Channel Example
//!
//! Feeds a current-clamp style signal into one channel and prints what the
//! engine makes of it: smoothed value, spike passthrough, rolling window
//! peaks and the lifetime peak.
//!
//! ## What You'll Learn
//!
//! - Configuring a channel (smoothing, spike threshold, valid range, windows)
//! - Ticking it with good and bad readings
//! - Reading the snapshot
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 01_single_channel
//! ```

use overseer_core::{
    AcquireError, ChannelConfig, ChannelEngine, ConfigError, FixedTime, TickOutcome, TimeSource,
    WindowSpec,
};

fn main() -> Result<(), ConfigError> {
    println!("Overseer Single Channel Example");
    println!("===============================\n");

    let config = ChannelConfig::default()
        .with_alpha(0.1)
        .with_spike_threshold(0.3)
        .with_valid_range(-35.0, 35.0)
        .with_windows(WindowSpec::new(&[1, 5, 10])?);
    let mut current: ChannelEngine<512> = ChannelEngine::new("current", config)?;

    let mut clock = FixedTime::new(0);

    // 2 A load, a 12 A inrush, one failed conversion, one implausible value
    let readings: [Result<f32, AcquireError>; 12] = [
        Ok(2.0),
        Ok(2.05),
        Ok(1.98),
        Ok(2.02),
        Ok(2.01),
        Ok(2.0),
        Ok(12.0),
        Ok(2.1),
        Err(AcquireError::Timeout),
        Ok(2.0),
        Ok(99.0),
        Ok(1.99),
    ];

    for reading in readings {
        clock.advance(500);
        match current.tick(clock.now(), reading) {
            TickOutcome::Accepted { conditioned, .. } => println!(
                "t={:5}ms raw={:>6.2} A smoothed={:>6.3} A{}",
                clock.now(),
                reading.unwrap_or_default(),
                conditioned.smoothed,
                if conditioned.spike { "  (spike passthrough)" } else { "" }
            ),
            TickOutcome::BadRead(error) => {
                println!("t={:5}ms rejected: {}", clock.now(), error)
            }
        }
    }

    let snapshot = current.snapshot();
    println!("\nSnapshot:");
    println!("  {}", snapshot);
    for window in snapshot.windows.iter() {
        println!("  peak over {:>4}: {:.3} A", window.label, window.max_abs);
    }
    println!(
        "  lifetime peak: {:.3} A (signed {:+.3})",
        snapshot.lifetime.max_abs, snapshot.lifetime.direction
    );

    Ok(())
}
