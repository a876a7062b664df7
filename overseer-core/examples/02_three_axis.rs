//! Three-Axis Sensor Example
//!
//! One `SensorEngine` per physical part: a closure plays the accelerometer
//! and supplies x, y and z; the engine runs the same pipeline on each axis.
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 02_three_axis
//! ```

use overseer_core::{ChannelConfig, ConfigError, FnSource, SensorEngine};

fn main() -> Result<(), ConfigError> {
    println!("Overseer Three-Axis Example");
    println!("===========================\n");

    // Resting on a table with a knock on the x axis every 40 ticks
    let mut tick = 0u32;
    let accelerometer = FnSource::new(3, move |axis| {
        if axis == 0 {
            tick += 1;
        }
        let knock = if tick % 40 == 0 { 2.5 } else { 0.0 };
        Ok(match axis {
            0 => 0.01 + knock,
            1 => -0.02,
            _ => 1.0,
        })
    });

    let config = ChannelConfig::default().with_alpha(0.1).with_spike_threshold(3.0);
    let mut imu: SensorEngine<_, 3, 1024> =
        SensorEngine::new(accelerometer, ["accel_x", "accel_y", "accel_z"], config)?;

    // 100 Hz for 10 seconds
    for step in 0..1_000u64 {
        imu.tick(step * 10);
    }

    for snapshot in imu.snapshot() {
        println!("{}", snapshot);
    }

    Ok(())
}
