//! Application context
//!
//! ## Overview
//!
//! The [`Monitor`] owns exactly one engine per sensor family and is driven by
//! the firmware's main loop:
//!
//! ```text
//! loop {
//!     let now = clock.now();
//!     monitor.poll(now);      // ticks whatever is due, reports when due
//!     // ... display, radio, sleep
//! }
//! ```
//!
//! Nothing here is global. Tests build as many monitors as they like, each
//! with its own mock parts.
//!
//! ## Scheduling
//!
//! Every family has an [`Interval`]. A poll that finds a family due ticks its
//! engine once; a poll between due times does nothing for that family. The
//! report interval works the same way.

use core::fmt;

use overseer_core::{
    constants::DEFAULT_HISTORY_CAPACITY, ChannelSnapshot, SensorEngine, TickOutcome, Timestamp,
};

use crate::{
    config::MonitorConfig,
    energy::{AdcChannel, CurrentSource},
    environment::{EnvironmentSource, Hygrometer},
    errors::{DeviceError, DeviceResult},
    imu::{Attitude, ImuSource, MotionBus},
};

/// Fixed-period schedule gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    period_ms: u64,
    last: Option<Timestamp>,
}

impl Interval {
    /// Gate that opens every `period_ms`
    pub fn new(period_ms: u64) -> DeviceResult<Self> {
        if period_ms == 0 {
            return Err(DeviceError::ZeroInterval);
        }
        Ok(Self { period_ms, last: None })
    }

    /// True (and re-armed) when a period has elapsed since the last opening
    ///
    /// The first call always opens. A clock that went backwards re-arms the
    /// gate from the new time instead of stalling until it catches up.
    pub fn due(&mut self, now: Timestamp) -> bool {
        let due = match self.last {
            None => true,
            Some(last) if now < last => true,
            Some(last) => now - last >= self.period_ms,
        };
        if due {
            self.last = Some(now);
        }
        due
    }

    /// Configured period
    pub fn period_ms(&self) -> u64 {
        self.period_ms
    }

    /// Time of the last opening
    pub fn last(&self) -> Option<Timestamp> {
        self.last
    }
}

/// Optional gate: `None` when the family is disabled
fn schedule(enabled: bool, period_ms: u64) -> DeviceResult<Option<Interval>> {
    if enabled {
        Interval::new(period_ms).map(Some)
    } else {
        Ok(None)
    }
}

fn due(gate: &mut Option<Interval>, now: Timestamp) -> bool {
    gate.as_mut().is_some_and(|gate| gate.due(now))
}

/// What one [`Monitor::poll`] did
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PollSummary {
    /// Outcomes of the inertial tick, if it ran
    pub imu: Option<[TickOutcome; 3]>,
    /// Outcome of the current tick, if it ran
    pub current: Option<[TickOutcome; 1]>,
    /// Outcomes of the environment tick, if it ran
    pub environment: Option<[TickOutcome; 2]>,
    /// A report was emitted
    pub reported: bool,
}

impl PollSummary {
    /// Number of channel ticks that ran
    pub fn ticks(&self) -> usize {
        self.imu.map_or(0, |o| o.len())
            + self.current.map_or(0, |o| o.len())
            + self.environment.map_or(0, |o| o.len())
    }
}

/// Observable state of every family
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MonitorSnapshot {
    /// Accelerometer x, y, z
    pub imu: [ChannelSnapshot; 3],
    /// Pitch and roll from the last burst
    pub attitude: Attitude,
    /// Load current
    pub current: ChannelSnapshot,
    /// Humidity and temperature
    pub environment: [ChannelSnapshot; 2],
}

impl fmt::Display for MonitorSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== IMU ===")?;
        writeln!(
            f,
            "pitch={:.2} deg roll={:.2} deg",
            self.attitude.pitch_deg, self.attitude.roll_deg
        )?;
        for axis in &self.imu {
            writeln!(f, "{}", axis)?;
        }
        writeln!(f, "=== ENERGY ===")?;
        writeln!(f, "{}", self.current)?;
        writeln!(f, "=== ENVIRONMENT ===")?;
        for channel in &self.environment {
            writeln!(f, "{}", channel)?;
        }
        Ok(())
    }
}

/// One engine per sensor family plus their schedules
pub struct Monitor<B, A, H, const N: usize = DEFAULT_HISTORY_CAPACITY> {
    imu: SensorEngine<ImuSource<B>, 3, N>,
    current: SensorEngine<CurrentSource<A>, 1, N>,
    environment: SensorEngine<EnvironmentSource<H>, 2, N>,

    imu_schedule: Option<Interval>,
    current_schedule: Option<Interval>,
    environment_schedule: Option<Interval>,
    report_schedule: Option<Interval>,

    polls: u64,
    reports: u64,
}

impl<B, A, H, const N: usize> Monitor<B, A, H, N>
where
    B: MotionBus,
    A: AdcChannel,
    H: Hygrometer,
{
    /// Assemble the monitor around the three parts
    pub fn new(config: &MonitorConfig, motion: B, adc: A, hygrometer: H) -> DeviceResult<Self> {
        let imu = SensorEngine::with_configs(
            ImuSource::new(motion, config.imu.range),
            config.imu.channels(),
        )?;
        let current = SensorEngine::with_configs(
            CurrentSource::new(adc, config.current.sensor)?,
            config.current.channels(),
        )?;
        let environment = SensorEngine::with_configs(
            EnvironmentSource::new(hygrometer, config.environment.model),
            config.environment.channels(),
        )?;

        Ok(Self {
            imu,
            current,
            environment,
            imu_schedule: schedule(config.imu.enabled, config.imu.update_interval_ms)?,
            current_schedule: schedule(config.current.enabled, config.current.update_interval_ms)?,
            environment_schedule: schedule(
                config.environment.enabled,
                config.environment.effective_interval_ms(),
            )?,
            report_schedule: schedule(config.reporting, config.report_interval_ms)?,
            polls: 0,
            reports: 0,
        })
    }

    /// Tick every family that is due at `now`, then report if due
    pub fn poll(&mut self, now: Timestamp) -> PollSummary {
        self.polls += 1;

        let imu = due(&mut self.imu_schedule, now).then(|| self.imu.tick(now));
        let current = due(&mut self.current_schedule, now).then(|| self.current.tick(now));
        let environment =
            due(&mut self.environment_schedule, now).then(|| self.environment.tick(now));

        let reported = due(&mut self.report_schedule, now);
        if reported {
            self.report(now);
        }

        PollSummary {
            imu,
            current,
            environment,
            reported,
        }
    }

    fn report(&mut self, _now: Timestamp) {
        self.reports += 1;

        #[cfg(feature = "log")]
        {
            let snapshot = self.snapshot();
            log::info!("report #{} at {} ms", self.reports, _now);
            log::info!(
                "attitude: pitch={:.2} roll={:.2}",
                snapshot.attitude.pitch_deg,
                snapshot.attitude.roll_deg
            );
            for channel in snapshot.imu.iter().chain([&snapshot.current]).chain(&snapshot.environment) {
                log::info!("{}", channel);
            }
        }
    }

    /// Point-in-time copy of every channel
    pub fn snapshot(&self) -> MonitorSnapshot {
        let [current] = self.current.snapshot();
        MonitorSnapshot {
            imu: self.imu.snapshot(),
            attitude: self.imu.source().attitude(),
            current,
            environment: self.environment.snapshot(),
        }
    }

    /// Inertial engine
    pub fn imu(&self) -> &SensorEngine<ImuSource<B>, 3, N> {
        &self.imu
    }

    /// Inertial engine, mutably (driver access)
    pub fn imu_mut(&mut self) -> &mut SensorEngine<ImuSource<B>, 3, N> {
        &mut self.imu
    }

    /// Current engine
    pub fn current(&self) -> &SensorEngine<CurrentSource<A>, 1, N> {
        &self.current
    }

    /// Current engine, mutably (offset changes, driver access)
    pub fn current_mut(&mut self) -> &mut SensorEngine<CurrentSource<A>, 1, N> {
        &mut self.current
    }

    /// Environment engine
    pub fn environment(&self) -> &SensorEngine<EnvironmentSource<H>, 2, N> {
        &self.environment
    }

    /// Environment engine, mutably (driver access)
    pub fn environment_mut(&mut self) -> &mut SensorEngine<EnvironmentSource<H>, 2, N> {
        &mut self.environment
    }

    /// Calls to [`poll`](Self::poll)
    pub fn polls(&self) -> u64 {
        self.polls
    }

    /// Reports emitted
    pub fn reports(&self) -> u64 {
        self.reports
    }
}
