//! Rolling Window Peaks
//!
//! ## Overview
//!
//! A channel reports its largest |value| over several trailing horizons at
//! once: the last second, the last five seconds, ... the last thirty minutes.
//! The horizons overlap by construction (the 5 s window contains the 1 s
//! window), so callers get simultaneous visibility at every scale rather than
//! a partition of time.
//!
//! ## Algorithm
//!
//! All windows share one history, pruned to the largest window. The table is
//! recomputed from scratch on every update in a single oldest-to-newest pass:
//!
//! ```text
//! windows  1s   5s   10s  ...      cutoff_i = now - w_i
//! cutoffs  c0 > c1 > c2   ...
//!
//! sample at t belongs to windows k.. where k = first i with t >= cutoff_i
//! peak[k]    = max |v| over samples whose smallest window is k
//! result[i]  = max(peak[0..=i])
//! ```
//!
//! Because timestamps only grow along the history, `k` only shrinks, so the
//! pass is O(history + windows). The prefix maximum makes
//! `result[w1] <= result[w2]` for `w1 < w2` hold structurally.
//!
//! A window with no samples reports `0.0`. Every configured window always
//! has an entry.
//!
//! ## Labels
//!
//! Keys are the duration followed by its unit, `"1s"`, `"300s"`, `"1800s"`.
//! The same [`WindowLabel`] is used when the table is written and when
//! telemetry reads it back.

use core::fmt::{self, Write};

use heapless::{String, Vec};

use crate::{
    buffer::HistoryBuffer,
    constants::{
        buffers::WINDOW_LABEL_CAPACITY,
        time::MS_PER_SECOND,
        windows::{MAX_WINDOWS, STANDARD_WINDOWS_SECS},
    },
    errors::{ConfigError, ConfigResult},
    time::Timestamp,
};

const _: () = assert!(STANDARD_WINDOWS_SECS.len() <= MAX_WINDOWS);

/// Stable map key for one window duration
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct WindowLabel(String<WINDOW_LABEL_CAPACITY>);

impl WindowLabel {
    /// Label for a duration in seconds, e.g. `"30s"`
    pub fn from_secs(secs: u32) -> Self {
        let mut label = String::new();
        // u32 digits plus the unit always fit WINDOW_LABEL_CAPACITY
        let _ = write!(label, "{}s", secs);
        Self(label)
    }

    /// Borrow as `&str`
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for WindowLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PartialEq<str> for WindowLabel {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

/// Ascending set of window durations, fixed after construction
///
/// Serialized as a plain list of seconds; deserializing runs the same checks
/// as [`WindowSpec::new`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(try_from = "Vec<u32, MAX_WINDOWS>", into = "Vec<u32, MAX_WINDOWS>")
)]
pub struct WindowSpec {
    secs: Vec<u32, MAX_WINDOWS>,
}

impl WindowSpec {
    /// Validate and build a window set
    ///
    /// Durations must be non-zero and strictly ascending.
    pub fn new(durations_secs: &[u32]) -> ConfigResult<Self> {
        if durations_secs.is_empty() {
            return Err(ConfigError::EmptyWindows);
        }
        if durations_secs.len() > MAX_WINDOWS {
            return Err(ConfigError::TooManyWindows {
                count: durations_secs.len(),
                max: MAX_WINDOWS,
            });
        }

        let mut secs = Vec::new();
        let mut previous = 0;
        for &duration in durations_secs {
            if duration == 0 {
                return Err(ConfigError::ZeroWindow);
            }
            if duration <= previous {
                return Err(ConfigError::UnsortedWindows { secs: duration });
            }
            previous = duration;
            // Length checked above
            let _ = secs.push(duration);
        }

        Ok(Self { secs })
    }

    /// 1 s, 5 s, 10 s, 15 s, 30 s, 45 s, 1 min, 5 min, 10 min, 15 min, 30 min
    pub fn standard() -> Self {
        Self {
            secs: Vec::from_slice(&STANDARD_WINDOWS_SECS).unwrap_or_default(),
        }
    }

    /// Durations in seconds, ascending
    pub fn durations(&self) -> &[u32] {
        &self.secs
    }

    /// Number of windows
    pub fn len(&self) -> usize {
        self.secs.len()
    }

    /// Never true for a validated spec
    pub fn is_empty(&self) -> bool {
        self.secs.is_empty()
    }

    /// Largest window in milliseconds; the history is pruned to this
    pub fn largest_ms(&self) -> u64 {
        self.secs.last().map_or(0, |&s| s as u64 * MS_PER_SECOND)
    }

    /// Labels in window order
    pub fn labels(&self) -> impl Iterator<Item = WindowLabel> + '_ {
        self.secs.iter().map(|&s| WindowLabel::from_secs(s))
    }
}

impl TryFrom<Vec<u32, MAX_WINDOWS>> for WindowSpec {
    type Error = ConfigError;

    fn try_from(secs: Vec<u32, MAX_WINDOWS>) -> ConfigResult<Self> {
        Self::new(&secs)
    }
}

impl From<WindowSpec> for Vec<u32, MAX_WINDOWS> {
    fn from(spec: WindowSpec) -> Self {
        spec.secs
    }
}

impl Default for WindowSpec {
    fn default() -> Self {
        Self::standard()
    }
}

/// Peak of one window
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WindowMax {
    /// Map key, e.g. `"5s"`
    pub label: WindowLabel,
    /// Window duration in seconds
    pub window_secs: u32,
    /// Largest |value| inside the window, `0.0` if none
    pub max_abs: f32,
}

/// Window label → peak, in ascending window order
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct WindowMaxima {
    entries: Vec<WindowMax, MAX_WINDOWS>,
}

impl WindowMaxima {
    /// Every window of `spec` at `0.0`
    pub fn zeroed(spec: &WindowSpec) -> Self {
        let mut entries = Vec::new();
        for &secs in spec.durations() {
            let _ = entries.push(WindowMax {
                label: WindowLabel::from_secs(secs),
                window_secs: secs,
                max_abs: 0.0,
            });
        }
        Self { entries }
    }

    /// Peak for a label such as `"10s"`
    pub fn get(&self, label: &str) -> Option<f32> {
        self.entries
            .iter()
            .find(|entry| entry.label == *label)
            .map(|entry| entry.max_abs)
    }

    /// Peak for a duration in seconds
    pub fn get_secs(&self, secs: u32) -> Option<f32> {
        self.entries
            .iter()
            .find(|entry| entry.window_secs == secs)
            .map(|entry| entry.max_abs)
    }

    /// Iterate entries from shortest to longest window
    pub fn iter(&self) -> impl Iterator<Item = &WindowMax> + '_ {
        self.entries.iter()
    }

    /// Number of windows
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True only for the default, unconfigured table
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for WindowMaxima {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_char(' ')?;
            }
            write!(f, "[{}]={:.3}", entry.label, entry.max_abs)?;
        }
        Ok(())
    }
}

/// Recompute every window peak from the history as of `now`
///
/// Pure: identical inputs give identical output.
pub fn compute<const N: usize>(
    history: &HistoryBuffer<N>,
    spec: &WindowSpec,
    now: Timestamp,
) -> WindowMaxima {
    let windows = spec.durations();
    let count = windows.len();

    let mut cutoffs = [0u64; MAX_WINDOWS];
    for (cutoff, &secs) in cutoffs.iter_mut().zip(windows) {
        *cutoff = now.saturating_sub(secs as u64 * MS_PER_SECOND);
    }

    // peaks[k]: samples whose smallest containing window is k
    let mut peaks = [0.0f32; MAX_WINDOWS];
    let mut k = count;
    for sample in history.iter() {
        while k > 0 && sample.timestamp >= cutoffs[k - 1] {
            k -= 1;
        }
        if k < count {
            peaks[k] = peaks[k].max(libm::fabsf(sample.value));
        }
    }

    let mut maxima = WindowMaxima::zeroed(spec);
    let mut running = 0.0f32;
    for (entry, &peak) in maxima.entries.iter_mut().zip(&peaks[..count]) {
        running = running.max(peak);
        entry.max_abs = running;
    }
    maxima
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Sample;

    fn history(samples: &[(u64, f32)]) -> HistoryBuffer<64> {
        let mut buffer = HistoryBuffer::new();
        for &(t, v) in samples {
            buffer.append(Sample::new(t, v));
        }
        buffer
    }

    #[test]
    fn label_format() {
        assert_eq!(WindowLabel::from_secs(1).as_str(), "1s");
        assert_eq!(WindowLabel::from_secs(1800).as_str(), "1800s");
        assert_eq!(WindowLabel::from_secs(u32::MAX).as_str(), "4294967295s");
    }

    #[test]
    fn standard_spec() {
        let spec = WindowSpec::standard();
        assert_eq!(spec.len(), 11);
        assert_eq!(spec.durations()[0], 1);
        assert_eq!(spec.largest_ms(), 1_800_000);
        assert_eq!(spec, WindowSpec::default());
    }

    #[test]
    fn list_conversion_is_validated() {
        let unsorted: Vec<u32, MAX_WINDOWS> = Vec::from_slice(&[60, 1]).unwrap();
        assert_eq!(
            WindowSpec::try_from(unsorted),
            Err(ConfigError::UnsortedWindows { secs: 1 })
        );

        let secs: Vec<u32, MAX_WINDOWS> = Vec::from_slice(&[1, 60]).unwrap();
        let spec = WindowSpec::try_from(secs.clone()).unwrap();
        assert_eq!(spec.largest_ms(), 60_000);
        let back: Vec<u32, MAX_WINDOWS> = spec.into();
        assert_eq!(back, secs);
    }

    #[test]
    fn spec_validation() {
        assert_eq!(WindowSpec::new(&[]), Err(ConfigError::EmptyWindows));
        assert_eq!(WindowSpec::new(&[0, 5]), Err(ConfigError::ZeroWindow));
        assert_eq!(
            WindowSpec::new(&[5, 5]),
            Err(ConfigError::UnsortedWindows { secs: 5 })
        );
        assert_eq!(
            WindowSpec::new(&[10, 5]),
            Err(ConfigError::UnsortedWindows { secs: 5 })
        );
        let too_many: [u32; MAX_WINDOWS + 1] = core::array::from_fn(|i| i as u32 + 1);
        assert!(matches!(
            WindowSpec::new(&too_many),
            Err(ConfigError::TooManyWindows { count, .. }) if count == MAX_WINDOWS + 1
        ));
    }

    #[test]
    fn empty_history_reports_zero_for_every_window() {
        let spec = WindowSpec::new(&[1, 5, 60]).unwrap();
        let maxima = compute(&history(&[]), &spec, 10_000);
        assert_eq!(maxima.len(), 3);
        for label in ["1s", "5s", "60s"] {
            assert_eq!(maxima.get(label), Some(0.0));
        }
        assert_eq!(maxima.get("2s"), None);
    }

    #[test]
    fn overlapping_windows() {
        let spec = WindowSpec::new(&[1, 5, 10]).unwrap();
        let now = 20_000;
        let h = history(&[
            (now - 9_000, -4.0),
            (now - 3_000, 2.5),
            (now - 400, -1.0),
            (now, 0.5),
        ]);

        let maxima = compute(&h, &spec, now);
        assert_eq!(maxima.get("1s"), Some(1.0));
        assert_eq!(maxima.get("5s"), Some(2.5));
        assert_eq!(maxima.get("10s"), Some(4.0));
        assert_eq!(maxima.get_secs(10), Some(4.0));
    }

    #[test]
    fn sample_on_window_edge_is_inside() {
        let spec = WindowSpec::new(&[1, 5]).unwrap();
        let h = history(&[(4_000, 3.0)]);
        let maxima = compute(&h, &spec, 5_000);
        assert_eq!(maxima.get("1s"), Some(3.0));
    }

    #[test]
    fn no_sample_in_short_window() {
        let spec = WindowSpec::new(&[1, 5]).unwrap();
        let h = history(&[(1_000, 3.0)]);
        let maxima = compute(&h, &spec, 5_000);
        assert_eq!(maxima.get("1s"), Some(0.0));
        assert_eq!(maxima.get("5s"), Some(3.0));
    }

    #[test]
    fn compute_is_idempotent() {
        let spec = WindowSpec::standard();
        let h = history(&[(100, 1.0), (900, -2.0), (1_500, 0.25)]);
        assert_eq!(compute(&h, &spec, 2_000), compute(&h, &spec, 2_000));
    }

    #[test]
    fn display_lists_every_window() {
        let spec = WindowSpec::new(&[1, 5]).unwrap();
        let h = history(&[(900, 1.5)]);
        let maxima = compute(&h, &spec, 1_000);
        assert_eq!(format!("{}", maxima), "[1s]=1.500 [5s]=1.500");
    }
}
