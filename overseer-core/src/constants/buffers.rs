//! Buffer Sizes and Memory Constraints

/// Default hard ceiling on history samples per channel.
///
/// 2048 samples × 16 bytes = 32KB per channel. Covers the 30 minute window
/// at just over 1 Hz; faster channels evict their oldest samples and the
/// longest windows then cover less than their nominal span.
pub const DEFAULT_HISTORY_CAPACITY: usize = 2048;

/// Capacity of a window label (`u32::MAX` is 10 digits plus the unit).
pub const WINDOW_LABEL_CAPACITY: usize = 12;
