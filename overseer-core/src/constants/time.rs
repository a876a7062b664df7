//! Time-Related Constants

/// Milliseconds per second.
pub const MS_PER_SECOND: u64 = 1000;

