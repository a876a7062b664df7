//! Lifetime peak tracking
//!
//! Keeps the largest magnitude a channel has ever produced together with the
//! signed value at that moment ("direction"). The peak only grows; it is
//! independent of the pruned history and survives every window rollover.

/// Update a (max_abs, direction) pair with a new value
///
/// Strictly-greater comparison: a tie keeps the earlier direction.
pub fn track_extremum(max_abs: f32, direction: f32, value: f32) -> (f32, f32) {
    let magnitude = libm::fabsf(value);
    if magnitude > max_abs {
        (magnitude, value)
    } else {
        (max_abs, direction)
    }
}

/// All-time peak of one channel
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LifetimeExtremum {
    /// Largest |value| seen
    pub max_abs: f32,
    /// Signed value at the moment of the peak
    pub direction: f32,
}

impl LifetimeExtremum {
    /// Fold a new value in; returns true when the peak moved
    pub fn update(&mut self, value: f32) -> bool {
        let (max_abs, direction) = track_extremum(self.max_abs, self.direction, value);
        let moved = max_abs != self.max_abs;
        self.max_abs = max_abs;
        self.direction = direction;
        moved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smaller_value_keeps_peak() {
        assert_eq!(track_extremum(5.0, -5.0, 3.0), (5.0, -5.0));
    }

    #[test]
    fn larger_negative_value_replaces_peak() {
        assert_eq!(track_extremum(5.0, -5.0, -7.0), (7.0, -7.0));
    }

    #[test]
    fn tie_keeps_earliest_direction() {
        assert_eq!(track_extremum(5.0, -5.0, 5.0), (5.0, -5.0));
    }

    #[test]
    fn update_reports_movement() {
        let mut peak = LifetimeExtremum::default();
        assert!(peak.update(-0.5));
        assert!(!peak.update(0.5));
        assert!(peak.update(1.25));
        assert_eq!(peak, LifetimeExtremum { max_abs: 1.25, direction: 1.25 });
    }

    #[test]
    fn zero_does_not_move_fresh_peak() {
        let mut peak = LifetimeExtremum::default();
        assert!(!peak.update(0.0));
        assert!(!peak.update(-0.0));
        assert_eq!(peak.max_abs, 0.0);
    }
}
