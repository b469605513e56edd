use crate::types::Hand;
use glam::DVec3;

/// Wrap period applied to the raw difference between two absolute samples, in degrees.
pub const WRAP_DEGREES: f64 = 90.0;
/// Divisor that scales a wrapped difference into an accumulator increment.
pub const DELTA_SCALE: f64 = 360.0;

/// Turns consecutive absolute rotation samples into bounded per-frame increments.
///
/// Each hand keeps its own previous sample. Consecutive samples are expected to differ
/// by less than one wrap period; larger jumps alias.
#[derive(Debug, Clone, Default)]
pub struct RotationTracker {
    previous: [DVec3; 2],
}

impl RotationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment between the stored sample for `hand` and `current`, per axis
    /// `((current - previous) % 90) / 360`.
    ///
    /// The remainder is truncated (it keeps the sign of the difference), so a step
    /// from 85 to 5 gives -80/360, not 10/360. `current` replaces the stored sample.
    pub fn delta(&mut self, hand: Hand, current: DVec3) -> DVec3 {
        let previous = std::mem::replace(&mut self.previous[hand.index()], current);
        let diff = current - previous;
        DVec3::new(wrap(diff.x), wrap(diff.y), wrap(diff.z))
    }

    pub fn previous(&self, hand: Hand) -> DVec3 {
        self.previous[hand.index()]
    }

    pub fn reset(&mut self) {
        self.previous = [DVec3::ZERO; 2];
    }
}

fn wrap(diff: f64) -> f64 {
    (diff % WRAP_DEGREES) / DELTA_SCALE
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: DVec3, b: DVec3) -> bool {
        (a - b).abs().max_element() < 1e-12
    }

    #[test]
    fn first_sample_is_measured_from_zero() {
        let mut tracker = RotationTracker::new();
        let d = tracker.delta(Hand::Right, DVec3::new(36.0, -18.0, 0.0));
        assert!(close(d, DVec3::new(0.1, -0.05, 0.0)));
        assert_eq!(tracker.previous(Hand::Right), DVec3::new(36.0, -18.0, 0.0));
    }

    #[test]
    fn repeated_sample_yields_zero() {
        let mut tracker = RotationTracker::new();
        let sample = DVec3::new(12.5, 40.0, -7.0);
        tracker.delta(Hand::Left, sample);
        assert_eq!(tracker.delta(Hand::Left, sample), DVec3::ZERO);
    }

    #[test]
    fn delta_is_deterministic() {
        let prev = DVec3::new(10.0, 20.0, 30.0);
        let cur = DVec3::new(15.0, 5.0, 100.0);

        let mut a = RotationTracker::new();
        let mut b = RotationTracker::new();
        a.delta(Hand::Right, prev);
        b.delta(Hand::Right, prev);
        assert_eq!(a.delta(Hand::Right, cur), b.delta(Hand::Right, cur));
    }

    #[test]
    fn negative_difference_keeps_its_sign() {
        let mut tracker = RotationTracker::new();
        tracker.delta(Hand::Right, DVec3::splat(85.0));
        let d = tracker.delta(Hand::Right, DVec3::splat(5.0));
        assert!(close(d, DVec3::splat(-80.0 / 360.0)));
    }

    #[test]
    fn differences_wrap_at_ninety_degrees() {
        let mut tracker = RotationTracker::new();
        tracker.delta(Hand::Right, DVec3::new(5.0, 0.0, 0.0));
        let d = tracker.delta(Hand::Right, DVec3::new(95.0, 100.0, -200.0));
        assert!(close(d, DVec3::new(0.0, 10.0 / 360.0, -20.0 / 360.0)));
    }

    #[test]
    fn hands_are_tracked_independently() {
        let mut tracker = RotationTracker::new();
        tracker.delta(Hand::Right, DVec3::splat(45.0));
        let d = tracker.delta(Hand::Left, DVec3::splat(9.0));
        assert!(close(d, DVec3::splat(9.0 / 360.0)));
        assert_eq!(tracker.previous(Hand::Right), DVec3::splat(45.0));
    }

    #[test]
    fn reset_forgets_previous_samples() {
        let mut tracker = RotationTracker::new();
        tracker.delta(Hand::Right, DVec3::splat(45.0));
        tracker.reset();
        assert_eq!(tracker.previous(Hand::Right), DVec3::ZERO);
    }
}
