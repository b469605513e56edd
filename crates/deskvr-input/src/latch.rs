use tracing::info;

/// Edge-triggered toggle.
///
/// The output flips once per rising edge of the raw signal and holds otherwise, so a
/// key held across many polls toggles exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputLatch {
    state: bool,
    held: bool,
}

impl InputLatch {
    pub fn new(initial: bool) -> Self {
        Self {
            state: initial,
            held: false,
        }
    }

    /// Feed one raw sample and return the (possibly toggled) state.
    pub fn update(&mut self, raw: bool) -> bool {
        if raw && !self.held {
            self.state = !self.state;
        }
        self.held = raw;
        self.state
    }

    pub fn state(&self) -> bool {
        self.state
    }
}

/// The two lock toggles the bridge needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockLatches {
    /// Pointer lock: while engaged, pointer motion steers the head.
    pub pointer: InputLatch,
    /// Tracking lock: while engaged, hand poses are reported as valid.
    pub tracking: InputLatch,
}

impl LockLatches {
    pub fn new(pointer_locked: bool, tracking_locked: bool) -> Self {
        Self {
            pointer: InputLatch::new(pointer_locked),
            tracking: InputLatch::new(tracking_locked),
        }
    }

    /// Advance both latches with this frame's raw key states.
    pub fn update(&mut self, pointer_key: bool, tracking_key: bool) {
        let pointer_before = self.pointer.state();
        let tracking_before = self.tracking.state();

        if self.pointer.update(pointer_key) != pointer_before {
            info!(locked = self.pointer.state(), "Pointer lock toggled");
        }
        if self.tracking.update(tracking_key) != tracking_before {
            info!(locked = self.tracking.state(), "Tracking lock toggled");
        }
    }

    pub fn pointer_locked(&self) -> bool {
        self.pointer.state()
    }

    pub fn tracking_locked(&self) -> bool {
        self.tracking.state()
    }
}

impl Default for LockLatches {
    /// Pointer starts free, tracking starts locked.
    fn default() -> Self {
        Self::new(false, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn held_signal_toggles_once() {
        let mut latch = InputLatch::new(false);
        for _ in 0..5 {
            assert!(latch.update(true));
        }
        assert!(latch.update(false));
        assert!(!latch.update(true));
        assert!(!latch.update(true));
    }

    #[test]
    fn idle_signal_holds_state() {
        let mut latch = InputLatch::new(true);
        for _ in 0..10 {
            assert!(latch.update(false));
        }
    }

    #[test]
    fn each_rising_edge_toggles() {
        let mut latch = InputLatch::default();
        let samples = [true, false, true, false, true];
        let states: Vec<bool> = samples.iter().map(|&raw| latch.update(raw)).collect();
        assert_eq!(states, [true, true, false, false, true]);
    }

    #[test]
    fn lock_latches_are_independent() {
        let mut locks = LockLatches::default();
        assert!(!locks.pointer_locked());
        assert!(locks.tracking_locked());

        locks.update(true, false);
        assert!(locks.pointer_locked());
        assert!(locks.tracking_locked());

        locks.update(true, true);
        assert!(locks.pointer_locked());
        assert!(!locks.tracking_locked());
    }
}
