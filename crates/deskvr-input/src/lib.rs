pub mod latch;

pub use latch::{InputLatch, LockLatches};

use glam::DVec2;

/// Per-hand face buttons.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HandButtons {
    pub a: bool,
    pub b: bool,
}

/// Raw input states for one frame, sampled by the host.
///
/// Every flag is the current "is down" level of a key or button; edge detection is
/// done downstream. Nothing here touches a platform input API.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputSample {
    /// Toggles pointer lock on a rising edge.
    pub pointer_lock_key: bool,
    /// Toggles tracking lock on a rising edge.
    pub tracking_lock_key: bool,
    /// Zeroes head yaw and snapshots the front direction.
    pub head_yaw_reset: bool,
    /// Moves the head back to the origin.
    pub head_position_reset: bool,
    /// Recalibrates both hands: position offset and angles.
    pub hand_calibrate: bool,
    /// Recalibrates hand angles only.
    pub hand_calibrate_angles: bool,
    pub move_forward: bool,
    pub move_back: bool,
    pub move_left: bool,
    pub move_right: bool,
    pub move_up: bool,
    pub move_down: bool,
    /// Indexed by hand: 0 = right, 1 = left.
    pub hand_buttons: [HandButtons; 2],
    /// Screen center minus cursor position, in pixels.
    pub pointer_offset: DVec2,
}
