//! Pose math for one head and two hand devices.
//!
//! The head is steered by host input (pointer motion and movement keys). Hands are
//! driven by controller telemetry and placed in the head's yaw-only frame. Every
//! device ends up as a position plus a unit quaternion once per frame.

pub mod engine;
pub mod hand;
pub mod head;
pub mod quat;

pub use engine::PoseEngine;
pub use hand::HandState;
pub use head::HeadState;
pub use quat::{orientation, EulerAngles};

use deskvr_telemetry::Hand;
use glam::{DQuat, DVec2, DVec3};

/// Radians of head rotation per pixel of pointer offset.
pub const POINTER_SENSITIVITY: f64 = 0.01;
/// Head translation per frame while a movement key is down.
pub const MOVE_STEP: f64 = 0.01;
/// Lateral distance of each hand from the head's center line.
pub const HAND_SPACING: f64 = 0.2;
/// How far below the head the hands sit.
pub const HAND_DROP: f64 = 0.3;
/// How far in front of the head the hands sit.
pub const HAND_DEPTH: f64 = 0.3;

/// Which device a pose belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceKind {
    Head,
    Hand(Hand),
}

/// Tracking status reported alongside a pose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackingResult {
    /// No frame has been run for the device yet.
    #[default]
    Uninitialized,
    RunningOk,
    /// Pose is still emitted but should be shown as lost tracking.
    OutOfRange,
}

/// Whether a device has been zeroed at least once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CalibrationState {
    #[default]
    Uncalibrated,
    Tracking,
}

/// Host-facing pose of one device.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DevicePose {
    pub position: DVec3,
    pub orientation: DQuat,
    pub connected: bool,
    pub tracking: TrackingResult,
}

impl DevicePose {
    pub fn is_valid(&self) -> bool {
        self.tracking == TrackingResult::RunningOk
    }
}

impl Default for DevicePose {
    fn default() -> Self {
        Self {
            position: DVec3::ZERO,
            orientation: DQuat::IDENTITY,
            connected: false,
            tracking: TrackingResult::Uninitialized,
        }
    }
}

/// Controller input components derived from telemetry and host buttons.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ControllerInputs {
    pub trackpad: DVec2,
    pub trackpad_touched: bool,
    pub trackpad_clicked: bool,
    pub trigger: f64,
    pub trigger_clicked: bool,
    pub a: bool,
    pub b: bool,
}

/// Everything the host consumes after one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FramePoses {
    pub head: DevicePose,
    /// Indexed by `Hand::index`.
    pub hands: [DevicePose; 2],
    pub controllers: [ControllerInputs; 2],
    /// The host should recenter the cursor while this is set.
    pub pointer_locked: bool,
}

impl FramePoses {
    pub fn hand(&self, hand: Hand) -> &DevicePose {
        &self.hands[hand.index()]
    }

    pub fn controller(&self, hand: Hand) -> &ControllerInputs {
        &self.controllers[hand.index()]
    }

    pub fn device(&self, kind: DeviceKind) -> &DevicePose {
        match kind {
            DeviceKind::Head => &self.head,
            DeviceKind::Hand(hand) => self.hand(hand),
        }
    }
}

/// Engine constants. Defaults match the wire client's expectations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineTuning {
    pub pointer_sensitivity: f64,
    pub move_step: f64,
    pub hand_spacing: f64,
    pub hand_drop: f64,
    pub hand_depth: f64,
}

impl Default for EngineTuning {
    fn default() -> Self {
        Self {
            pointer_sensitivity: POINTER_SENSITIVITY,
            move_step: MOVE_STEP,
            hand_spacing: HAND_SPACING,
            hand_drop: HAND_DROP,
            hand_depth: HAND_DEPTH,
        }
    }
}
