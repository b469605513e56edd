use crate::head::HeadState;
use crate::quat::{self, EulerAngles};
use crate::{CalibrationState, ControllerInputs, DeviceKind, EngineTuning};
use deskvr_input::HandButtons;
use deskvr_telemetry::{Hand, TelemetryFrame};
use glam::{DQuat, DVec3};
use tracing::info;

/// Accumulated state of one hand controller.
#[derive(Debug, Clone, PartialEq)]
pub struct HandState {
    hand: Hand,
    angles: EulerAngles,
    raw_position: DVec3,
    /// Raw position captured at the last full calibration.
    correction: DVec3,
    /// Rotation increment to fold in on the next update. `None` once consumed or cleared.
    pending_delta: Option<DVec3>,
    inputs: ControllerInputs,
    calibration: CalibrationState,
}

impl HandState {
    pub fn new(hand: Hand) -> Self {
        Self {
            hand,
            angles: EulerAngles::ZERO,
            raw_position: DVec3::ZERO,
            correction: DVec3::ZERO,
            pending_delta: None,
            inputs: ControllerInputs::default(),
            calibration: CalibrationState::Uncalibrated,
        }
    }

    /// Store a decoded frame for this hand together with its rotation increment.
    pub fn apply_telemetry(&mut self, frame: &TelemetryFrame, delta: DVec3) {
        self.raw_position = frame.translation;
        self.pending_delta = Some(delta);

        let trackpad = frame.trackpad;
        self.inputs.trackpad = trackpad;
        self.inputs.trackpad_touched = trackpad.x != 0.0 || trackpad.y != 0.0;
        self.inputs.trackpad_clicked = frame.trackpad_clicked;
        self.inputs.trigger = frame.trigger;
        self.inputs.trigger_clicked = frame.trigger > 0.0;
    }

    /// No frame for this hand this tick: its orientation must not move.
    pub fn clear_delta(&mut self) {
        self.pending_delta = None;
    }

    /// Re-zero against the current raw reading: position offset and angles.
    pub fn calibrate(&mut self, head_front: f64) {
        self.correction = self.raw_position;
        self.calibrate_angles(head_front);
        info!(hand = ?self.hand, correction = ?self.correction, "Hand calibrated");
    }

    /// Re-zero angles only, facing the head's front direction.
    pub fn calibrate_angles(&mut self, head_front: f64) {
        self.angles = EulerAngles {
            yaw: 0.0,
            pitch: head_front,
            roll: 0.0,
        };
        self.calibration = CalibrationState::Tracking;
    }

    /// Fold in the pending delta and host buttons for this frame.
    pub fn update(&mut self, buttons: HandButtons) {
        if let Some(delta) = self.pending_delta.take() {
            self.angles.roll += delta.x;
            self.angles.pitch += delta.y;
            self.angles.yaw += delta.z;
        }
        self.inputs.a = buttons.a;
        self.inputs.b = buttons.b;
    }

    /// World position: calibrated offset, spread per hand, turned into the head's
    /// yaw-only frame and carried along with the head.
    pub fn position(&self, head: &HeadState, tuning: &EngineTuning) -> DVec3 {
        let local = self.raw_position - self.correction
            + DVec3::new(
                tuning.hand_spacing * self.hand.side(),
                -tuning.hand_drop,
                -tuning.hand_depth,
            );

        let (sin, cos) = head.front().sin_cos();
        let origin = head.position();
        DVec3::new(
            local.x * cos + local.z * sin + origin.x,
            local.y + origin.y,
            local.z * cos - local.x * sin + origin.z,
        )
    }

    pub fn orientation(&self) -> DQuat {
        quat::orientation(DeviceKind::Hand(self.hand), self.angles)
    }

    pub fn hand(&self) -> Hand {
        self.hand
    }

    pub fn angles(&self) -> EulerAngles {
        self.angles
    }

    pub fn raw_position(&self) -> DVec3 {
        self.raw_position
    }

    pub fn correction(&self) -> DVec3 {
        self.correction
    }

    pub fn pending_delta(&self) -> DVec3 {
        self.pending_delta.unwrap_or(DVec3::ZERO)
    }

    pub fn inputs(&self) -> ControllerInputs {
        self.inputs
    }

    pub fn calibration(&self) -> CalibrationState {
        self.calibration
    }
}
