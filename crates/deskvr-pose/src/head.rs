use crate::quat::{self, EulerAngles};
use crate::{CalibrationState, DeviceKind, EngineTuning};
use deskvr_input::InputSample;
use glam::{DQuat, DVec3};
use tracing::{debug, info};

/// Accumulated head state driven by host input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeadState {
    angles: EulerAngles,
    position: DVec3,
    /// Pitch snapshotted at the last yaw reset; hands are placed relative to it.
    front: f64,
    calibration: CalibrationState,
}

impl HeadState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one frame of input.
    pub fn update(&mut self, input: &InputSample, pointer_locked: bool, tuning: &EngineTuning) {
        if pointer_locked {
            self.angles.pitch += input.pointer_offset.x * tuning.pointer_sensitivity;
            self.angles.roll += input.pointer_offset.y * tuning.pointer_sensitivity;
        }

        if input.head_yaw_reset {
            self.reset_yaw();
        }

        let (sin, cos) = self.angles.pitch.sin_cos();
        let step = tuning.move_step;

        if input.move_forward {
            self.position.z -= step * cos;
            self.position.x -= step * sin;
        }
        if input.move_back {
            self.position.z += step * cos;
            self.position.x += step * sin;
        }
        if input.move_left {
            self.position.x -= step * cos;
            self.position.z += step * sin;
        }
        if input.move_right {
            self.position.x += step * cos;
            self.position.z -= step * sin;
        }
        if input.move_up {
            self.position.y += step;
        }
        if input.move_down {
            self.position.y -= step;
        }

        if input.head_position_reset {
            self.position = DVec3::ZERO;
            debug!("Head position reset");
        }
    }

    /// Zero yaw and take the current pitch as the new front direction.
    pub fn reset_yaw(&mut self) {
        self.angles.yaw = 0.0;
        self.front = self.angles.pitch;
        self.calibration = CalibrationState::Tracking;
        info!(front = self.front, "Head front direction set");
    }

    pub fn orientation(&self) -> DQuat {
        quat::orientation(DeviceKind::Head, self.angles)
    }

    pub fn angles(&self) -> EulerAngles {
        self.angles
    }

    pub fn position(&self) -> DVec3 {
        self.position
    }

    pub fn front(&self) -> f64 {
        self.front
    }

    pub fn calibration(&self) -> CalibrationState {
        self.calibration
    }
}
