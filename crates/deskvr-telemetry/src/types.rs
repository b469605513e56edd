use crate::TelemetryError;
use glam::{DVec2, DVec3};

/// One hand controller's raw sensor state, decoded from a single channel record.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TelemetryFrame {
    /// Target device as sent on the wire: 0 = right hand, 1 = left hand.
    pub device_id: f64,
    /// Raw controller position in the client's local units.
    pub translation: DVec3,
    /// Absolute roll/pitch/yaw in degrees.
    pub rotation: DVec3,
    /// Trackpad position, each axis in -1..1.
    pub trackpad: DVec2,
    pub trackpad_clicked: bool,
    /// Trigger pull in 0..1.
    pub trigger: f64,
}

impl TelemetryFrame {
    /// The hand this frame addresses, or `None` if the id matches no device.
    ///
    /// The id is compared exactly; near-misses such as 0.9999 are not rounded.
    pub fn hand(&self) -> Option<Hand> {
        if self.device_id == 0.0 {
            Some(Hand::Right)
        } else if self.device_id == 1.0 {
            Some(Hand::Left)
        } else {
            None
        }
    }
}

/// A hand controller slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hand {
    Right = 0,
    Left = 1,
}

impl Hand {
    pub const ALL: [Hand; 2] = [Hand::Right, Hand::Left];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Lateral placement sign: +1 for the right hand, -1 for the left.
    pub fn side(self) -> f64 {
        1.0 - 2.0 * self.index() as f64
    }
}

impl TryFrom<usize> for Hand {
    type Error = TelemetryError;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        match index {
            0 => Ok(Hand::Right),
            1 => Ok(Hand::Left),
            other => Err(TelemetryError::UnknownDevice(other as f64)),
        }
    }
}
