pub mod codec;
pub mod rotation;
pub mod types;

pub use codec::decode;
pub use rotation::RotationTracker;
pub use types::{Hand, TelemetryFrame};

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TelemetryError {
    #[error("malformed telemetry: {0}")]
    Malformed(String),
    #[error("telemetry addressed to unknown device {0}")]
    UnknownDevice(f64),
}
