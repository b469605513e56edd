//! Per-frame driver: shared channel → telemetry codec → rotation tracker → pose engine.
//!
//! A host owns one [`Bridge`] per session and calls [`Bridge::run_frame`] once per tick
//! with that tick's raw input. Nothing here blocks. A bad record costs one frame of
//! telemetry and never escapes `run_frame`.

use deskvr_config::{BridgeConfig, LatchConfig, TuningConfig};
use deskvr_input::{InputSample, LockLatches};
use deskvr_pose::{EngineTuning, FramePoses, PoseEngine};
use deskvr_shm::{ChannelError, SharedChannel};
use deskvr_telemetry::{Hand, TelemetryError, TelemetryFrame};
use tracing::{debug, trace, warn};

/// What happened to the channel during one frame.
#[derive(Debug, Clone, PartialEq)]
pub enum TelemetryOutcome {
    /// The slot was empty.
    NoData,
    /// A record was decoded and routed to this hand.
    Applied(Hand),
    /// A record was decoded but its id matches no hand; it was dropped.
    UnknownDevice(f64),
    /// The record could not be decoded; it was dropped.
    Malformed(String),
}

/// Result of one [`Bridge::run_frame`] call.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub poses: FramePoses,
    pub telemetry: TelemetryOutcome,
}

pub struct Bridge {
    channel: SharedChannel,
    engine: PoseEngine,
}

impl Bridge {
    pub fn new(channel: SharedChannel, engine: PoseEngine) -> Self {
        Self { channel, engine }
    }

    /// Open the configured channel. Failure is fatal for the host.
    pub fn open(config: &BridgeConfig) -> Result<Self, ChannelError> {
        let channel = SharedChannel::open(&config.channel.name, config.channel.capacity)?;
        Ok(Self::with_channel(channel, config))
    }

    /// Build a bridge around an existing channel using the config's engine settings.
    pub fn with_channel(channel: SharedChannel, config: &BridgeConfig) -> Self {
        let engine = PoseEngine::new(engine_tuning(&config.tuning), lock_latches(&config.latches));
        Self::new(channel, engine)
    }

    /// Drain the channel if a record is waiting, then advance every device one frame.
    pub fn run_frame(&mut self, input: &InputSample) -> FrameReport {
        let (frame, outcome) = match self.channel.try_take_frame() {
            None => (None, TelemetryOutcome::NoData),
            Some(bytes) => match route(&bytes) {
                Ok((hand, frame)) => {
                    trace!(?hand, "Telemetry applied");
                    (Some(frame), TelemetryOutcome::Applied(hand))
                }
                Err(TelemetryError::UnknownDevice(id)) => {
                    trace!(id, "Telemetry for unknown device dropped");
                    (None, TelemetryOutcome::UnknownDevice(id))
                }
                Err(TelemetryError::Malformed(msg)) => {
                    warn!(error = %msg, "Malformed telemetry dropped");
                    (None, TelemetryOutcome::Malformed(msg))
                }
            },
        };

        let poses = self.engine.run_frame(input, frame.as_ref());

        let frames = self.engine.frame_count();
        if frames % 1000 == 0 {
            debug!(frames, "Bridge frames processed");
        }

        FrameReport {
            poses,
            telemetry: outcome,
        }
    }

    pub fn poses(&self) -> &FramePoses {
        self.engine.poses()
    }

    pub fn engine(&self) -> &PoseEngine {
        &self.engine
    }

    pub fn channel(&self) -> &SharedChannel {
        &self.channel
    }
}

/// Decode a record and resolve the hand it addresses.
fn route(bytes: &[u8]) -> Result<(Hand, TelemetryFrame), TelemetryError> {
    let frame = deskvr_telemetry::decode(bytes)?;
    let hand = frame
        .hand()
        .ok_or(TelemetryError::UnknownDevice(frame.device_id))?;
    Ok((hand, frame))
}

pub fn engine_tuning(tuning: &TuningConfig) -> EngineTuning {
    EngineTuning {
        pointer_sensitivity: tuning.pointer_sensitivity,
        move_step: tuning.move_step,
        hand_spacing: tuning.hand_spacing,
        hand_drop: tuning.hand_drop,
        hand_depth: tuning.hand_depth,
    }
}

pub fn lock_latches(latches: &LatchConfig) -> LockLatches {
    LockLatches::new(latches.pointer_locked, latches.tracking_locked)
}
