use crate::hand::HandState;
use crate::head::HeadState;
use crate::{DevicePose, EngineTuning, FramePoses, TrackingResult};
use deskvr_input::{InputSample, LockLatches};
use deskvr_telemetry::{Hand, RotationTracker, TelemetryFrame};

/// Owns all per-device accumulators and turns one frame of input into poses.
///
/// Not shared across threads; the host calls `run_frame` once per tick.
#[derive(Debug, Clone)]
pub struct PoseEngine {
    tuning: EngineTuning,
    head: HeadState,
    hands: [HandState; 2],
    tracker: RotationTracker,
    latches: LockLatches,
    poses: FramePoses,
    frames: u64,
}

impl PoseEngine {
    pub fn new(tuning: EngineTuning, latches: LockLatches) -> Self {
        Self {
            tuning,
            head: HeadState::new(),
            hands: [HandState::new(Hand::Right), HandState::new(Hand::Left)],
            tracker: RotationTracker::new(),
            latches,
            poses: FramePoses::default(),
            frames: 0,
        }
    }

    /// Advance one frame.
    ///
    /// `telemetry` is this tick's decoded record, if any. Only the hand it addresses
    /// receives a rotation increment; every other hand gets exactly zero. Lock toggles
    /// sampled this frame take effect on the next one.
    pub fn run_frame(
        &mut self,
        input: &InputSample,
        telemetry: Option<&TelemetryFrame>,
    ) -> FramePoses {
        let target = telemetry.and_then(|frame| frame.hand().map(|hand| (hand, frame)));
        for state in &mut self.hands {
            match target {
                Some((hand, frame)) if hand == state.hand() => {
                    let delta = self.tracker.delta(hand, frame.rotation);
                    state.apply_telemetry(frame, delta);
                }
                _ => state.clear_delta(),
            }
        }

        self.head
            .update(input, self.latches.pointer_locked(), &self.tuning);

        let front = self.head.front();
        let hand_result = if self.latches.tracking_locked() {
            TrackingResult::RunningOk
        } else {
            TrackingResult::OutOfRange
        };

        let mut poses = FramePoses {
            head: DevicePose {
                position: self.head.position(),
                orientation: self.head.orientation(),
                connected: true,
                tracking: TrackingResult::RunningOk,
            },
            ..Default::default()
        };

        for state in &mut self.hands {
            if input.hand_calibrate {
                state.calibrate(front);
            }
            if input.hand_calibrate_angles {
                state.calibrate_angles(front);
            }
            state.update(input.hand_buttons[state.hand().index()]);

            let index = state.hand().index();
            poses.hands[index] = DevicePose {
                position: state.position(&self.head, &self.tuning),
                orientation: state.orientation(),
                connected: true,
                tracking: hand_result,
            };
            poses.controllers[index] = state.inputs();
        }

        poses.pointer_locked = self.latches.pointer_locked();
        self.latches
            .update(input.pointer_lock_key, input.tracking_lock_key);

        self.frames += 1;
        self.poses = poses;
        poses
    }

    /// Poses produced by the most recent frame.
    pub fn poses(&self) -> &FramePoses {
        &self.poses
    }

    pub fn head(&self) -> &HeadState {
        &self.head
    }

    pub fn hand(&self, hand: Hand) -> &HandState {
        &self.hands[hand.index()]
    }

    pub fn latches(&self) -> &LockLatches {
        &self.latches
    }

    pub fn tracker(&self) -> &RotationTracker {
        &self.tracker
    }

    pub fn tuning(&self) -> &EngineTuning {
        &self.tuning
    }

    pub fn frame_count(&self) -> u64 {
        self.frames
    }
}

impl Default for PoseEngine {
    fn default() -> Self {
        Self::new(EngineTuning::default(), LockLatches::default())
    }
}
