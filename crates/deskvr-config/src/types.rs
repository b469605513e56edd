use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Shared memory channel the telemetry producer writes into.
    pub channel: ChannelConfig,
    /// Host frame loop.
    pub frame: FrameConfig,
    /// Pose engine constants.
    pub tuning: TuningConfig,
    /// Initial states of the lock toggles.
    pub latches: LatchConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    /// Segment name shared with the producer.
    pub name: String,
    /// Segment size in bytes, flag byte included.
    pub capacity: usize,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            name: "pipe".into(),
            capacity: 4096,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    /// Frames per second driven by the headless host.
    pub rate_hz: f64,
    /// Log a pose summary every this many frames. 0 disables it.
    pub heartbeat_frames: u64,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            rate_hz: 90.0,
            heartbeat_frames: 900,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TuningConfig {
    /// Radians of head rotation per pixel of pointer offset.
    pub pointer_sensitivity: f64,
    /// Head translation per frame while a movement key is held.
    pub move_step: f64,
    /// Lateral distance of each hand from the head's center line.
    pub hand_spacing: f64,
    /// Vertical drop of the hands below the head.
    pub hand_drop: f64,
    /// Forward offset of the hands in front of the head.
    pub hand_depth: f64,
}

impl Default for TuningConfig {
    fn default() -> Self {
        Self {
            pointer_sensitivity: 0.01,
            move_step: 0.01,
            hand_spacing: 0.2,
            hand_drop: 0.3,
            hand_depth: 0.3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LatchConfig {
    pub pointer_locked: bool,
    pub tracking_locked: bool,
}

impl Default for LatchConfig {
    fn default() -> Self {
        Self {
            pointer_locked: false,
            tracking_locked: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_round_trip_through_toml() {
        let config = BridgeConfig::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: BridgeConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let parsed: BridgeConfig = toml::from_str(
            r#"
            [channel]
            name = "controller"

            [latches]
            pointer_locked = true
            "#,
        )
        .unwrap();

        assert_eq!(parsed.channel.name, "controller");
        assert_eq!(parsed.channel.capacity, 4096);
        assert!(parsed.latches.pointer_locked);
        assert!(parsed.latches.tracking_locked);
        assert_eq!(parsed.tuning, TuningConfig::default());
        assert_eq!(parsed.frame.rate_hz, 90.0);
    }

    #[test]
    fn wrong_types_are_rejected() {
        assert!(toml::from_str::<BridgeConfig>("[frame]\nrate_hz = \"fast\"").is_err());
    }
}
