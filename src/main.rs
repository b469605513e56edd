use anyhow::{Context, Result};
use deskvr_bridge::{Bridge, TelemetryOutcome};
use deskvr_config::BridgeConfig;
use deskvr_input::InputSample;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{info, warn};

/// Headless host: drains the channel at the configured rate and logs poses.
///
/// It has no keyboard or pointer of its own, so every frame is fed an idle input
/// sample. A VR runtime integration replaces this loop and supplies real samples.
async fn run(config: BridgeConfig) -> Result<()> {
    let mut bridge = Bridge::open(&config).with_context(|| {
        format!(
            "cannot start without shared channel `{}`",
            config.channel.name
        )
    })?;

    let period = Duration::from_secs_f64(1.0 / config.frame.rate_hz);
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let input = InputSample::default();
    let heartbeat = config.frame.heartbeat_frames;
    let mut frame: u64 = 0;
    let mut applied: u64 = 0;
    let mut dropped: u64 = 0;

    info!(rate_hz = config.frame.rate_hz, "Frame loop running, Ctrl-C to stop");

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let report = bridge.run_frame(&input);
                frame += 1;

                match report.telemetry {
                    TelemetryOutcome::Applied(_) => applied += 1,
                    TelemetryOutcome::Malformed(_) | TelemetryOutcome::UnknownDevice(_) => dropped += 1,
                    TelemetryOutcome::NoData => {}
                }

                if heartbeat > 0 && frame % heartbeat == 0 {
                    let poses = &report.poses;
                    info!(
                        frame,
                        applied,
                        dropped,
                        head = ?poses.head.position,
                        right = ?poses.hands[0].position,
                        left = ?poses.hands[1].position,
                        "Pose heartbeat"
                    );
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!(frame, applied, dropped, "Shutting down");
                break;
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "deskvr=info,deskvr_bridge=info,deskvr_pose=info,deskvr_shm=info,deskvr_input=info"
                    .into()
            }),
        )
        .init();

    info!("deskvr bridge starting");

    // Load config.
    let config = deskvr_config::load_config().unwrap_or_else(|e| {
        warn!(?e, "Failed to load config, using defaults");
        BridgeConfig::default()
    });

    info!(
        channel = %config.channel.name,
        capacity = config.channel.capacity,
        "Config loaded"
    );

    run(config).await
}
