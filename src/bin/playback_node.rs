use anyhow::{bail, Context, Result};
use omni_path_core::common::types::Point3;
use omni_path_core::config::PlannerConfig;
use omni_path_core::session::EditorSession;
use omni_path_core::{ModelHandle, OmniPathCore, TickOutcome};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::{info, trace};
use tracing_subscriber::EnvFilter;

/// Nominal frame period of the simulated renderer
const FRAME_PERIOD: Duration = Duration::from_millis(16);

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Optional JSON config as first argument
    let config = match std::env::args().nth(1) {
        Some(path) => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config {}", path))?;
            PlannerConfig::from_json(&text).context("invalid planner config")?
        }
        None => PlannerConfig::default(),
    };
    info!(?config, "starting playback node");

    let mut core = OmniPathCore::with_config(config)?;
    let session = EditorSession::new();

    for (x, y) in [(-60.0, 0.0), (0.0, 12.0), (36.0, 48.0)] {
        core.add_waypoint(&session, Point3::new(x, y, 0.0));
    }
    core.toggle_smooth(&session, 2);
    core.set_robot_model(Some(ModelHandle::new("robot.stl")));
    if let Some(model) = core.robot_model() {
        info!(model = model.source(), "robot model attached");
    }

    // Stand-in for the renderer's camera
    let camera = Arc::new(Mutex::new(Point3::zeros()));
    let camera_sink = Arc::clone(&camera);
    core.set_follow_callback(Some(Box::new(move |position: &Point3| {
        if let Ok(mut camera) = camera_sink.lock() {
            *camera = *position;
        }
    })));

    if !core.play(&session) {
        bail!("playback could not start");
    }

    let mut frames = interval(FRAME_PERIOD);
    frames.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut last = Instant::now();
    let mut frame_count: u64 = 0;

    loop {
        frames.tick().await;
        let now = Instant::now();
        let delta = now.duration_since(last).as_secs_f64();
        last = now;
        frame_count += 1;

        match core.tick(delta)? {
            TickOutcome::Moved(sample) => {
                trace!(progress = sample.progress, "frame");
                if frame_count % 30 == 0 {
                    info!(
                        progress = sample.progress,
                        x = sample.position.x,
                        y = sample.position.y,
                        heading_deg = sample.heading.to_degrees(),
                        "robot pose"
                    );
                }
            }
            TickOutcome::Completed => {
                let camera = camera.lock().map(|c| *c).unwrap_or_else(|_| Point3::zeros());
                info!(frames = frame_count, camera_x = camera.x, camera_y = camera.y, "pass complete");
                if !core.is_playing() {
                    break;
                }
            }
            TickOutcome::Idle => break,
        }
    }

    info!("playback node finished");
    Ok(())
}
