use anyhow::Result;
use omni_path_core::common::types::Point3;
use omni_path_core::session::EditorSession;
use omni_path_core::OmniPathCore;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut core = OmniPathCore::new();
    let session = EditorSession::new();

    // Square-ish route from the default start corner
    for (x, y) in [(-60.0, 0.0), (0.0, 0.0), (0.0, 48.0), (48.0, 48.0)] {
        core.add_waypoint(&session, Point3::new(x, y, 0.0));
    }
    core.toggle_smooth(&session, 2);
    core.toggle_smooth(&session, 3);

    println!("Start pose: {:?}", core.start_pose());
    for (i, waypoint) in core.waypoints().iter().enumerate() {
        let local = core.waypoint_local(i).unwrap_or_else(Point3::zeros);
        println!(
            "Waypoint {}: global=({:.1}, {:.1}) local=({:.1}, {:.1}) smooth={}",
            i, waypoint.position.x, waypoint.position.y, local.x, local.y, waypoint.smooth
        );
    }

    println!("Render geometry has {} points", core.render_geometry().len());

    for step in 0..=10 {
        let progress = step as f64 / 10.0;
        if let Some(sample) = core.sample_at(progress)? {
            println!(
                "progress={:.1} position=({:.2}, {:.2}) heading={:.1} deg",
                progress,
                sample.position.x,
                sample.position.y,
                sample.heading.to_degrees()
            );
        }
    }

    println!("Snapshot:\n{}", core.snapshot().to_json()?);
    Ok(())
}
