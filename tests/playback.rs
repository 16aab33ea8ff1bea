use omni_path_core::common::types::Point3;
use omni_path_core::common::{PosePatch, RotationOffsets};
use omni_path_core::control::State;
use omni_path_core::session::{parse_coordinate, EditorSession};
use omni_path_core::{ModelHandle, OmniPathCore, TickOutcome};
use std::collections::HashMap;
use std::f64::consts::FRAC_PI_2;

fn authored_path() -> (OmniPathCore, EditorSession) {
    let mut core = OmniPathCore::new();
    let session = EditorSession::new();
    // Start pose faces +y, first leg runs along +x
    core.add_waypoint(&session, Point3::new(0.0, -60.0, 0.0));
    core.add_waypoint(&session, Point3::new(0.0, 0.0, 0.0));
    core.add_waypoint(&session, Point3::new(48.0, 24.0, 0.0));
    core.toggle_smooth(&session, 2);
    core.set_robot_model(Some(ModelHandle::new("robot.stl")));
    (core, session)
}

#[test]
fn full_pass_completes_once_and_rewinds() {
    let (mut core, session) = authored_path();
    assert!(core.play(&session));

    let mut completions = 0;
    let mut last_progress = 0.0;
    // Uneven frame times summing to 6 seconds
    let deltas = [1.0 / 60.0, 1.0 / 30.0, 1.0 / 144.0];
    let mut elapsed = 0.0;
    let mut i = 0;
    while elapsed < 6.0 {
        let delta = deltas[i % deltas.len()];
        elapsed += delta;
        i += 1;
        match core.tick(delta).unwrap() {
            TickOutcome::Moved(sample) => {
                assert!(sample.progress > last_progress);
                last_progress = sample.progress;
            }
            TickOutcome::Completed => completions += 1,
            TickOutcome::Idle => {}
        }
    }

    assert_eq!(completions, 1);
    assert_eq!(core.state(), State::Stopped);
    assert_eq!(core.progress(), 0.0);

    let rewound = core.current_sample().unwrap();
    assert!((rewound.position - Point3::new(-60.0, -60.0, 0.0)).norm() < 1e-9);
}

#[test]
fn heading_eases_from_start_pose_into_path() {
    let (core, _) = authored_path();

    let start = core.sample_at(0.0).unwrap().unwrap();
    assert!((start.heading - FRAC_PI_2).abs() < 1e-12);

    let settled = core.sample_at(0.15).unwrap().unwrap();
    let curve = core.geometry();
    let tangent = curve.curve().unwrap().tangent_at(0.15);
    assert!((settled.heading - tangent.y.atan2(tangent.x)).abs() < 1e-12);

    let end = core.sample_at(1.0).unwrap().unwrap();
    assert!((end.position - Point3::new(48.0, 24.0, 0.0)).norm() < 1e-9);
}

#[test]
fn follow_callback_tracks_robot() {
    use std::sync::{Arc, Mutex};

    let (mut core, session) = authored_path();
    let followed = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&followed);
    core.set_follow_callback(Some(Box::new(move |p: &Point3| {
        sink.lock().unwrap().push(*p);
    })));

    core.play(&session);
    for _ in 0..10 {
        core.tick(0.05).unwrap();
    }
    let followed = followed.lock().unwrap();
    assert_eq!(followed.len(), 10);
    assert_eq!(*followed.last().unwrap(), core.current_sample().unwrap().position);
}

#[test]
fn numeric_edits_use_input_adapter_and_start_frame() {
    let (mut core, session) = authored_path();
    let x = parse_coordinate("10");
    let y = parse_coordinate("oops");
    assert!(core.update_waypoint_local(&session, 1, Point3::new(x, y, 0.0)));
    assert!((core.waypoints()[1].position - Point3::new(-60.0, -50.0, 0.0)).norm() < 1e-9);

    core.set_start_pose(&session, PosePatch::position(parse_coordinate("-48"), parse_coordinate("")));
    assert_eq!(core.waypoints()[0].position, Point3::new(-48.0, 0.0, 0.0));
}

#[test]
fn clear_returns_to_start_waypoint() {
    let (mut core, session) = authored_path();
    core.set_start_pose(&session, PosePatch::position(-12.0, 6.0));
    assert!(core.clear(&session));

    assert_eq!(core.waypoints().len(), 1);
    assert_eq!(core.waypoints()[0].position, Point3::new(-12.0, 6.0, 0.0));
    assert!(core.render_geometry().is_empty());
    assert!(!core.play(&session));
}

#[test]
fn constant_speed_pacing_uses_path_length() {
    let mut core = OmniPathCore::new();
    let session = EditorSession::new();
    core.add_waypoint(&session, Point3::new(-60.0, 40.0, 0.0));
    core.set_robot_model(Some(ModelHandle::new("robot.stl")));

    let mut params = HashMap::new();
    params.insert("traversal_speed".to_string(), 25.0);
    core.configure(&session, &params).unwrap();

    core.play(&session);
    // 100 units at 25 units/s
    match core.tick(1.0).unwrap() {
        TickOutcome::Moved(sample) => assert!((sample.progress - 0.25).abs() < 1e-6),
        other => panic!("unexpected tick outcome {:?}", other),
    }
}

#[test]
fn constant_speed_covers_equal_distance_each_second() {
    let mut core = OmniPathCore::new();
    let session = EditorSession::new();
    // A short leg then a long one
    core.set_start_pose(&session, PosePatch::position(0.0, 0.0));
    core.add_waypoint(&session, Point3::new(10.0, 0.0, 0.0));
    core.add_waypoint(&session, Point3::new(100.0, 0.0, 0.0));
    core.set_robot_model(Some(ModelHandle::new("robot.stl")));

    let mut params = HashMap::new();
    params.insert("traversal_speed".to_string(), 10.0);
    core.configure(&session, &params).unwrap();
    assert!(core.play(&session));

    let mut last = Point3::zeros();
    for second in 1..10 {
        match core.tick(1.0).unwrap() {
            TickOutcome::Moved(sample) => {
                let step = (sample.position - last).norm();
                assert!((step - 10.0).abs() < 0.1, "second {}: moved {}", second, step);
                last = sample.position;
            }
            other => panic!("unexpected tick outcome {:?}", other),
        }
    }
    assert_eq!(core.tick(1.5).unwrap(), TickOutcome::Completed);
}

#[test]
fn offsets_rotate_model_without_moving_it() {
    let (mut core, session) = authored_path();
    core.seek(0.5).unwrap();
    let plain = core.current_sample().unwrap();

    core.set_rotation_offsets(&session, RotationOffsets::new(-90.0, 0.0, 180.0));
    let offset = core.current_sample().unwrap();
    assert_eq!(plain.position, offset.position);
    assert_eq!(plain.heading, offset.heading);
    assert!((offset.orientation.x + FRAC_PI_2).abs() < 1e-12);
}
