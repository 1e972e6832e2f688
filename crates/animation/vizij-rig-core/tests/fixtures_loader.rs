use vizij_rig_core::{
    config::Config,
    data::{Channel, Clip, Interpolation},
    value::Value,
    Quat, RigError, Vec3,
};
use vizij_test_fixtures::{clips, configs};

fn approx(a: f32, b: f32, eps: f32) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

fn load_clip(name: &str) -> vizij_rig_core::Result<Clip> {
    let json = clips::json(name).expect("fixture present");
    Clip::from_json(&json)
}

/// it should load the wave clip and evaluate its rotation and cubic property
#[test]
fn wave_fixture_evaluates() {
    let clip = load_clip("wave").unwrap();
    assert_eq!(clip.name, "wave");
    approx(clip.duration(), 1.0, 0.0);
    let curl = clip.track("hand", &Channel::Property("curl".into())).unwrap();
    assert_eq!(curl.interpolation, Interpolation::Cubic);

    let pose = clip.evaluate(0.5);
    let q = pose
        .get("arm", &Channel::Rotation)
        .and_then(Value::as_quat)
        .unwrap();
    assert!(q.abs_diff_eq(Quat::from_rotation_z(std::f32::consts::FRAC_PI_4), 1e-5));
    approx(
        pose.get("hand", &Channel::Property("curl".into()))
            .and_then(Value::as_float)
            .unwrap(),
        1.0,
        1e-6,
    );
}

/// it should default interpolation to linear and skip empty tracks
#[test]
fn walk_fixture_defaults() {
    let clip = load_clip("walk").unwrap();
    assert_eq!(clip.tracks().len(), 3);
    let pose = clip.evaluate(0.25);
    let hips = pose.get("hips", &Channel::Position).and_then(Value::as_vec3).unwrap();
    assert!((hips - Vec3::new(0.0, 1.05, 0.25)).length() < 1e-5, "{hips}");
    assert_eq!(
        pose.get("hips", &Channel::Scale).and_then(Value::as_vec3),
        Some(Vec3::ONE)
    );
    assert!(pose.target("empty").is_none());
}

/// it should sort out-of-order keyframes on load
#[test]
fn unsorted_keys_are_sorted() {
    let clip = load_clip("unsorted").unwrap();
    let track = &clip.tracks()[0];
    let times: Vec<f32> = track.keyframes().iter().map(|k| k.time).collect();
    assert_eq!(times, vec![0.0, 1.0, 2.0]);
    approx(
        track.evaluate(0.5).and_then(|v| v.as_float()).unwrap(),
        0.125,
        1e-6,
    );
}

/// it should reject clips with negative keyframe times
#[test]
fn bad_time_is_rejected() {
    let err = load_clip("bad-time").unwrap_err();
    assert!(matches!(err, RigError::InvalidKeyframe { ref target, time } if target == "panel" && time == -1.0));
    assert_eq!(err.category(), "data");
}

/// it should surface malformed JSON as a serialization error
#[test]
fn malformed_clip_json() {
    let err = Clip::from_json("{ \"name\": 3 }").unwrap_err();
    assert_eq!(err.category(), "serialization");
}

/// it should load every config fixture, filling omitted fields with defaults
#[test]
fn config_fixtures() {
    let default = Config::from_json(&configs::json("default").unwrap()).unwrap();
    assert_eq!(default, Config::default());

    let precise: Config = configs::load("precise-ik").unwrap();
    assert_eq!(precise.ik.max_iterations, 64);
    approx(precise.ik.tolerance, 1e-4, 0.0);
    approx(precise.blend_2d.prune_threshold, 0.05, 0.0);
    assert_eq!(
        precise.blend_2d.snap_distance,
        Config::default().blend_2d.snap_distance
    );

    let mut keys = configs::keys();
    keys.sort();
    assert_eq!(keys, ["default", "precise-ik"]);
}
