use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use vizij_rig_core::{
    blender::Blender,
    data::{Channel, Clip, Track},
    interp::functions::slerp_quat,
    skeleton::Transform,
    value::Value,
    Quat, Vec3,
};

fn approx(a: f32, b: f32, eps: f32) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

fn prop(name: &str) -> Channel {
    Channel::Property(name.into())
}

/// Clip holding constant property values on target `node`.
fn constant_clip(name: &str, values: &[(&str, f32)]) -> Arc<Clip> {
    let mut clip = Clip::new(name);
    for (channel, v) in values {
        clip.add_track(Track::new("node", prop(channel)).with_keyframe(0.0, *v));
    }
    Arc::new(clip)
}

fn rotation_clip(name: &str, q: Quat) -> Arc<Clip> {
    let track = Track::new("node", Channel::Rotation).with_keyframe(0.0, q);
    Arc::new(Clip::new(name).with_track(track))
}

fn float(blender: &Blender, channel: &str) -> Option<f32> {
    blender
        .pose()
        .get("node", &prop(channel))
        .and_then(Value::as_float)
}

/// it should merge two weighted scalar layers as (a*w1 + b*w2) / (w1 + w2)
#[test]
fn weighted_scalar_merge() {
    let mut blender = Blender::new();
    blender.add_layer(constant_clip("a", &[("x", 2.0)]), 0.3);
    blender.add_layer(constant_clip("b", &[("x", 8.0)]), 0.6);
    blender.update(0.0);
    approx(float(&blender, "x").unwrap(), (2.0 * 0.3 + 8.0 * 0.6) / 0.9, 1e-5);
}

/// it should normalize only over layers that carry the channel and pass single contributors through
#[test]
fn per_channel_normalization() {
    let mut blender = Blender::new();
    blender.add_layer(constant_clip("a", &[("x", 1.0), ("y", 5.0)]), 0.2);
    blender.add_layer(constant_clip("b", &[("x", 3.0)]), 0.2);
    blender.update(0.0);
    approx(float(&blender, "x").unwrap(), 2.0, 1e-6);
    approx(float(&blender, "y").unwrap(), 5.0, 0.0);
}

/// it should skip layers at weight 0
#[test]
fn zero_weight_layers_do_not_contribute() {
    let mut blender = Blender::new();
    blender.add_layer(constant_clip("a", &[("x", 1.0)]), 0.0);
    blender.add_layer(constant_clip("b", &[("y", 3.0)]), 1.0);
    blender.update(0.0);
    assert!(float(&blender, "x").is_none());
    approx(float(&blender, "y").unwrap(), 3.0, 0.0);
}

/// it should blend rotations by sequential slerp in layer insertion order
#[test]
fn quaternion_sequential_slerp() {
    let mut blender = Blender::new();
    blender.add_layer(rotation_clip("rest", Quat::IDENTITY), 0.5);
    blender.add_layer(
        rotation_clip("turn", Quat::from_rotation_z(std::f32::consts::FRAC_PI_2)),
        0.5,
    );
    let pose = blender.update(0.0);
    let q = pose
        .get("node", &Channel::Rotation)
        .and_then(Value::as_quat)
        .unwrap();
    let expected = Quat::from_rotation_z(std::f32::consts::FRAC_PI_4);
    assert!(q.abs_diff_eq(expected, 1e-5), "{q:?}");
}

/// it should fold unequal rotation layers in insertion order, so reordering changes the result
#[test]
fn quaternion_blend_follows_insertion_order() {
    let layers = [
        (Quat::IDENTITY, 0.2_f32),
        (Quat::from_rotation_z(1.2), 0.5),
        (Quat::from_rotation_x(1.2), 0.9),
    ];
    let blend = |order: &[usize]| {
        let mut blender = Blender::new();
        for &i in order {
            let (q, w) = layers[i];
            blender.add_layer(rotation_clip(&format!("l{i}"), q), w);
        }
        blender
            .update(0.0)
            .get("node", &Channel::Rotation)
            .and_then(Value::as_quat)
            .unwrap()
    };
    let nested = |order: [usize; 3]| {
        let [a, b, c] = order.map(|i| layers[i]);
        let ab = slerp_quat(a.0, b.0, b.1 / (a.1 + b.1));
        slerp_quat(ab, c.0, c.1 / (a.1 + b.1 + c.1))
    };

    let forward = blend(&[0, 1, 2]);
    let reversed = blend(&[2, 1, 0]);
    assert!(forward.abs_diff_eq(nested([0, 1, 2]), 1e-5), "{forward:?}");
    assert!(reversed.abs_diff_eq(nested([2, 1, 0]), 1e-5), "{reversed:?}");
    assert!(!forward.abs_diff_eq(reversed, 1e-3), "{forward:?} vs {reversed:?}");
}

/// it should loop each layer's time modulo its clip duration
#[test]
fn layer_time_wraps() {
    let clip = Arc::new(
        Clip::new("ramp").with_track(
            Track::new("node", prop("x"))
                .with_keyframe(0.0, 0.0_f32)
                .with_keyframe(1.0, 1.0_f32),
        ),
    );
    let mut blender = Blender::new();
    let i = blender.add_layer(clip, 1.0);
    blender.set_speed(i, 0.5);
    blender.update(2.5);
    approx(blender.layer(i).unwrap().time(), 0.25, 1e-6);
    approx(float(&blender, "x").unwrap(), 0.25, 1e-6);
}

/// it should drive cross-fades from update ticks and drop faded-out layers
#[test]
fn cross_fade_on_the_update_clock() {
    let mut blender = Blender::new();
    blender.add_layer(constant_clip("a", &[("x", 0.0)]), 1.0);
    let incoming = blender.cross_fade(constant_clip("b", &[("x", 10.0)]), 1.0);
    assert_eq!(incoming, 1);
    assert_eq!(blender.layer(incoming).unwrap().weight(), 0.0);

    blender.update(0.5);
    approx(blender.layer(0).unwrap().weight(), 0.5, 1e-6);
    approx(blender.layer(1).unwrap().weight(), 0.5, 1e-6);
    approx(float(&blender, "x").unwrap(), 5.0, 1e-5);

    blender.update(0.5);
    assert_eq!(blender.len(), 1);
    let layer = blender.layer(0).unwrap();
    assert_eq!(layer.clip().name, "b");
    assert_eq!(layer.weight(), 1.0);
    assert!(!layer.is_fading());
    approx(float(&blender, "x").unwrap(), 10.0, 0.0);
}

/// it should ramp a single layer with fade_layer and cancel the ramp on set_weight
#[test]
fn fade_layer_and_cancel() {
    let mut blender = Blender::new();
    let i = blender.add_layer(constant_clip("a", &[("x", 1.0)]), 1.0);
    blender.fade_layer(i, 0.2, 1.0);
    blender.update(0.5);
    approx(blender.layer(i).unwrap().weight(), 0.6, 1e-6);
    blender.update(1.0);
    approx(blender.layer(i).unwrap().weight(), 0.2, 1e-6);
    assert_eq!(blender.len(), 1);

    blender.fade_layer(i, 1.0, 2.0);
    blender.set_weight(i, 0.4);
    blender.update(1.0);
    approx(blender.layer(i).unwrap().weight(), 0.4, 0.0);
}

/// it should treat invalid layer indices as no-ops and clear everything on clear()
#[test]
fn invalid_indices_and_clear() {
    let mut blender = Blender::new();
    blender.add_layer(constant_clip("a", &[("x", 1.0)]), 1.0);
    blender.set_weight(3, 0.1);
    blender.set_speed(3, 2.0);
    blender.fade_layer(3, 0.0, 1.0);
    assert!(blender.remove_layer(3).is_none());
    assert_eq!(blender.len(), 1);

    blender.update(0.1);
    assert!(!blender.pose().is_empty());
    blender.clear();
    assert!(blender.is_empty());
    assert!(blender.update(0.1).is_empty());
}

/// it should push merged values into the sink bound for each target
#[test]
fn writes_bound_sinks() {
    let node = Rc::new(RefCell::new(Transform::IDENTITY));
    let mut blender = Blender::new();
    blender.bind("node", Rc::clone(&node));
    blender.add_layer(
        Arc::new(Clip::new("pos").with_track(
            Track::new("node", Channel::Position).with_keyframe(0.0, Vec3::new(0.0, 2.0, 0.0)),
        )),
        1.0,
    );
    blender.add_layer(
        Arc::new(Clip::new("pos2").with_track(
            Track::new("node", Channel::Position).with_keyframe(0.0, Vec3::new(0.0, 4.0, 0.0)),
        )),
        1.0,
    );
    blender.update(0.016);
    assert!((node.borrow().translation - Vec3::new(0.0, 3.0, 0.0)).length() < 1e-6);
}
