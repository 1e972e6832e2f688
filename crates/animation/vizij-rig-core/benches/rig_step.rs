use std::hint::black_box;
use std::sync::Arc;

use criterion::{criterion_group, criterion_main, Criterion};
use vizij_rig_core::{
    AnimationState, AnimationStateMachine, Blender, Channel, Clip, FabrikSolver, IkChain,
    ParameterValue, Quat, Skeleton, StateTransition, Track, Transform, TransitionCondition, Vec3,
};

const BONES: usize = 32;

fn bone_name(i: usize) -> String {
    format!("bone_{i}")
}

/// Rotation and position tracks for every bone, `phase` offsetting the curves.
fn rig_clip(name: &str, phase: f32) -> Arc<Clip> {
    let mut clip = Clip::new(name);
    for i in 0..BONES {
        let target = bone_name(i);
        let mut rotation = Track::new(target.clone(), Channel::Rotation);
        let mut position = Track::new(target, Channel::Position);
        for k in 0..=8 {
            let t = k as f32 * 0.125;
            let angle = (t * std::f32::consts::TAU + phase + i as f32 * 0.1).sin() * 0.3;
            rotation.add_keyframe(t, Quat::from_rotation_z(angle));
            position.add_keyframe(t, Vec3::new(0.0, 1.0, angle * 0.1));
        }
        clip.add_track(rotation);
        clip.add_track(position);
    }
    Arc::new(clip)
}

fn skeleton() -> Skeleton {
    let mut skel = Skeleton::new();
    let mut parent = None;
    for i in 0..BONES {
        let local = Transform::from_translation(Vec3::Y);
        parent = skel.add_bone(bone_name(i), parent, local).ok();
    }
    skel.bind();
    skel
}

fn bench_blender(c: &mut Criterion) {
    let mut blender = Blender::new();
    blender.add_layer(rig_clip("idle", 0.0), 0.6);
    blender.add_layer(rig_clip("walk", 1.0), 0.4);
    blender.add_layer(rig_clip("wave", 2.0), 0.2);
    let mut skel = skeleton();

    c.bench_function("blender_three_layers_to_skeleton", |b| {
        b.iter(|| {
            let pose = blender.update(black_box(1.0 / 60.0));
            skel.apply_pose(pose);
            skel.update();
            black_box(skel.bone_matrices());
        })
    });
}

fn bench_state_machine(c: &mut Criterion) {
    let mut sm = AnimationStateMachine::new();
    sm.add_state(AnimationState::new("idle", rig_clip("idle", 0.0)));
    sm.add_state(AnimationState::new("walk", rig_clip("walk", 1.0)));
    sm.add_parameter("go", ParameterValue::Trigger(false));
    for (from, to) in [("idle", "walk"), ("walk", "idle")] {
        sm.add_transition(
            StateTransition::new(from, to, 0.25).with_condition(TransitionCondition::trigger("go")),
        );
    }
    sm.set_default_state("idle");

    let mut frame = 0u32;
    c.bench_function("state_machine_step", |b| {
        b.iter(|| {
            frame = frame.wrapping_add(1);
            if frame % 30 == 0 {
                sm.set_trigger("go");
            }
            black_box(sm.update(black_box(1.0 / 60.0)));
        })
    });
}

fn bench_ik(c: &mut Criterion) {
    let joints: Vec<Vec3> = (0..8).map(|i| Vec3::Y * i as f32 * 0.5).collect();
    let Ok(mut chain) = IkChain::new(joints, FabrikSolver::default()) else {
        return;
    };
    let mut t = 0.0f32;
    c.bench_function("fabrik_eight_joints", |b| {
        b.iter(|| {
            t += 1.0 / 60.0;
            let target = Vec3::new(t.cos() * 2.0, 2.0, t.sin() * 2.0);
            black_box(chain.solve(black_box(target)));
        })
    });
}

criterion_group!(benches, bench_blender, bench_state_machine, bench_ik);
criterion_main!(benches);
