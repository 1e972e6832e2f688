#![allow(dead_code)]
//! Vizij Rig Core (engine-agnostic)
//!
//! Keyframe clips, single-clip players, weighted layer blending, parametric
//! blend trees, a parameter-driven state machine, bone hierarchies and IK
//! solvers. Everything is driven by explicit `update(dt)` calls from the host's
//! frame loop; evaluated values reach the host through [`TargetSink`]s.

pub mod accumulate;
pub mod binding;
pub mod blend_tree;
pub mod blender;
pub mod config;
pub mod data;
pub mod error;
pub mod ids;
pub mod ik;
pub mod interp;
pub mod outputs;
pub mod player;
pub mod pose;
pub mod sampling;
pub mod skeleton;
pub mod state_machine;
pub mod value;

// Re-exports for consumers (adapters)
pub use accumulate::{apply_additive, Accumulator};
pub use binding::{Bindings, TargetSink};
pub use blend_tree::{
    AdditiveBlendTree, BlendSample, BlendTree, BlendTree1d, BlendTree2d, DirectBlendTree,
};
pub use blender::{BlendLayer, Blender};
pub use config::{Blend2dConfig, Config, IkConfig};
pub use data::{Channel, Clip, Interpolation, Keyframe, Track};
pub use error::{Result, RigError};
pub use ids::BoneId;
pub use ik::{
    look_at_rotation, look_at_rotation_constrained, CcdSolver, ChainSolver, FabrikSolver,
    IkChain, IkResult, LookAtSolver, TwoBoneIk, TwoBoneSolution,
};
pub use outputs::{CoreEvent, Outputs};
pub use player::{AnimationPlayer, LoopMode, PlaybackState};
pub use pose::Pose;
pub use sampling::sample_track;
pub use skeleton::{Bone, Skeleton, Transform};
pub use state_machine::{
    AnimationState, AnimationStateMachine, Comparison, ParameterValue, Parameters,
    StateTransition, TransitionCondition,
};
pub use value::{Value, ValueKind};

pub use glam::{Mat4, Quat, Vec2, Vec3};
