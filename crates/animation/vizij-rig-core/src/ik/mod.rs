//! Inverse kinematics on raw joint positions.
//!
//! Solvers keep no state between calls. Geometric degeneracies (unreachable
//! targets, zero-length directions, antiparallel vectors) all have a defined
//! fallback, so solving every frame never fails.

pub mod ccd;
pub mod chain;
pub mod fabrik;
pub mod look_at;
pub mod two_bone;

use glam::Vec3;

pub use ccd::CcdSolver;
pub use chain::IkChain;
pub use fabrik::FabrikSolver;
pub use look_at::{look_at_rotation, look_at_rotation_constrained, LookAtSolver};
pub use two_bone::{TwoBoneIk, TwoBoneSolution};

/// Outcome of one solve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IkResult {
    /// End effector finished within tolerance of the target.
    pub reached: bool,
    /// Solver passes performed (0 for closed-form and early exits).
    pub iterations: u32,
    /// Final end effector to target distance.
    pub distance: f32,
}

impl IkResult {
    pub(crate) fn measure(end: Vec3, target: Vec3, iterations: u32, tolerance: f32) -> Self {
        let distance = end.distance(target);
        Self {
            reached: distance <= tolerance,
            iterations,
            distance,
        }
    }
}

/// A solver that moves a chain of joint positions toward a target in place.
///
/// `lengths[i]` is the rigid distance between `joints[i]` and `joints[i + 1]`,
/// measured once when the chain was built.
pub trait ChainSolver {
    fn solve(&self, joints: &mut [Vec3], lengths: &[f32], target: Vec3) -> IkResult;

    /// Fewest joints the solver can work with.
    fn min_joints(&self) -> usize {
        2
    }
}

/// Distances between consecutive joints.
pub fn segment_lengths(joints: &[Vec3]) -> Vec<f32> {
    joints.windows(2).map(|w| w[0].distance(w[1])).collect()
}

/// Normalized `v`, or `fallback` when `v` has no usable length.
#[inline]
pub(crate) fn direction_or(v: Vec3, fallback: Vec3) -> Vec3 {
    v.try_normalize().unwrap_or(fallback)
}
