//! Cyclic coordinate descent.

use glam::{Quat, Vec3};

use crate::config::IkConfig;
use crate::ik::{ChainSolver, IkResult};

const MIN_ANGLE: f32 = 1e-5;
const MIN_AXIS_SQ: f32 = 1e-12;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CcdSolver {
    pub config: IkConfig,
    /// Maximum rotation per step for each joint, in radians. Joints without an
    /// entry are unconstrained.
    limits: Vec<Option<f32>>,
}

impl CcdSolver {
    pub fn new(config: IkConfig) -> Self {
        Self {
            config,
            limits: Vec::new(),
        }
    }

    /// Cap the rotation `joint` may apply in a single step.
    pub fn with_limit(mut self, joint: usize, max_angle: f32) -> Self {
        self.set_limit(joint, Some(max_angle));
        self
    }

    pub fn set_limit(&mut self, joint: usize, max_angle: Option<f32>) {
        if self.limits.len() <= joint {
            self.limits.resize(joint + 1, None);
        }
        self.limits[joint] = max_angle.map(f32::abs);
    }

    pub fn limit(&self, joint: usize) -> Option<f32> {
        self.limits.get(joint).copied().flatten()
    }
}

/// Rotations preserve segment lengths, so `lengths` is not consulted.
impl ChainSolver for CcdSolver {
    fn solve(&self, joints: &mut [Vec3], _lengths: &[f32], target: Vec3) -> IkResult {
        let n = joints.len();
        let tolerance = self.config.tolerance;
        if n < 2 {
            let end = joints.last().copied().unwrap_or(target);
            return IkResult::measure(end, target, 0, tolerance);
        }

        let mut iterations = 0;
        while iterations < self.config.max_iterations {
            if joints[n - 1].distance(target) <= tolerance {
                break;
            }
            for i in (0..n - 1).rev() {
                let pivot = joints[i];
                let (Some(to_end), Some(to_target)) = (
                    (joints[n - 1] - pivot).try_normalize(),
                    (target - pivot).try_normalize(),
                ) else {
                    continue;
                };
                let axis = to_end.cross(to_target);
                if axis.length_squared() < MIN_AXIS_SQ {
                    continue;
                }
                let mut angle = to_end.dot(to_target).clamp(-1.0, 1.0).acos();
                if let Some(limit) = self.limit(i) {
                    angle = angle.min(limit);
                }
                if angle < MIN_ANGLE {
                    continue;
                }
                let rotation = Quat::from_axis_angle(axis.normalize(), angle);
                for joint in &mut joints[i + 1..] {
                    *joint = pivot + rotation * (*joint - pivot);
                }
            }
            iterations += 1;
        }
        IkResult::measure(joints[n - 1], target, iterations, tolerance)
    }
}
