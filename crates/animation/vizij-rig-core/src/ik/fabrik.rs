//! FABRIK: forward and backward reaching passes over fixed segment lengths.

use glam::Vec3;

use crate::config::IkConfig;
use crate::ik::{direction_or, ChainSolver, IkResult};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FabrikSolver {
    pub config: IkConfig,
}

impl FabrikSolver {
    pub fn new(config: IkConfig) -> Self {
        Self { config }
    }
}

impl ChainSolver for FabrikSolver {
    fn solve(&self, joints: &mut [Vec3], lengths: &[f32], target: Vec3) -> IkResult {
        let n = joints.len();
        let tolerance = self.config.tolerance;
        if n < 2 || lengths.len() < n - 1 {
            log::trace!("FABRIK: {n} joints / {} lengths, skipped", lengths.len());
            let end = joints.last().copied().unwrap_or(target);
            return IkResult::measure(end, target, 0, tolerance);
        }

        let root = joints[0];
        let total: f32 = lengths[..n - 1].iter().sum();
        let to_target = target - root;
        let reach_dir = direction_or(to_target, Vec3::Y);

        if to_target.length() > total {
            for i in 1..n {
                joints[i] = joints[i - 1] + reach_dir * lengths[i - 1];
            }
            return IkResult::measure(joints[n - 1], target, 0, tolerance);
        }

        let mut iterations = 0;
        let mut distance = joints[n - 1].distance(target);
        while distance > tolerance && iterations < self.config.max_iterations {
            // Forward: pin the end effector, walk toward the root.
            joints[n - 1] = target;
            let mut last = -reach_dir;
            for i in (0..n - 1).rev() {
                last = direction_or(joints[i] - joints[i + 1], last);
                joints[i] = joints[i + 1] + last * lengths[i];
            }

            // Backward: re-pin the root, walk toward the end.
            joints[0] = root;
            let mut last = reach_dir;
            for i in 1..n {
                last = direction_or(joints[i] - joints[i - 1], last);
                joints[i] = joints[i - 1] + last * lengths[i - 1];
            }

            iterations += 1;
            distance = joints[n - 1].distance(target);
        }
        IkResult::measure(joints[n - 1], target, iterations, tolerance)
    }
}
