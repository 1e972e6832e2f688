//! Analytic two-bone IK (law of cosines with a pole hint).

use glam::Vec3;

use crate::ik::{ChainSolver, IkResult};

/// Targets closer than this to the root get the folded default pose.
const MIN_DISTANCE: f32 = 0.001;
/// Fraction of full reach the law-of-cosines distance is clamped to.
const MAX_REACH: f32 = 0.999;
/// End effector tolerance used to report `reached`.
const REACH_TOLERANCE: f32 = 1e-3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TwoBoneIk {
    pub upper: f32,
    pub lower: f32,
}

/// Solved positions of the middle and end joints.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TwoBoneSolution {
    pub middle: Vec3,
    pub end: Vec3,
    pub reached: bool,
}

impl TwoBoneIk {
    pub fn new(upper: f32, lower: f32) -> Self {
        Self { upper, lower }
    }

    /// Place the middle and end joints for a chain rooted at `root` reaching for
    /// `target`. `pole` is a world-space position the elbow bends toward.
    pub fn solve(&self, root: Vec3, target: Vec3, pole: Vec3) -> TwoBoneSolution {
        let to_target = target - root;
        let raw = to_target.length();

        if raw < MIN_DISTANCE {
            log::trace!("two-bone IK: target on root, folded pose");
            let middle = root + Vec3::Y * self.upper;
            let end = middle - Vec3::Y * self.lower;
            return self.finish(middle, end, target);
        }

        let dir = to_target / raw;
        let reach = self.upper + self.lower;
        if raw >= reach || self.upper <= f32::EPSILON {
            let middle = root + dir * self.upper;
            let end = middle + dir * self.lower;
            return self.finish(middle, end, target);
        }

        let distance = raw.min(MAX_REACH * reach);
        let cos_angle = ((self.upper * self.upper + distance * distance
            - self.lower * self.lower)
            / (2.0 * self.upper * distance))
            .clamp(-1.0, 1.0);
        let angle = cos_angle.acos();

        // Bend direction: the pole projected onto the plane normal to `dir`.
        let bend = (pole - root)
            .reject_from_normalized(dir)
            .try_normalize()
            .unwrap_or_else(|| dir.any_orthonormal_vector());

        let middle = root + (dir * angle.cos() + bend * angle.sin()) * self.upper;
        let end = middle + (target - middle).try_normalize().unwrap_or(dir) * self.lower;
        self.finish(middle, end, target)
    }

    fn finish(&self, middle: Vec3, end: Vec3, target: Vec3) -> TwoBoneSolution {
        TwoBoneSolution {
            middle,
            end,
            reached: end.distance(target) <= REACH_TOLERANCE,
        }
    }
}

/// Solves the first three joints with the chain's measured lengths, bending
/// toward the current middle joint. Joints past the end follow its
/// displacement.
impl ChainSolver for TwoBoneIk {
    fn solve(&self, joints: &mut [Vec3], lengths: &[f32], target: Vec3) -> IkResult {
        if joints.len() < 3 || lengths.len() < 2 {
            let end = joints.last().copied().unwrap_or(target);
            return IkResult::measure(end, target, 0, REACH_TOLERANCE);
        }
        let solver = TwoBoneIk::new(lengths[0], lengths[1]);
        let old_end = joints[2];
        let solution = solver.solve(joints[0], target, joints[1]);
        joints[1] = solution.middle;
        joints[2] = solution.end;
        let shift = solution.end - old_end;
        for joint in joints.iter_mut().skip(3) {
            *joint += shift;
        }
        let end = joints.last().copied().unwrap_or(solution.end);
        IkResult::measure(end, target, 0, REACH_TOLERANCE)
    }

    fn min_joints(&self) -> usize {
        3
    }
}
