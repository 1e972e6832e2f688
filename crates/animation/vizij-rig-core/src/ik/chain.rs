//! A joint chain owning its positions, rigid segment lengths and per-joint
//! orientations, solved by any [`ChainSolver`].

use glam::{Quat, Vec3};

use crate::error::{Result, RigError};
use crate::ik::{segment_lengths, ChainSolver, IkResult};

#[derive(Clone, Debug)]
pub struct IkChain<S> {
    joints: Vec<Vec3>,
    lengths: Vec<f32>,
    orientations: Vec<Quat>,
    /// Local axis each joint points along its segment.
    bone_axis: Vec3,
    solver: S,
}

impl<S: ChainSolver> IkChain<S> {
    /// Build a chain from its rest positions. Segment lengths are measured here
    /// and stay fixed.
    pub fn new(joints: Vec<Vec3>, solver: S) -> Result<Self> {
        let required = solver.min_joints().max(2);
        if joints.len() < required {
            return Err(RigError::ChainTooShort {
                required,
                actual: joints.len(),
            });
        }
        let lengths = segment_lengths(&joints);
        for (i, len) in lengths.iter().enumerate() {
            if *len <= f32::EPSILON {
                log::warn!("IK chain segment {i} has zero length");
            }
        }
        let mut chain = Self {
            orientations: vec![Quat::IDENTITY; joints.len()],
            joints,
            lengths,
            bone_axis: Vec3::Y,
            solver,
        };
        chain.update_orientations();
        Ok(chain)
    }

    pub fn with_bone_axis(mut self, axis: Vec3) -> Self {
        self.bone_axis = axis.try_normalize().unwrap_or(Vec3::Y);
        self.update_orientations();
        self
    }

    pub fn joints(&self) -> &[Vec3] {
        &self.joints
    }

    pub fn lengths(&self) -> &[f32] {
        &self.lengths
    }

    pub fn total_length(&self) -> f32 {
        self.lengths.iter().sum()
    }

    pub fn orientations(&self) -> &[Quat] {
        &self.orientations
    }

    pub fn root(&self) -> Vec3 {
        self.joints[0]
    }

    pub fn end_effector(&self) -> Vec3 {
        self.joints[self.joints.len() - 1]
    }

    /// Move the whole chain so its root sits at `position`.
    pub fn set_root(&mut self, position: Vec3) {
        let shift = position - self.joints[0];
        for joint in &mut self.joints {
            *joint += shift;
        }
    }

    pub fn solver(&self) -> &S {
        &self.solver
    }

    pub fn solver_mut(&mut self) -> &mut S {
        &mut self.solver
    }

    /// Solve toward `target`, then re-aim every joint but the last at its
    /// successor.
    pub fn solve(&mut self, target: Vec3) -> IkResult {
        let result = self.solver.solve(&mut self.joints, &self.lengths, target);
        self.update_orientations();
        result
    }

    fn update_orientations(&mut self) {
        for i in 0..self.joints.len().saturating_sub(1) {
            if let Some(dir) = (self.joints[i + 1] - self.joints[i]).try_normalize() {
                self.orientations[i] = Quat::from_rotation_arc(self.bone_axis, dir);
            }
        }
    }
}
