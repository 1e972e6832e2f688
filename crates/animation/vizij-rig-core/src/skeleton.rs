//! Bone hierarchy with world-matrix propagation and skinning matrices.
//!
//! Bones live in an arena owned by the [`Skeleton`]; parent/child links are
//! [`BoneId`] indices. A bone can only be added once its parent exists, so the
//! arena is always in parent-before-child order and never contains cycles.
//!
//! Matrix pipeline:
//! 1. Animation writes into each bone's `local` transform
//! 2. `update()` walks the hierarchy root-to-leaf: `world = parent.world * local`
//! 3. `bone_matrices()` returns `world * inverse_bind` in insertion order

use glam::{Mat4, Quat, Vec3};
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::binding::write_channel;
use crate::error::{Result, RigError};
use crate::ids::BoneId;
use crate::pose::Pose;

/// Local translation/rotation/scale.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    #[inline]
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[derive(Clone, Debug)]
pub struct Bone {
    pub name: String,
    parent: Option<BoneId>,
    children: Vec<BoneId>,
    pub local: Transform,
    /// Inverse of the bind-pose world matrix; fixed once bound.
    pub inverse_bind: Mat4,
    world: Mat4,
}

impl Bone {
    #[inline]
    pub fn parent(&self) -> Option<BoneId> {
        self.parent
    }

    #[inline]
    pub fn children(&self) -> &[BoneId] {
        &self.children
    }

    /// World matrix as of the last `Skeleton::update()`.
    #[inline]
    pub fn world_matrix(&self) -> Mat4 {
        self.world
    }

    #[inline]
    pub fn world_position(&self) -> Vec3 {
        self.world.w_axis.truncate()
    }

    /// Final skinning matrix.
    #[inline]
    pub fn skinning_matrix(&self) -> Mat4 {
        self.world * self.inverse_bind
    }
}

#[derive(Clone, Debug, Default)]
pub struct Skeleton {
    bones: Vec<Bone>,
    by_name: HashMap<String, BoneId>,
    roots: Vec<BoneId>,
}

impl Skeleton {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a bone under `parent` (or as a root). The parent must already
    /// exist and names must be unique.
    pub fn add_bone(
        &mut self,
        name: impl Into<String>,
        parent: Option<BoneId>,
        local: Transform,
    ) -> Result<BoneId> {
        let name = name.into();
        if self.by_name.contains_key(&name) {
            return Err(RigError::DuplicateBone { name });
        }
        if let Some(p) = parent {
            if p.index() >= self.bones.len() {
                return Err(RigError::UnknownParent { name, parent: p.0 });
            }
        }

        let id = BoneId::from_index(self.bones.len());
        let world = match parent {
            Some(p) => self.bones[p.index()].world * local.to_matrix(),
            None => local.to_matrix(),
        };
        match parent {
            Some(p) => self.bones[p.index()].children.push(id),
            None => self.roots.push(id),
        }
        self.by_name.insert(name.clone(), id);
        self.bones.push(Bone {
            name,
            parent,
            children: Vec::new(),
            local,
            inverse_bind: Mat4::IDENTITY,
            world,
        });
        Ok(id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bones.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    #[inline]
    pub fn roots(&self) -> &[BoneId] {
        &self.roots
    }

    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    pub fn find(&self, name: &str) -> Option<BoneId> {
        self.by_name.get(name).copied()
    }

    pub fn bone(&self, id: BoneId) -> Option<&Bone> {
        self.bones.get(id.index())
    }

    pub fn bone_mut(&mut self, id: BoneId) -> Option<&mut Bone> {
        self.bones.get_mut(id.index())
    }

    pub fn bone_by_name(&self, name: &str) -> Option<&Bone> {
        self.find(name).and_then(|id| self.bone(id))
    }

    pub fn bone_by_name_mut(&mut self, name: &str) -> Option<&mut Bone> {
        let id = self.find(name)?;
        self.bone_mut(id)
    }

    /// World position of `id` as of the last update.
    pub fn world_position(&self, id: BoneId) -> Option<Vec3> {
        self.bone(id).map(Bone::world_position)
    }

    /// Recompute world matrices top-down from the roots.
    pub fn update(&mut self) {
        let mut stack: Vec<(BoneId, Mat4)> = self
            .roots
            .iter()
            .rev()
            .map(|id| (*id, Mat4::IDENTITY))
            .collect();
        while let Some((id, parent_world)) = stack.pop() {
            let bone = &mut self.bones[id.index()];
            bone.world = parent_world * bone.local.to_matrix();
            let world = bone.world;
            stack.extend(bone.children.iter().rev().map(|c| (*c, world)));
        }
    }

    /// Capture the current pose as the bind pose: refresh world matrices and
    /// store their inverses. Singular bind matrices (zero scale) bind to identity.
    pub fn bind(&mut self) {
        self.update();
        for bone in &mut self.bones {
            let det = bone.world.determinant();
            bone.inverse_bind = if det.is_finite() && det.abs() > f32::EPSILON {
                bone.world.inverse()
            } else {
                log::warn!("bone '{}' has a singular bind matrix, using identity", bone.name);
                Mat4::IDENTITY
            };
        }
    }

    /// `world * inverse_bind` for every bone, in insertion order.
    pub fn bone_matrices(&self) -> Vec<Mat4> {
        self.bones.iter().map(Bone::skinning_matrix).collect()
    }

    /// Write pose values whose target names match bones into their local
    /// transforms. Other targets are ignored. Call `update()` afterwards.
    pub fn apply_pose(&mut self, pose: &Pose) {
        for (target, channel, value) in pose.iter() {
            if let Some(&id) = self.by_name.get(target) {
                write_channel(&mut self.bones[id.index()].local, channel, value);
            }
        }
    }
}
