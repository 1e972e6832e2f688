//! Closed-form look-at rotations.
//!
//! The returned rotation maps +Z onto the look direction and keeps +Y as close
//! to `up` as possible.

use glam::{Quat, Vec3};

/// Rotation aiming +Z along `direction`. A zero direction gives identity; an
/// `up` parallel to the direction picks an arbitrary perpendicular.
pub fn look_at_rotation(direction: Vec3, up: Vec3) -> Quat {
    let Some(forward) = direction.try_normalize() else {
        return Quat::IDENTITY;
    };
    let right = up
        .cross(forward)
        .try_normalize()
        .unwrap_or_else(|| forward.any_orthonormal_vector());
    let actual_up = forward.cross(right);
    quat_from_basis(right, actual_up, forward)
}

/// As [`look_at_rotation`], but never turns more than `max_angle` radians away
/// from identity; larger rotations are cut short along the same arc.
pub fn look_at_rotation_constrained(direction: Vec3, up: Vec3, max_angle: f32) -> Quat {
    let full = look_at_rotation(direction, up);
    let angle = full.angle_between(Quat::IDENTITY);
    if angle <= max_angle || angle <= f32::EPSILON {
        return full;
    }
    Quat::IDENTITY.slerp(full, max_angle.max(0.0) / angle)
}

/// Rotation matrix with columns `x`, `y`, `z` to quaternion, branching on the
/// largest diagonal term.
fn quat_from_basis(x: Vec3, y: Vec3, z: Vec3) -> Quat {
    let (m00, m01, m02) = (x.x, y.x, z.x);
    let (m10, m11, m12) = (x.y, y.y, z.y);
    let (m20, m21, m22) = (x.z, y.z, z.z);
    let trace = m00 + m11 + m22;

    let q = if trace > 0.0 {
        let s = 0.5 / (trace + 1.0).sqrt();
        Quat::from_xyzw((m21 - m12) * s, (m02 - m20) * s, (m10 - m01) * s, 0.25 / s)
    } else if m00 > m11 && m00 > m22 {
        let s = 2.0 * (1.0 + m00 - m11 - m22).sqrt();
        Quat::from_xyzw(0.25 * s, (m01 + m10) / s, (m02 + m20) / s, (m21 - m12) / s)
    } else if m11 > m22 {
        let s = 2.0 * (1.0 + m11 - m00 - m22).sqrt();
        Quat::from_xyzw((m01 + m10) / s, 0.25 * s, (m12 + m21) / s, (m02 - m20) / s)
    } else {
        let s = 2.0 * (1.0 + m22 - m00 - m11).sqrt();
        Quat::from_xyzw((m02 + m20) / s, (m12 + m21) / s, 0.25 * s, (m10 - m01) / s)
    };
    q.normalize()
}

/// Aims a joint at a target point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LookAtSolver {
    pub up: Vec3,
    /// Optional cap on the look angle, in radians.
    pub max_angle: Option<f32>,
}

impl Default for LookAtSolver {
    fn default() -> Self {
        Self {
            up: Vec3::Y,
            max_angle: None,
        }
    }
}

impl LookAtSolver {
    pub fn new(up: Vec3) -> Self {
        Self {
            up,
            max_angle: None,
        }
    }

    pub fn with_max_angle(mut self, max_angle: f32) -> Self {
        self.max_angle = Some(max_angle);
        self
    }

    /// Rotation for a joint at `origin` to face `target`.
    pub fn solve(&self, origin: Vec3, target: Vec3) -> Quat {
        let direction = target - origin;
        match self.max_angle {
            Some(max) => look_at_rotation_constrained(direction, self.up, max),
            None => look_at_rotation(direction, self.up),
        }
    }
}
