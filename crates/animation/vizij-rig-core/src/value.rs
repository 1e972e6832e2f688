//! Core value kinds and typed values for animation sampling/blending.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Float,
    Vec3,
    Quat,
}

/// A sampled channel value.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "data")]
pub enum Value {
    /// Scalar float (property channels)
    Float(f32),
    /// 3D vector (position/scale channels)
    Vec3(Vec3),
    /// Quaternion (x, y, z, w)
    Quat(Quat),
}

impl Value {
    #[inline]
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Float(_) => ValueKind::Float,
            Value::Vec3(_) => ValueKind::Vec3,
            Value::Quat(_) => ValueKind::Quat,
        }
    }

    #[inline]
    pub fn as_float(&self) -> Option<f32> {
        match self {
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_vec3(&self) -> Option<Vec3> {
        match self {
            Value::Vec3(v) => Some(*v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_quat(&self) -> Option<Quat> {
        match self {
            Value::Quat(q) => Some(*q),
            _ => None,
        }
    }

    /// True when every component is finite.
    pub fn is_finite(&self) -> bool {
        match self {
            Value::Float(v) => v.is_finite(),
            Value::Vec3(v) => v.is_finite(),
            Value::Quat(q) => q.is_finite(),
        }
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v)
    }
}

impl From<Vec3> for Value {
    fn from(v: Vec3) -> Self {
        Value::Vec3(v)
    }
}

impl From<Quat> for Value {
    fn from(q: Quat) -> Self {
        Value::Quat(q)
    }
}
