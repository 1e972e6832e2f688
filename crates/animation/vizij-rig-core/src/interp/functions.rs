//! Interpolation helpers:
//! - step_value (hold left)
//! - linear_value (component-wise lerp + quaternion slerp)
//! - cubic_value (Hermite basis on scalars, linear otherwise)
//! - quaternion slerp with shortest-arc correction

use glam::Quat;

use crate::value::Value;

/// Linear interpolation of scalars.
#[inline]
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Hermite basis weights `(h1, h2)` for the two end values of a segment.
#[inline]
pub fn hermite_weights(u: f32) -> (f32, f32) {
    let u2 = u * u;
    let u3 = u2 * u;
    (2.0 * u3 - 3.0 * u2 + 1.0, -2.0 * u3 + 3.0 * u2)
}

/// Quaternion slerp along the shortest arc. Nearly-parallel inputs fall back
/// to a normalized lerp to avoid dividing by a vanishing sine.
#[inline]
pub fn slerp_quat(a: Quat, b: Quat, t: f32) -> Quat {
    let mut b = b;
    let mut d = a.dot(b);
    if d < 0.0 {
        b = -b;
        d = -d;
    }
    const DOT_THRESHOLD: f32 = 0.9995;
    if d > DOT_THRESHOLD {
        return a.lerp(b, t).normalize();
    }
    let theta_0 = d.clamp(-1.0, 1.0).acos();
    let theta = theta_0 * t;
    let sin_theta_0 = theta_0.sin();
    let s0 = (theta_0 - theta).sin() / sin_theta_0;
    let s1 = theta.sin() / sin_theta_0;
    (a * s0 + b * s1).normalize()
}

/// Step interpolation: choose left value.
#[inline]
pub fn step_value(a: &Value) -> Value {
    *a
}

/// Linear interpolation across Value kinds.
pub fn linear_value(a: &Value, b: &Value, t: f32) -> Value {
    match (a, b) {
        (Value::Float(va), Value::Float(vb)) => Value::Float(lerp_f32(*va, *vb, t)),
        (Value::Vec3(va), Value::Vec3(vb)) => Value::Vec3(va.lerp(*vb, t)),
        (Value::Quat(qa), Value::Quat(qb)) => Value::Quat(slerp_quat(*qa, *qb, t)),
        // Fallback: if types mismatch, prefer left (fail-soft).
        _ => *a,
    }
}

/// Cubic segment. Without tangents the Hermite blend of two end values is only
/// meaningful for scalars; vectors and quaternions stay linear.
pub fn cubic_value(a: &Value, b: &Value, t: f32) -> Value {
    match (a, b) {
        (Value::Float(va), Value::Float(vb)) => {
            let (h1, h2) = hermite_weights(t);
            Value::Float(h1 * va + h2 * vb)
        }
        _ => linear_value(a, b, t),
    }
}
