//! Interpolation dispatch.
//!
//! Maps a track's [`Interpolation`] mode onto the value-level helpers in
//! [`functions`].

pub mod functions;

use crate::data::Interpolation;
use crate::value::Value;

/// Interpolate between two key values with local segment parameter `u` in (0,1).
#[inline]
pub fn interpolate(mode: Interpolation, a: &Value, b: &Value, u: f32) -> Value {
    match mode {
        Interpolation::Step => functions::step_value(a),
        Interpolation::Linear => functions::linear_value(a, b, u),
        Interpolation::Cubic => functions::cubic_value(a, b, u),
    }
}
