//! Track sampling.
//!
//! Model:
//! - Each Track has keyframes sorted by time (seconds).
//! - `k1` is the last key with `time <= t`, `k2` the first key with `time >= t`.
//! - Before the first key only `k2` exists; after the last only `k1` exists.
//! - When both land on the same time the later-inserted key (`k1`) is returned
//!   exactly, so knots never pick up interpolation jitter.
//!
//! API:
//! - sample_track(&Track, t) where t is absolute clip time in seconds.

use crate::data::{Keyframe, Track};
use crate::interp::interpolate;
use crate::value::Value;

/// Bracketing keys around `t`: (last index with time <= t, first index with time >= t).
pub(crate) fn find_keys(keys: &[Keyframe], t: f32) -> (Option<usize>, Option<usize>) {
    // Both scans are monotone predicates over a sorted slice.
    let after_le = keys.partition_point(|k| k.time <= t);
    let k1 = after_le.checked_sub(1);
    let first_ge = keys.partition_point(|k| k.time < t);
    let k2 = (first_ge < keys.len()).then_some(first_ge);
    (k1, k2)
}

/// Sample a single track at absolute time `t`. `None` when the track has no keys.
pub fn sample_track(track: &Track, t: f32) -> Option<Value> {
    let keys = track.keyframes();
    match keys.len() {
        0 => None,
        1 => Some(keys[0].value),
        _ => match find_keys(keys, t) {
            (None, Some(k2)) => Some(keys[k2].value),
            (Some(k1), None) => Some(keys[k1].value),
            (Some(k1), Some(k2)) => {
                let left = &keys[k1];
                let right = &keys[k2];
                if k1 >= k2 || right.time <= left.time {
                    return Some(left.value);
                }
                let u = (t - left.time) / (right.time - left.time);
                Some(interpolate(
                    track.interpolation,
                    &left.value,
                    &right.value,
                    u.clamp(0.0, 1.0),
                ))
            }
            // Unreachable for a non-empty slice.
            (None, None) => Some(keys[0].value),
        },
    }
}
