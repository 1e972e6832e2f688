//! Accumulation of weighted per-channel contributions into final Values.
//!
//! Contributions are bucketed by (target, channel). A bucket with a single
//! contributor passes its value through untouched. Otherwise weights are
//! normalized over the contributors of that bucket only:
//! - scalars and vectors: weighted sum;
//! - quaternions: sequential slerp in contribution order, blending each new
//!   value with factor `w / (w_acc + w)`.

use glam::{Quat, Vec3};
use hashbrown::HashMap;

use crate::data::Channel;
use crate::interp::functions::slerp_quat;
use crate::pose::Pose;
use crate::value::Value;

#[derive(Clone, Debug)]
enum AccumEntry {
    Float {
        first: f32,
        sum: f32,
        w: f32,
        count: u32,
    },
    Vec3 {
        first: Vec3,
        sum: Vec3,
        w: f32,
        count: u32,
    },
    /// Running slerp result and the weight already folded into it.
    Quat { acc: Quat, w: f32 },
}

impl AccumEntry {
    fn from_value(v: &Value, w: f32) -> Self {
        match v {
            Value::Float(x) => AccumEntry::Float {
                first: *x,
                sum: x * w,
                w,
                count: 1,
            },
            Value::Vec3(a) => AccumEntry::Vec3 {
                first: *a,
                sum: *a * w,
                w,
                count: 1,
            },
            Value::Quat(q) => AccumEntry::Quat { acc: *q, w },
        }
    }

    fn add_value(&mut self, v: &Value, w: f32) {
        match (self, v) {
            (AccumEntry::Float { sum, w: ww, count, .. }, Value::Float(x)) => {
                *sum += x * w;
                *ww += w;
                *count += 1;
            }
            (AccumEntry::Vec3 { sum, w: ww, count, .. }, Value::Vec3(a)) => {
                *sum += *a * w;
                *ww += w;
                *count += 1;
            }
            (AccumEntry::Quat { acc, w: ww }, Value::Quat(q)) => {
                let t = w / (*ww + w);
                *acc = slerp_quat(*acc, *q, t);
                *ww += w;
            }
            _ => {
                // Mismatched kind; ignore additional values to keep fail-soft behavior.
            }
        }
    }

    fn finalize(self) -> Value {
        match self {
            AccumEntry::Float { first, count, .. } if count == 1 => Value::Float(first),
            AccumEntry::Float { sum, w, .. } => Value::Float(sum / w),
            AccumEntry::Vec3 { first, count, .. } if count == 1 => Value::Vec3(first),
            AccumEntry::Vec3 { sum, w, .. } => Value::Vec3(sum / w),
            AccumEntry::Quat { acc, .. } => Value::Quat(acc),
        }
    }
}

/// Accumulates per-channel contributions across layers or samples.
#[derive(Default)]
pub struct Accumulator {
    map: HashMap<String, HashMap<Channel, AccumEntry>>,
}

impl Accumulator {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    /// Add one contribution; non-positive weights are ignored.
    pub fn add(&mut self, target: &str, channel: &Channel, value: &Value, weight: f32) {
        if weight.is_nan() || weight <= 0.0 {
            return;
        }
        let channels = self.map.entry_ref(target).or_default();
        match channels.get_mut(channel) {
            Some(entry) => entry.add_value(value, weight),
            None => {
                channels.insert(channel.clone(), AccumEntry::from_value(value, weight));
            }
        }
    }

    /// Add every channel of a pose with the same weight.
    pub fn add_pose(&mut self, pose: &Pose, weight: f32) {
        for (target, channel, value) in pose.iter() {
            self.add(target, channel, value, weight);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn finalize(self) -> Pose {
        let mut out = Pose::with_capacity(self.map.len());
        for (target, channels) in self.map.into_iter() {
            for (channel, entry) in channels.into_iter() {
                out.insert(&target, channel, entry.finalize());
            }
        }
        out
    }
}

/// Layer `delta` on top of `base` scaled by `weight` (clamped to [0,1]).
///
/// Scalars and vectors add `weight * delta`; rotations pre-multiply the
/// partial delta rotation `slerp(identity, delta, weight)`. Channels missing
/// from `base` receive the scaled delta alone.
pub fn apply_additive(base: &mut Pose, delta: &Pose, weight: f32) {
    let weight = weight.clamp(0.0, 1.0);
    if weight <= 0.0 {
        return;
    }
    for (target, channel, d) in delta.iter() {
        let combined = match (base.get(target, channel), d) {
            (Some(Value::Float(b)), Value::Float(x)) => Value::Float(b + x * weight),
            (Some(Value::Vec3(b)), Value::Vec3(x)) => Value::Vec3(*b + *x * weight),
            (Some(Value::Quat(b)), Value::Quat(x)) => {
                Value::Quat((slerp_quat(Quat::IDENTITY, *x, weight) * *b).normalize())
            }
            (Some(_), _) => continue,
            (None, Value::Float(x)) => Value::Float(x * weight),
            (None, Value::Vec3(x)) => Value::Vec3(*x * weight),
            (None, Value::Quat(x)) => Value::Quat(slerp_quat(Quat::IDENTITY, *x, weight)),
        };
        base.insert(target, channel.clone(), combined);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_contributor_passes_through() {
        let mut acc = Accumulator::new();
        acc.add("a", &Channel::Position, &Value::Vec3(Vec3::new(0.1, 0.2, 0.3)), 0.37);
        let pose = acc.finalize();
        assert_eq!(
            pose.get("a", &Channel::Position),
            Some(&Value::Vec3(Vec3::new(0.1, 0.2, 0.3)))
        );
    }

    #[test]
    fn normalizes_over_contributors_only() {
        let mut acc = Accumulator::new();
        acc.add("a", &Channel::Property("x".into()), &Value::Float(2.0), 0.25);
        acc.add("a", &Channel::Property("x".into()), &Value::Float(6.0), 0.75);
        acc.add("a", &Channel::Property("y".into()), &Value::Float(1.0), 0.1);
        let pose = acc.finalize();
        assert_eq!(pose.get("a", &Channel::Property("x".into())), Some(&Value::Float(5.0)));
        assert_eq!(pose.get("a", &Channel::Property("y".into())), Some(&Value::Float(1.0)));
    }

    #[test]
    fn additive_offsets_base() {
        let mut base = Pose::new();
        base.insert("a", Channel::Position, Value::Vec3(Vec3::X));
        let mut delta = Pose::new();
        delta.insert("a", Channel::Position, Value::Vec3(Vec3::Y * 2.0));
        delta.insert("b", Channel::Property("p".into()), Value::Float(4.0));
        apply_additive(&mut base, &delta, 0.5);
        assert_eq!(
            base.get("a", &Channel::Position),
            Some(&Value::Vec3(Vec3::new(1.0, 1.0, 0.0)))
        );
        assert_eq!(base.get("b", &Channel::Property("p".into())), Some(&Value::Float(2.0)));
    }
}
