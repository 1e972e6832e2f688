//! Target binding.
//!
//! A target exposes settable Position/Rotation/Scale slots plus arbitrary
//! property paths through [`TargetSink`]. Players and blenders keep a
//! [`Bindings`] table mapping target names to sinks; the sink is resolved once
//! at `bind` time and written every tick.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use glam::{Quat, Vec3};
use hashbrown::HashMap;

use crate::data::Channel;
use crate::pose::Pose;
use crate::skeleton::Transform;
use crate::value::Value;

/// Capability interface for anything animation can write into.
pub trait TargetSink {
    fn set_position(&mut self, position: Vec3);
    fn set_rotation(&mut self, rotation: Quat);
    fn set_scale(&mut self, scale: Vec3);
    /// Property channels; targets without properties ignore them.
    fn set_property(&mut self, _path: &str, _value: Value) {}
}

/// Route one channel value into a sink. Returns false when the value kind does
/// not fit the channel (e.g. a quaternion on Position); nothing is written then.
pub fn write_channel(sink: &mut dyn TargetSink, channel: &Channel, value: &Value) -> bool {
    match (channel, value) {
        (Channel::Position, Value::Vec3(v)) => sink.set_position(*v),
        (Channel::Rotation, Value::Quat(q)) => sink.set_rotation(*q),
        (Channel::Scale, Value::Vec3(v)) => sink.set_scale(*v),
        (Channel::Property(path), v) => sink.set_property(path, *v),
        _ => return false,
    }
    true
}

impl TargetSink for Transform {
    fn set_position(&mut self, position: Vec3) {
        self.translation = position;
    }

    fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation;
    }

    fn set_scale(&mut self, scale: Vec3) {
        self.scale = scale;
    }
}

/// Shared targets: the host keeps one handle, the binding table another.
impl<T: TargetSink> TargetSink for Rc<RefCell<T>> {
    fn set_position(&mut self, position: Vec3) {
        self.borrow_mut().set_position(position);
    }

    fn set_rotation(&mut self, rotation: Quat) {
        self.borrow_mut().set_rotation(rotation);
    }

    fn set_scale(&mut self, scale: Vec3) {
        self.borrow_mut().set_scale(scale);
    }

    fn set_property(&mut self, path: &str, value: Value) {
        self.borrow_mut().set_property(path, value);
    }
}

/// Target name -> sink registry.
#[derive(Default)]
pub struct Bindings {
    sinks: HashMap<String, Box<dyn TargetSink>>,
}

impl fmt::Debug for Bindings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bindings")
            .field("targets", &self.sinks.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the sink for `target`.
    pub fn bind(&mut self, target: impl Into<String>, sink: impl TargetSink + 'static) {
        self.sinks.insert(target.into(), Box::new(sink));
    }

    pub fn unbind(&mut self, target: &str) -> bool {
        self.sinks.remove(target).is_some()
    }

    pub fn is_bound(&self, target: &str) -> bool {
        self.sinks.contains_key(target)
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    /// Push every value of `pose` whose target has a sink.
    pub fn apply(&mut self, pose: &Pose) {
        if self.sinks.is_empty() {
            return;
        }
        for (target, channel, value) in pose.iter() {
            if let Some(sink) = self.sinks.get_mut(target) {
                if !write_channel(sink.as_mut(), channel, value) {
                    log::trace!("target '{target}': {:?} value on {channel:?} ignored", value.kind());
                }
            }
        }
    }
}
