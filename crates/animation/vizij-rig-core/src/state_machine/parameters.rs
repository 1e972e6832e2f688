//! Named parameters driving state machine transitions.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

/// Typed parameter value. Triggers are booleans consumed when a transition fires.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum ParameterValue {
    Bool(bool),
    Float(f32),
    Int(i32),
    Trigger(bool),
}

impl ParameterValue {
    /// Numeric view of `Float` and `Int`.
    pub fn as_number(&self) -> Option<f32> {
        match *self {
            ParameterValue::Float(x) => Some(x),
            ParameterValue::Int(i) => Some(i as f32),
            _ => None,
        }
    }

    /// Boolean view of `Bool` and `Trigger`.
    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            ParameterValue::Bool(b) | ParameterValue::Trigger(b) => Some(b),
            _ => None,
        }
    }

    #[inline]
    pub fn is_trigger(&self) -> bool {
        matches!(self, ParameterValue::Trigger(_))
    }

    /// Value equality across compatible kinds: booleans with booleans (a trigger
    /// compares as its flag), numbers with numbers. Other pairs are unequal.
    pub fn loosely_equals(&self, other: &ParameterValue) -> bool {
        if let (Some(a), Some(b)) = (self.as_bool(), other.as_bool()) {
            return a == b;
        }
        if let (Some(a), Some(b)) = (self.as_number(), other.as_number()) {
            return a == b;
        }
        false
    }
}

impl From<bool> for ParameterValue {
    fn from(b: bool) -> Self {
        ParameterValue::Bool(b)
    }
}

impl From<f32> for ParameterValue {
    fn from(x: f32) -> Self {
        ParameterValue::Float(x)
    }
}

impl From<i32> for ParameterValue {
    fn from(i: i32) -> Self {
        ParameterValue::Int(i)
    }
}

/// Parameter table. Parameters are declared with a type first; setters only
/// write to an existing parameter of the matching type.
#[derive(Clone, Debug, Default)]
pub struct Parameters {
    values: HashMap<String, ParameterValue>,
}

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare (or redeclare) a parameter with its initial value.
    pub fn add(&mut self, name: impl Into<String>, value: ParameterValue) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<ParameterValue> {
        self.values.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParameterValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn set_bool(&mut self, name: &str, value: bool) {
        self.write(name, |slot| match slot {
            ParameterValue::Bool(b) => {
                *b = value;
                true
            }
            _ => false,
        });
    }

    pub fn set_float(&mut self, name: &str, value: f32) {
        self.write(name, |slot| match slot {
            ParameterValue::Float(x) => {
                *x = value;
                true
            }
            _ => false,
        });
    }

    pub fn set_int(&mut self, name: &str, value: i32) {
        self.write(name, |slot| match slot {
            ParameterValue::Int(i) => {
                *i = value;
                true
            }
            _ => false,
        });
    }

    /// Raise a trigger.
    pub fn set_trigger(&mut self, name: &str) {
        self.write(name, |slot| match slot {
            ParameterValue::Trigger(t) => {
                *t = true;
                true
            }
            _ => false,
        });
    }

    /// Lower every trigger, whichever transition consumed them.
    pub fn reset_triggers(&mut self) {
        for value in self.values.values_mut() {
            if let ParameterValue::Trigger(t) = value {
                *t = false;
            }
        }
    }

    fn write(&mut self, name: &str, f: impl FnOnce(&mut ParameterValue) -> bool) {
        match self.values.get_mut(name) {
            Some(slot) => {
                if !f(slot) {
                    log::trace!("parameter '{name}': type mismatch, write ignored");
                }
            }
            None => log::trace!("parameter '{name}' not declared, write ignored"),
        }
    }
}
