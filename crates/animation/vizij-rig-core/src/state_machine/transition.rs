//! Guarded transitions between states.

use serde::{Deserialize, Serialize};

use crate::state_machine::parameters::{ParameterValue, Parameters};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comparison {
    Equal,
    NotEqual,
    Greater,
    Less,
    GreaterOrEqual,
    LessOrEqual,
}

/// `parameter <comparison> value`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionCondition {
    pub parameter: String,
    pub comparison: Comparison,
    pub value: ParameterValue,
}

impl TransitionCondition {
    pub fn new(
        parameter: impl Into<String>,
        comparison: Comparison,
        value: impl Into<ParameterValue>,
    ) -> Self {
        Self {
            parameter: parameter.into(),
            comparison,
            value: value.into(),
        }
    }

    /// Holds while the trigger `parameter` is raised.
    pub fn trigger(parameter: impl Into<String>) -> Self {
        Self::new(parameter, Comparison::Equal, ParameterValue::Trigger(true))
    }

    /// Undeclared parameters never satisfy a condition. Ordering comparisons
    /// need numbers on both sides and are false otherwise.
    pub fn evaluate(&self, params: &Parameters) -> bool {
        let Some(actual) = params.get(&self.parameter) else {
            return false;
        };
        match self.comparison {
            Comparison::Equal => actual.loosely_equals(&self.value),
            Comparison::NotEqual => !actual.loosely_equals(&self.value),
            ordering => match (actual.as_number(), self.value.as_number()) {
                (Some(a), Some(b)) => match ordering {
                    Comparison::Greater => a > b,
                    Comparison::Less => a < b,
                    Comparison::GreaterOrEqual => a >= b,
                    Comparison::LessOrEqual => a <= b,
                    Comparison::Equal | Comparison::NotEqual => false,
                },
                _ => false,
            },
        }
    }
}

/// Edge `from -> to`. All conditions must hold (and the exit time, if any, must
/// be reached) for the transition to fire.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateTransition {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub conditions: Vec<TransitionCondition>,
    /// Cross-fade length in seconds; 0 switches within the firing tick.
    #[serde(default)]
    pub duration: f32,
    /// Normalized clip time (0..1) before which the transition cannot fire.
    #[serde(default)]
    pub exit_time: Option<f32>,
}

impl StateTransition {
    pub fn new(from: impl Into<String>, to: impl Into<String>, duration: f32) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            conditions: Vec::new(),
            duration,
            exit_time: None,
        }
    }

    pub fn with_condition(mut self, condition: TransitionCondition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn with_exit_time(mut self, exit_time: f32) -> Self {
        self.exit_time = Some(exit_time);
        self
    }

    /// Guard check given the current normalized time of the source state.
    pub fn can_fire(&self, normalized_time: f32, params: &Parameters) -> bool {
        if let Some(exit) = self.exit_time {
            if normalized_time < exit {
                return false;
            }
        }
        self.conditions.iter().all(|c| c.evaluate(params))
    }
}
