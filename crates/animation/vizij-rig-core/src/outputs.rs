//! Per-tick output contracts.
//!
//! Outputs carry the values evaluated this tick and a separate list of
//! semantic events. Both are cleared at the start of every update.

use serde::{Deserialize, Serialize};

use crate::pose::Pose;

/// Discrete signals emitted during stepping.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum CoreEvent {
    /// A `Once` player reached the end of its clip.
    Finished { clip: String },
    /// A `Loop` player wrapped past the end of its clip `count` times this tick.
    Looped { clip: String, count: u32 },
    /// A state machine transition began blending toward `to`.
    TransitionStarted { from: String, to: String },
    /// A state machine finished its transition and now runs `state`.
    StateEntered { state: String },
}

/// Outputs returned by the `update` of players and state machines.
#[derive(Clone, Debug, Default)]
pub struct Outputs {
    /// Values evaluated this tick (empty when nothing was evaluated).
    pub pose: Pose,
    pub events: Vec<CoreEvent>,
}

impl Outputs {
    #[inline]
    pub fn clear(&mut self) {
        self.pose.clear();
        self.events.clear();
    }

    #[inline]
    pub fn push_event(&mut self, event: CoreEvent) {
        self.events.push(event);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pose.is_empty() && self.events.is_empty()
    }
}
