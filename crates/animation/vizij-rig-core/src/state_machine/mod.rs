//! Parameter-driven state machine with cross-fading transitions.
//!
//! Each state plays one clip. Every `update(dt)` first advances the current
//! player, then scans the current state's outgoing transitions in the order
//! they were added and fires the first one whose guard holds. That order is
//! part of the contract: add the more specific transition first.
//!
//! A firing transition starts a second player for the target state, lowers all
//! trigger parameters, and cross-fades over `duration`. Transitions are not
//! interruptible; nothing is scanned until the running one completes.

pub mod parameters;
pub mod transition;

use std::sync::Arc;

use hashbrown::HashMap;

pub use parameters::{ParameterValue, Parameters};
pub use transition::{Comparison, StateTransition, TransitionCondition};

use crate::accumulate::Accumulator;
use crate::binding::{Bindings, TargetSink};
use crate::data::Clip;
use crate::outputs::{CoreEvent, Outputs};
use crate::player::{AnimationPlayer, LoopMode};
use crate::pose::Pose;

#[derive(Clone, Debug)]
pub struct AnimationState {
    pub name: String,
    pub clip: Arc<Clip>,
    pub speed: f32,
    pub looping: bool,
    transitions: Vec<StateTransition>,
}

impl AnimationState {
    /// A looping state at normal speed.
    pub fn new(name: impl Into<String>, clip: Arc<Clip>) -> Self {
        Self {
            name: name.into(),
            clip,
            speed: 1.0,
            looping: true,
            transitions: Vec::new(),
        }
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    /// Outgoing transitions in evaluation order.
    pub fn transitions(&self) -> &[StateTransition] {
        &self.transitions
    }

    fn start(&self, player: &mut AnimationPlayer) {
        player.stop();
        player.set_clip(Arc::clone(&self.clip));
        player.set_speed(self.speed);
        let mode = if self.looping {
            LoopMode::Loop
        } else {
            LoopMode::Once
        };
        player.play(mode);
    }
}

#[derive(Clone, Copy, Debug)]
struct ActiveTransition {
    to: usize,
    duration: f32,
}

#[derive(Debug, Default)]
pub struct AnimationStateMachine {
    states: Vec<AnimationState>,
    index: HashMap<String, usize>,
    parameters: Parameters,
    current: Option<usize>,
    current_player: AnimationPlayer,
    next_player: AnimationPlayer,
    transition: Option<ActiveTransition>,
    progress: f32,
    state_time: f32,
    bindings: Bindings,
    outputs: Outputs,
}

impl AnimationStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a state. A state with the same name is replaced, transitions
    /// included.
    pub fn add_state(&mut self, state: AnimationState) {
        match self.index.get(&state.name) {
            Some(&i) => self.states[i] = state,
            None => {
                self.index.insert(state.name.clone(), self.states.len());
                self.states.push(state);
            }
        }
    }

    /// Append a transition to its source state's list. Transitions whose source
    /// state is unknown are dropped; unknown targets are skipped when scanning.
    pub fn add_transition(&mut self, transition: StateTransition) {
        match self.index.get(&transition.from) {
            Some(&i) => self.states[i].transitions.push(transition),
            None => log::trace!(
                "add_transition: unknown source state '{}'",
                transition.from
            ),
        }
    }

    pub fn states(&self) -> &[AnimationState] {
        &self.states
    }

    pub fn state(&self, name: &str) -> Option<&AnimationState> {
        self.index.get(name).map(|&i| &self.states[i])
    }

    /// Enter `name` immediately, abandoning any running transition.
    pub fn set_default_state(&mut self, name: &str) {
        let Some(&i) = self.index.get(name) else {
            log::trace!("set_default_state: unknown state '{name}'");
            return;
        };
        self.transition = None;
        self.progress = 0.0;
        self.state_time = 0.0;
        self.next_player.stop();
        self.states[i].start(&mut self.current_player);
        self.current = Some(i);
    }

    pub fn add_parameter(&mut self, name: impl Into<String>, value: ParameterValue) {
        self.parameters.add(name, value);
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    pub fn set_bool(&mut self, name: &str, value: bool) {
        self.parameters.set_bool(name, value);
    }

    pub fn set_float(&mut self, name: &str, value: f32) {
        self.parameters.set_float(name, value);
    }

    pub fn set_int(&mut self, name: &str, value: i32) {
        self.parameters.set_int(name, value);
    }

    pub fn set_trigger(&mut self, name: &str) {
        self.parameters.set_trigger(name);
    }

    pub fn current_state(&self) -> Option<&str> {
        self.current.map(|i| self.states[i].name.as_str())
    }

    /// Target state of the running transition.
    pub fn next_state(&self) -> Option<&str> {
        self.transition.map(|t| self.states[t.to].name.as_str())
    }

    #[inline]
    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    /// Cross-fade progress in [0,1); 0 when not transitioning.
    #[inline]
    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Seconds spent in the current state.
    #[inline]
    pub fn state_time(&self) -> f32 {
        self.state_time
    }

    pub fn current_player(&self) -> &AnimationPlayer {
        &self.current_player
    }

    /// The incoming state's player, only while transitioning.
    pub fn next_player(&self) -> Option<&AnimationPlayer> {
        self.transition.map(|_| &self.next_player)
    }

    /// Route blended values for `target` into `sink`.
    pub fn bind(&mut self, target: impl Into<String>, sink: impl TargetSink + 'static) {
        self.bindings.bind(target, sink);
    }

    pub fn outputs(&self) -> &Outputs {
        &self.outputs
    }

    /// Advance players, detect and progress transitions, then publish the
    /// blended pose.
    pub fn update(&mut self, dt: f32) -> &Outputs {
        self.outputs.clear();
        let Some(current) = self.current else {
            return &self.outputs;
        };
        let dt = dt.max(0.0);
        self.state_time += dt;

        match self.transition {
            Some(active) => {
                self.progress += if active.duration > 0.0 {
                    dt / active.duration
                } else {
                    1.0
                };
                self.step_players(dt, true);
                if self.progress >= 1.0 {
                    self.complete_transition(active.to);
                }
            }
            None => {
                self.step_players(dt, false);
                if let Some(t) = self.pick_transition(current) {
                    self.begin_transition(current, t);
                }
            }
        }

        self.outputs.pose = self.blended_pose();
        self.bindings.apply(&self.outputs.pose);
        &self.outputs
    }

    /// Current pose, weighting the outgoing and incoming players by progress
    /// while a transition runs.
    pub fn blended_pose(&self) -> Pose {
        if self.transition.is_none() {
            return self.current_player.sample();
        }
        let mut acc = Accumulator::new();
        acc.add_pose(&self.current_player.sample(), 1.0 - self.progress);
        acc.add_pose(&self.next_player.sample(), self.progress);
        acc.finalize()
    }

    fn step_players(&mut self, dt: f32, both: bool) {
        let events = &mut self.outputs.events;
        events.extend(self.current_player.update(dt).events.iter().cloned());
        if both {
            events.extend(self.next_player.update(dt).events.iter().cloned());
        }
    }

    /// Index of the first transition of `state` whose guard holds.
    fn pick_transition(&self, state: usize) -> Option<usize> {
        let state = &self.states[state];
        let duration = state.clip.duration();
        let normalized = if duration > 0.0 {
            self.current_player.time() / duration
        } else {
            1.0
        };
        state.transitions.iter().position(|t| {
            self.index.contains_key(&t.to) && t.can_fire(normalized, &self.parameters)
        })
    }

    fn begin_transition(&mut self, from: usize, transition: usize) {
        let t = &self.states[from].transitions[transition];
        let Some(&to) = self.index.get(&t.to) else {
            return;
        };
        let duration = t.duration;
        log::debug!(
            "transition '{}' -> '{}' ({duration}s)",
            self.states[from].name,
            self.states[to].name
        );

        self.states[to].start(&mut self.next_player);
        self.parameters.reset_triggers();
        self.transition = Some(ActiveTransition { to, duration });
        self.progress = 0.0;
        self.outputs.push_event(CoreEvent::TransitionStarted {
            from: self.states[from].name.clone(),
            to: self.states[to].name.clone(),
        });

        if duration <= 0.0 {
            self.complete_transition(to);
        }
    }

    fn complete_transition(&mut self, to: usize) {
        std::mem::swap(&mut self.current_player, &mut self.next_player);
        self.next_player.stop();
        self.current = Some(to);
        self.transition = None;
        self.progress = 0.0;
        self.state_time = 0.0;
        let state = self.states[to].name.clone();
        log::debug!("entered state '{state}'");
        self.outputs.push_event(CoreEvent::StateEntered { state });
    }
}
