use std::sync::Arc;

use vizij_rig_core::{
    data::{Channel, Clip, Track},
    outputs::CoreEvent,
    state_machine::{
        AnimationState, AnimationStateMachine, Comparison, ParameterValue, StateTransition,
        TransitionCondition,
    },
    value::Value,
};

fn approx(a: f32, b: f32, eps: f32) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

/// One-second clip holding `node.x = x`.
fn clip(name: &str, x: f32) -> Arc<Clip> {
    Arc::new(
        Clip::new(name).with_track(
            Track::new("node", Channel::Property("x".into()))
                .with_keyframe(0.0, x)
                .with_keyframe(1.0, x),
        ),
    )
}

fn started(events: &[CoreEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, CoreEvent::TransitionStarted { .. }))
        .count()
}

fn x_of(sm: &AnimationStateMachine) -> f32 {
    sm.blended_pose()
        .get("node", &Channel::Property("x".into()))
        .and_then(Value::as_float)
        .expect("x channel")
}

fn ping_pong_machine() -> AnimationStateMachine {
    let mut sm = AnimationStateMachine::new();
    sm.add_state(AnimationState::new("a", clip("a", 0.0)));
    sm.add_state(AnimationState::new("b", clip("b", 10.0)));
    sm.add_parameter("go", ParameterValue::Trigger(false));
    sm.add_transition(StateTransition::new("a", "b", 0.0).with_condition(TransitionCondition::trigger("go")));
    sm.add_transition(StateTransition::new("b", "a", 0.0).with_condition(TransitionCondition::trigger("go")));
    sm.set_default_state("a");
    sm
}

/// it should fire a trigger-gated transition once per set_trigger and lower the trigger
#[test]
fn trigger_fires_once() {
    let mut sm = ping_pong_machine();

    sm.set_trigger("go");
    let out = sm.update(0.1);
    assert_eq!(started(&out.events), 1);
    assert!(out
        .events
        .contains(&CoreEvent::StateEntered { state: "b".into() }));
    assert_eq!(sm.parameters().get("go"), Some(ParameterValue::Trigger(false)));
    assert_eq!(sm.current_state(), Some("b"));

    let mut fired = 0;
    for _ in 0..5 {
        fired += started(&sm.update(0.1).events);
    }
    assert_eq!(fired, 0);
    assert_eq!(sm.current_state(), Some("b"));

    sm.set_trigger("go");
    assert_eq!(started(&sm.update(0.1).events), 1);
    assert_eq!(sm.current_state(), Some("a"));
}

/// it should reset every trigger when any transition fires
#[test]
fn firing_consumes_all_triggers() {
    let mut sm = ping_pong_machine();
    sm.add_parameter("unrelated", ParameterValue::Trigger(false));
    sm.set_trigger("unrelated");
    sm.set_trigger("go");
    sm.update(0.1);
    assert_eq!(sm.parameters().get("unrelated"), Some(ParameterValue::Trigger(false)));
}

/// it should fire the first matching transition in insertion order
#[test]
fn first_match_wins() {
    let mut sm = AnimationStateMachine::new();
    for (name, x) in [("idle", 0.0), ("walk", 1.0), ("run", 2.0)] {
        sm.add_state(AnimationState::new(name, clip(name, x)));
    }
    sm.add_parameter("speed", ParameterValue::Float(0.0));
    sm.add_transition(
        StateTransition::new("idle", "walk", 0.0)
            .with_condition(TransitionCondition::new("speed", Comparison::Greater, 0.1_f32)),
    );
    sm.add_transition(
        StateTransition::new("idle", "run", 0.0)
            .with_condition(TransitionCondition::new("speed", Comparison::Greater, 0.5_f32)),
    );
    sm.set_default_state("idle");

    sm.set_float("speed", 1.0);
    sm.update(0.1);
    assert_eq!(sm.current_state(), Some("walk"));
}

/// it should hold a transition until the exit time is reached
#[test]
fn exit_time_gate() {
    let mut sm = AnimationStateMachine::new();
    sm.add_state(AnimationState::new("attack", clip("attack", 1.0)).with_looping(false));
    sm.add_state(AnimationState::new("idle", clip("idle", 0.0)));
    sm.add_transition(StateTransition::new("attack", "idle", 0.5).with_exit_time(0.75));
    sm.set_default_state("attack");

    assert_eq!(started(&sm.update(0.25).events), 0);
    assert_eq!(started(&sm.update(0.25).events), 0);
    let out = sm.update(0.25);
    assert_eq!(
        out.events,
        vec![CoreEvent::TransitionStarted {
            from: "attack".into(),
            to: "idle".into()
        }]
    );
    assert!(sm.is_transitioning());
    assert_eq!(sm.next_state(), Some("idle"));
}

/// it should cross-fade by progress, update both players, and swap at the end
#[test]
fn cross_fade_progress_and_swap() {
    let mut sm = AnimationStateMachine::new();
    sm.add_state(AnimationState::new("a", clip("a", 0.0)));
    sm.add_state(AnimationState::new("b", clip("b", 10.0)));
    sm.add_parameter("go", ParameterValue::Bool(false));
    sm.add_transition(
        StateTransition::new("a", "b", 1.0)
            .with_condition(TransitionCondition::new("go", Comparison::Equal, true)),
    );
    sm.set_default_state("a");

    sm.set_bool("go", true);
    sm.update(0.5);
    assert!(sm.is_transitioning());
    approx(sm.progress(), 0.0, 0.0);
    approx(x_of(&sm), 0.0, 0.0);

    sm.update(0.25);
    approx(sm.progress(), 0.25, 1e-6);
    approx(x_of(&sm), 2.5, 1e-5);
    approx(sm.next_player().unwrap().time(), 0.25, 1e-6);
    approx(sm.current_player().time(), 0.75, 1e-6);

    sm.update(0.5);
    let out = sm.update(0.25);
    assert!(out
        .events
        .contains(&CoreEvent::StateEntered { state: "b".into() }));
    assert!(!sm.is_transitioning());
    assert!(sm.next_player().is_none());
    assert_eq!(sm.current_state(), Some("b"));
    approx(sm.progress(), 0.0, 0.0);
    approx(sm.state_time(), 0.0, 0.0);
    approx(x_of(&sm), 10.0, 0.0);
}

/// it should not evaluate transitions while one is running
#[test]
fn transitions_are_not_interruptible() {
    let mut sm = AnimationStateMachine::new();
    for name in ["a", "b", "c"] {
        sm.add_state(AnimationState::new(name, clip(name, 0.0)));
    }
    sm.add_parameter("go", ParameterValue::Trigger(false));
    sm.add_parameter("alt", ParameterValue::Trigger(false));
    sm.add_transition(StateTransition::new("a", "b", 1.0).with_condition(TransitionCondition::trigger("go")));
    sm.add_transition(StateTransition::new("a", "c", 0.0).with_condition(TransitionCondition::trigger("alt")));
    sm.add_transition(StateTransition::new("b", "c", 0.0).with_condition(TransitionCondition::trigger("alt")));
    sm.set_default_state("a");

    sm.set_trigger("go");
    sm.update(0.1);
    sm.set_trigger("alt");
    assert_eq!(started(&sm.update(0.5).events), 0);
    assert_eq!(sm.next_state(), Some("b"));

    sm.update(0.5);
    assert_eq!(sm.current_state(), Some("b"));
    sm.update(0.1);
    assert_eq!(sm.current_state(), Some("c"));
}

/// it should abandon a running transition on set_default_state and ignore unknown names
#[test]
fn default_state_resets() {
    let mut sm = ping_pong_machine();
    sm.add_transition(StateTransition::new("a", "b", 2.0));
    sm.set_default_state("nope");
    assert_eq!(sm.current_state(), Some("a"));

    // The unconditional transition was added after the trigger one, but with
    // the trigger low it is the first that matches.
    sm.update(0.1);
    assert!(sm.is_transitioning());

    sm.set_default_state("a");
    assert!(!sm.is_transitioning());
    assert_eq!(sm.current_state(), Some("a"));
    approx(sm.current_player().time(), 0.0, 0.0);
}

/// it should do nothing until a default state is chosen
#[test]
fn no_state_no_output() {
    let mut sm = AnimationStateMachine::new();
    sm.add_state(AnimationState::new("a", clip("a", 0.0)));
    sm.set_bool("missing", true);
    assert!(sm.update(0.1).is_empty());
    assert_eq!(sm.current_state(), None);
}

/// it should forward player events such as Finished from non-looping states
#[test]
fn forwards_player_events() {
    let mut sm = AnimationStateMachine::new();
    sm.add_state(AnimationState::new("once", clip("once", 1.0)).with_looping(false));
    sm.set_default_state("once");
    let out = sm.update(1.5);
    assert!(out.events.contains(&CoreEvent::Finished {
        clip: "once".into()
    }));
}
