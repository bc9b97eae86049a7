use std::cell::RefCell;
use std::rc::Rc;

use proptween_core::{
    ChannelState, Orchestrator, TargetWorld, TweenError, TweenSpec, TweenState, Value,
};
use proptween_test_fixtures::{StubHost, StubWorld};

fn orch() -> Orchestrator<StubHost, StubWorld> {
    Orchestrator::new(StubHost::new(), StubWorld::new())
}

/// it should treat play on a playing tween as a no-op
#[test]
fn play_is_idempotent() {
    let mut orch = orch();
    let target = orch.world_mut().spawn(&[("X", Value::Float(0.0))]);
    let tween = orch.create(
        target,
        TweenSpec::new(1.0),
        vec![("X".into(), Value::Float(4.0))],
    );
    orch.play(tween).expect("play");
    orch.play(tween).expect("second play");
    assert_eq!(orch.state(tween), Some(TweenState::Playing));
    assert_eq!(orch.host().channels_created(), 1);

    orch.step(1.0);
    assert_eq!(orch.world().field(target, "X"), Some(Value::Float(4.0)));
}

/// it should freeze progress across pause and pick it back up on resume
#[test]
fn pause_resume_preserves_progress() {
    let mut orch = orch();
    let target = orch.world_mut().spawn(&[("X", Value::Float(0.0))]);
    let tween = orch.create(
        target,
        TweenSpec::new(1.0),
        vec![("X".into(), Value::Float(4.0))],
    );
    orch.play(tween).expect("play");
    orch.step(0.25);
    assert_eq!(orch.world().field(target, "X"), Some(Value::Float(1.0)));

    orch.pause(tween).expect("pause");
    assert_eq!(orch.state(tween), Some(TweenState::Paused));
    orch.step(5.0);
    assert_eq!(orch.world().field(target, "X"), Some(Value::Float(1.0)));

    orch.play(tween).expect("resume");
    orch.step(0.5);
    assert_eq!(orch.world().field(target, "X"), Some(Value::Float(3.0)));
    orch.step(0.25);
    assert_eq!(orch.world().field(target, "X"), Some(Value::Float(4.0)));
    assert!(!orch.contains(tween));
}

/// it should ignore pause unless the tween is actually playing
#[test]
fn pause_outside_playing_is_a_no_op() {
    let mut orch = orch();
    let target = orch.world_mut().spawn(&[("X", Value::Float(0.0))]);

    let idle = orch.create(
        target,
        TweenSpec::new(1.0),
        vec![("X".into(), Value::Float(4.0))],
    );
    orch.pause(idle).expect("pause");
    assert_eq!(orch.state(idle), Some(TweenState::Initial));

    let delayed = orch.create(
        target,
        TweenSpec::new(1.0).with_delay(0.5),
        vec![("X".into(), Value::Float(4.0))],
    );
    orch.play(delayed).expect("play");
    orch.pause(delayed).expect("pause");
    assert_eq!(orch.state(delayed), Some(TweenState::Delayed));
}

/// it should hold values through the delay window and promote on the wake
#[test]
fn delayed_start_promotes_on_wake() {
    let mut orch = orch();
    let target = orch.world_mut().spawn(&[("X", Value::Float(0.0))]);
    let tween = orch.create(
        target,
        TweenSpec::new(1.0).with_delay(0.5),
        vec![("X".into(), Value::Float(4.0))],
    );
    orch.play(tween).expect("play");
    assert_eq!(orch.state(tween), Some(TweenState::Delayed));
    assert_eq!(orch.primary_channel_state(tween), Some(ChannelState::Delayed));
    assert_eq!(orch.host().pending_wakes(), 1);

    orch.step(0.25);
    assert_eq!(orch.state(tween), Some(TweenState::Delayed));
    assert_eq!(orch.world().field(target, "X"), Some(Value::Float(0.0)));

    orch.step(0.25);
    assert_eq!(orch.state(tween), Some(TweenState::Playing));
    assert_eq!(orch.host().pending_wakes(), 0);

    orch.step(1.0);
    assert_eq!(orch.world().field(target, "X"), Some(Value::Float(4.0)));
    assert!(!orch.contains(tween));
}

/// it should cancel cleanly inside the delay window
#[test]
fn cancel_inside_delay_window_sticks() {
    let mut orch = orch();
    let target = orch.world_mut().spawn(&[("X", Value::Float(0.0))]);
    let tween = orch.create(
        target,
        TweenSpec::new(1.0).with_delay(0.5),
        vec![("X".into(), Value::Float(4.0))],
    );
    orch.play(tween).expect("play");
    orch.step(0.25);
    orch.cancel(tween).expect("cancel");

    // A played cycle auto-destroys on its terminal transition.
    assert!(!orch.contains(tween));
    assert_eq!(orch.host().pending_wakes(), 0);
    assert_eq!(orch.host().live_channels(), 0);

    orch.step(1.0);
    assert_eq!(orch.world().field(target, "X"), Some(Value::Float(0.0)));
}

/// it should keep an unplayed tween registered after cancel
#[test]
fn cancel_before_play_stays_registered() {
    let mut orch = orch();
    let target = orch.world_mut().spawn(&[("X", Value::Float(0.0))]);
    let tween = orch.create(
        target,
        TweenSpec::new(1.0),
        vec![("X".into(), Value::Float(4.0))],
    );
    orch.cancel(tween).expect("cancel");
    assert!(orch.contains(tween));
    assert_eq!(orch.state(tween), Some(TweenState::Cancelled));
    assert_eq!(orch.completed(tween), Some(TweenState::Cancelled));

    orch.destroy(tween);
    assert!(!orch.contains(tween));
    // Destroying twice is legal.
    orch.destroy(tween);
}

/// it should survive completion under persist and replay from live values
#[test]
fn persist_survives_completion_and_replays() {
    let mut orch = orch();
    let target = orch.world_mut().spawn(&[("X", Value::Float(0.0))]);
    let tween = orch.create(
        target,
        TweenSpec::new(1.0),
        vec![("X".into(), Value::Float(4.0))],
    );
    orch.persist(tween).expect("persist");
    orch.play(tween).expect("play");
    let state = orch.wait(tween).expect("wait");
    assert_eq!(state, TweenState::Completed);
    assert!(orch.contains(tween));
    // Cycle resources are gone even though the controller remains.
    assert_eq!(orch.channels(tween).map(|c| c.len()), Some(0));
    assert_eq!(orch.world().field(target, "X"), Some(Value::Float(4.0)));

    // Replay starts over from wherever the field is now.
    orch.world_mut().set_field(target, "X", Value::Float(2.0));
    orch.play(tween).expect("replay");
    assert_eq!(orch.state(tween), Some(TweenState::Playing));
    let state = orch.wait(tween).expect("wait");
    assert_eq!(state, TweenState::Completed);
    assert_eq!(orch.world().field(target, "X"), Some(Value::Float(4.0)));
    assert!(orch.contains(tween));
}

/// it should hand every listener the terminal state exactly once
#[test]
fn listeners_observe_the_terminal_state() {
    let mut orch = orch();
    let target = orch.world_mut().spawn(&[("X", Value::Float(0.0))]);
    let tween = orch.create(
        target,
        TweenSpec::new(0.5),
        vec![("X".into(), Value::Float(4.0))],
    );
    let seen: Rc<RefCell<Vec<TweenState>>> = Rc::new(RefCell::new(Vec::new()));
    let first = Rc::clone(&seen);
    let second = Rc::clone(&seen);
    orch.and_then(tween, move |state| first.borrow_mut().push(state))
        .expect("first hook");
    orch.and_then(tween, move |state| second.borrow_mut().push(state))
        .expect("second hook");

    orch.play(tween).expect("play");
    let state = orch.wait(tween).expect("wait");
    assert_eq!(state, TweenState::Completed);
    assert_eq!(
        *seen.borrow(),
        vec![TweenState::Completed, TweenState::Completed]
    );
    assert!(!orch.contains(tween));
}

/// it should return the current state from wait when nothing is running
#[test]
fn wait_returns_current_state_when_not_running() {
    let mut orch = orch();
    let target = orch.world_mut().spawn(&[("X", Value::Float(0.0))]);
    let tween = orch.create(
        target,
        TweenSpec::new(1.0),
        vec![("X".into(), Value::Float(4.0))],
    );
    assert_eq!(orch.wait(tween), Ok(TweenState::Initial));

    orch.destroy(tween);
    assert_eq!(orch.wait(tween), Err(TweenError::UnknownTween { id: tween }));
}

/// it should snapshot current values at creation and animate back to them
#[test]
fn create_from_current_returns_to_snapshot() {
    let mut orch = orch();
    let target = orch.world_mut().spawn(&[("X", Value::Float(3.0))]);
    orch.world_mut()
        .set_attribute(target, "Heat", Value::Float(0.5));

    let tween = orch
        .create_from_current(target, TweenSpec::new(1.0), &["X", "Heat"])
        .expect("create_from_current");
    assert_eq!(
        orch.fields(tween),
        Some(
            &[
                ("X".to_string(), Value::Float(3.0)),
                ("Heat".to_string(), Value::Float(0.5)),
            ][..]
        )
    );

    // The world drifts; playing pulls everything back to the snapshot.
    orch.world_mut().set_field(target, "X", Value::Float(10.0));
    orch.world_mut()
        .set_attribute(target, "Heat", Value::Float(0.9));
    orch.play(tween).expect("play");
    let state = orch.wait(tween).expect("wait");
    assert_eq!(state, TweenState::Completed);
    assert_eq!(orch.world().field(target, "X"), Some(Value::Float(3.0)));
    assert_eq!(
        orch.world().attribute(target, "Heat"),
        Some(Value::Float(0.5))
    );

    // Resolution failures surface at construction, before registration.
    let err = orch
        .create_from_current(target, TweenSpec::new(1.0), &["Nope"])
        .unwrap_err();
    assert_eq!(
        err,
        TweenError::UnresolvedField {
            field: "Nope".into()
        }
    );
    assert_eq!(orch.len(), 0);
}

/// it should report UnknownTween for every operation on a retired id
#[test]
fn reclaimed_ids_are_unknown() {
    let mut orch = orch();
    let target = orch.world_mut().spawn(&[("X", Value::Float(0.0))]);
    let tween = orch.create(
        target,
        TweenSpec::new(1.0),
        vec![("X".into(), Value::Float(4.0))],
    );
    orch.destroy(tween);

    let unknown = TweenError::UnknownTween { id: tween };
    assert_eq!(orch.play(tween), Err(unknown.clone()));
    assert_eq!(orch.pause(tween), Err(unknown.clone()));
    assert_eq!(orch.cancel(tween), Err(unknown.clone()));
    assert_eq!(orch.persist(tween), Err(unknown));
    assert_eq!(orch.state(tween), None);
}
