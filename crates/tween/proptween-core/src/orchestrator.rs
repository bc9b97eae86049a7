//! The orchestrator owns the host capabilities and every live controller,
//! routes host events, and exposes the controller operations keyed by
//! [`TweenId`]. Embedders drive it with `step(dt)` from their own loop, or
//! let `wait` pump it until a tween settles.

use std::cell::Cell;
use std::rc::Rc;

use hashbrown::HashMap;
use log::debug;

use crate::accessor::FieldBinding;
use crate::controller::{TweenController, TweenMode};
use crate::descriptor::TweenSpec;
use crate::error::TweenError;
use crate::host::{AnimRef, TargetWorld, TweenHost};
use crate::ids::{ChannelId, IdAllocator, TargetId, TweenId};
use crate::playback::{ChannelState, TweenState};
use crate::value::Value;

const DEFAULT_WAIT_TICK: f32 = 1.0 / 60.0;

pub struct Orchestrator<H: TweenHost, W: TargetWorld> {
    host: H,
    world: W,
    tweens: HashMap<TweenId, TweenController>,
    ids: IdAllocator,
    wait_tick: f32,
}

impl<H: TweenHost, W: TargetWorld> Orchestrator<H, W> {
    pub fn new(host: H, world: W) -> Self {
        Self {
            host,
            world,
            tweens: HashMap::new(),
            ids: IdAllocator::new(),
            wait_tick: DEFAULT_WAIT_TICK,
        }
    }

    /// Granularity `wait` pumps the host clock with.
    pub fn with_wait_tick(mut self, wait_tick: f32) -> Self {
        self.wait_tick = wait_tick;
        self
    }

    // ---- constructors -----------------------------------------------------

    /// Animate `field_map`'s fields on `target` to absolute values.
    pub fn create(
        &mut self,
        target: TargetId,
        spec: TweenSpec,
        field_map: Vec<(String, Value)>,
    ) -> TweenId {
        self.register(TweenController::new(
            AnimRef::Target(target),
            spec,
            field_map,
            TweenMode::Absolute,
        ))
    }

    /// Animate `offset_map`'s fields by relative offsets that stack with
    /// concurrent tweens and external writes.
    pub fn create_by_delta(
        &mut self,
        target: TargetId,
        spec: TweenSpec,
        offset_map: Vec<(String, Value)>,
    ) -> TweenId {
        self.register(TweenController::new(
            AnimRef::Target(target),
            spec,
            offset_map,
            TweenMode::Delta,
        ))
    }

    /// Drive a custom interpolation from `first` to `last`, invoking `hook`
    /// with every intermediate value. The kinds of `first` and `last` must
    /// match; nothing is allocated when they do not.
    pub fn connect<F>(
        &mut self,
        first: Value,
        last: Value,
        spec: TweenSpec,
        hook: F,
    ) -> Result<TweenId, TweenError>
    where
        F: FnMut(&Value) + 'static,
    {
        if first.kind() != last.kind() {
            return Err(TweenError::TypeMismatch {
                expected: first.kind(),
                actual: last.kind(),
            });
        }
        let holder = self.world.create_holder(first);
        Ok(self.register(TweenController::new_synthetic(
            holder,
            spec,
            last,
            Box::new(hook),
        )))
    }

    /// Snapshot the named fields' current values and animate back to the
    /// snapshot on play. Resolution failures surface here, before anything
    /// registers.
    pub fn create_from_current(
        &mut self,
        target: TargetId,
        spec: TweenSpec,
        field_names: &[&str],
    ) -> Result<TweenId, TweenError> {
        let mut field_map = Vec::with_capacity(field_names.len());
        for name in field_names {
            let binding = FieldBinding::resolve(&self.world, target, name)?;
            let current = binding
                .read(&self.world)
                .ok_or_else(|| TweenError::UnresolvedField {
                    field: (*name).to_string(),
                })?;
            field_map.push(((*name).to_string(), current));
        }
        Ok(self.register(TweenController::new(
            AnimRef::Target(target),
            spec,
            field_map,
            TweenMode::Absolute,
        )))
    }

    fn register(&mut self, controller: TweenController) -> TweenId {
        let id = self.ids.alloc_tween();
        debug!(
            "registered tween {:?}: mode {:?}, {} field(s)",
            id,
            controller.mode(),
            controller.fields().len()
        );
        self.tweens.insert(id, controller);
        id
    }

    // ---- operations -------------------------------------------------------

    /// Start or resume the tween; builds channels lazily for a fresh cycle.
    pub fn play(&mut self, id: TweenId) -> Result<(), TweenError> {
        let Self {
            host,
            world,
            tweens,
            ..
        } = self;
        let tween = tweens
            .get_mut(&id)
            .ok_or(TweenError::UnknownTween { id })?;
        tween.play(&mut *world, &mut *host)
    }

    /// Suspend the tween; a no-op unless it is playing.
    pub fn pause(&mut self, id: TweenId) -> Result<(), TweenError> {
        let Self { host, tweens, .. } = self;
        let tween = tweens
            .get_mut(&id)
            .ok_or(TweenError::UnknownTween { id })?;
        tween.pause(&mut *host);
        Ok(())
    }

    /// Cancel the tween, releasing its cycle resources. Auto-destroy applies
    /// if the cycle had been played.
    pub fn cancel(&mut self, id: TweenId) -> Result<(), TweenError> {
        {
            let Self {
                host,
                world,
                tweens,
                ..
            } = self;
            let tween = tweens
                .get_mut(&id)
                .ok_or(TweenError::UnknownTween { id })?;
            tween.cancel(&mut *world, &mut *host);
        }
        self.reap(id);
        Ok(())
    }

    /// Subscribe `hook` to the tween's completion signal; it fires at most
    /// once per cycle with the terminal state.
    pub fn and_then<F>(&mut self, id: TweenId, hook: F) -> Result<(), TweenError>
    where
        F: FnMut(TweenState) + 'static,
    {
        let tween = self
            .tweens
            .get_mut(&id)
            .ok_or(TweenError::UnknownTween { id })?;
        tween.and_then(hook);
        Ok(())
    }

    /// Disable auto-destroy so the tween survives completion and replays.
    pub fn persist(&mut self, id: TweenId) -> Result<(), TweenError> {
        let tween = self
            .tweens
            .get_mut(&id)
            .ok_or(TweenError::UnknownTween { id })?;
        tween.persist();
        Ok(())
    }

    /// Tear the tween down completely and retire its id. Unknown ids are a
    /// no-op: destroying twice is legal.
    pub fn destroy(&mut self, id: TweenId) {
        let Self {
            host,
            world,
            tweens,
            ..
        } = self;
        if let Some(mut tween) = tweens.remove(&id) {
            tween.destroy(&mut *world, &mut *host);
            debug!("destroyed tween {id:?}");
        }
    }

    /// Pump the host until the tween's current cycle fires its completion
    /// signal; returns the terminal state. Returns immediately if this cycle
    /// already fired. A tween that is not running cannot complete while the
    /// pump spins (nothing else gets scheduled in this model), so waiting on
    /// an initial or paused tween returns its current state instead of
    /// hanging.
    pub fn wait(&mut self, id: TweenId) -> Result<TweenState, TweenError> {
        let tween = self
            .tweens
            .get_mut(&id)
            .ok_or(TweenError::UnknownTween { id })?;
        if let Some(state) = tween.completed() {
            return Ok(state);
        }
        if !matches!(tween.state(), TweenState::Playing | TweenState::Delayed) {
            return Ok(tween.state());
        }
        let fired = Rc::new(Cell::new(None));
        let probe = Rc::clone(&fired);
        tween
            .signal_mut()
            .subscribe_once(move |state| probe.set(Some(state)));
        loop {
            self.step(self.wait_tick);
            if let Some(state) = fired.get() {
                return Ok(state);
            }
        }
    }

    /// Advance the host clock and route the resulting events to every
    /// controller; embedders call this once per frame.
    pub fn step(&mut self, dt: f32) {
        let events = self.host.step(&mut self.world, dt);
        if events.is_empty() {
            return;
        }
        let mut newly_terminal: Vec<TweenId> = Vec::new();
        {
            let Self {
                host,
                world,
                tweens,
                ..
            } = self;
            for event in &events {
                for (id, tween) in tweens.iter_mut() {
                    let was_terminal = tween.state().is_terminal();
                    tween.absorb(&mut *world, &mut *host, event);
                    if !was_terminal && tween.state().is_terminal() {
                        newly_terminal.push(*id);
                    }
                }
            }
        }
        for id in newly_terminal {
            self.reap(id);
        }
    }

    /// Apply the one-shot completion hook after a terminal transition.
    fn reap(&mut self, id: TweenId) {
        let should_destroy = match self.tweens.get_mut(&id) {
            Some(tween) if tween.state().is_terminal() => tween.take_completion_hook(),
            _ => false,
        };
        if should_destroy {
            self.destroy(id);
        }
    }

    // ---- read surface -----------------------------------------------------

    pub fn contains(&self, id: TweenId) -> bool {
        self.tweens.contains_key(&id)
    }

    pub fn state(&self, id: TweenId) -> Option<TweenState> {
        self.tweens.get(&id).map(|t| t.state())
    }

    pub fn target(&self, id: TweenId) -> Option<AnimRef> {
        self.tweens.get(&id).map(|t| t.target())
    }

    pub fn descriptor(&self, id: TweenId) -> Option<&TweenSpec> {
        self.tweens.get(&id).map(|t| t.descriptor())
    }

    pub fn fields(&self, id: TweenId) -> Option<&[(String, Value)]> {
        self.tweens.get(&id).map(|t| t.fields())
    }

    /// The terminal state the tween's current cycle fired with, if it has.
    pub fn completed(&self, id: TweenId) -> Option<TweenState> {
        self.tweens.get(&id).and_then(|t| t.completed())
    }

    pub fn channels(&self, id: TweenId) -> Option<&[ChannelId]> {
        self.tweens.get(&id).map(|t| t.channels())
    }

    pub fn shadow_count(&self, id: TweenId) -> Option<usize> {
        self.tweens.get(&id).map(|t| t.shadow_count())
    }

    /// Native state of the tween's primary channel, once built.
    pub fn primary_channel_state(&self, id: TweenId) -> Option<ChannelState> {
        let tween = self.tweens.get(&id)?;
        self.host.channel_state(tween.primary()?)
    }

    pub fn len(&self) -> usize {
        self.tweens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tweens.is_empty()
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn world(&self) -> &W {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut W {
        &mut self.world
    }
}
