//! The tween controller: owns the planned channels for one logical animation,
//! runs the playback state machine, and reacts to host events. Controllers
//! live in the orchestrator's registry and are driven through it.

use serde::{Deserialize, Serialize};

use crate::descriptor::TweenSpec;
use crate::error::TweenError;
use crate::host::{AnimRef, HostEvent, TargetWorld, TweenHost, HOLDER_FIELD};
use crate::ids::{ChannelId, HolderId, TimerId};
use crate::planner;
use crate::playback::{ChannelState, TweenState};
use crate::shadow::ShadowChannel;
use crate::signal::CompletionSignal;
use crate::value::Value;

/// How requested values are interpreted.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TweenMode {
    /// Field animates to the requested value.
    Absolute,
    /// Field accumulates the requested offset on top of its live value.
    Delta,
    /// The target is a throwaway holder backing a custom interpolation.
    Synthetic,
}

/// Callback invoked with each interpolated value of a `connect` tween.
pub type UpdateHook = Box<dyn FnMut(&Value)>;

pub struct TweenController {
    target: AnimRef,
    spec: TweenSpec,
    field_map: Vec<(String, Value)>,
    mode: TweenMode,
    state: TweenState,
    auto_destroy: bool,
    channels: Vec<ChannelId>,
    shadows: Vec<ShadowChannel>,
    delay_timer: Option<TimerId>,
    completion_armed: bool,
    synthetic: Option<HolderId>,
    update_hook: Option<UpdateHook>,
    signal: CompletionSignal,
}

impl TweenController {
    pub(crate) fn new(
        target: AnimRef,
        spec: TweenSpec,
        field_map: Vec<(String, Value)>,
        mode: TweenMode,
    ) -> Self {
        Self {
            target,
            spec,
            field_map,
            mode,
            state: TweenState::Initial,
            auto_destroy: true,
            channels: Vec::new(),
            shadows: Vec::new(),
            delay_timer: None,
            completion_armed: false,
            synthetic: None,
            update_hook: None,
            signal: CompletionSignal::new(),
        }
    }

    /// A `connect`-style controller: owns the throwaway holder it animates
    /// and forwards every holder change to `hook`.
    pub(crate) fn new_synthetic(
        holder: HolderId,
        spec: TweenSpec,
        last: Value,
        hook: UpdateHook,
    ) -> Self {
        let mut controller = Self::new(
            AnimRef::Holder(holder),
            spec,
            vec![(HOLDER_FIELD.to_string(), last)],
            TweenMode::Synthetic,
        );
        controller.synthetic = Some(holder);
        controller.update_hook = Some(hook);
        controller
    }

    // ---- read surface -----------------------------------------------------

    #[inline]
    pub fn state(&self) -> TweenState {
        self.state
    }

    #[inline]
    pub fn mode(&self) -> TweenMode {
        self.mode
    }

    #[inline]
    pub fn target(&self) -> AnimRef {
        self.target
    }

    #[inline]
    pub fn descriptor(&self) -> &TweenSpec {
        &self.spec
    }

    #[inline]
    pub fn fields(&self) -> &[(String, Value)] {
        &self.field_map
    }

    #[inline]
    pub fn auto_destroy(&self) -> bool {
        self.auto_destroy
    }

    /// The terminal state the current cycle already fired with, if any.
    #[inline]
    pub fn completed(&self) -> Option<TweenState> {
        self.signal.fired()
    }

    /// Native handles for the current cycle; the primary channel sits at 0.
    #[inline]
    pub fn channels(&self) -> &[ChannelId] {
        &self.channels
    }

    #[inline]
    pub fn primary(&self) -> Option<ChannelId> {
        self.channels.first().copied()
    }

    #[inline]
    pub fn shadow_count(&self) -> usize {
        self.shadows.len()
    }

    pub(crate) fn signal_mut(&mut self) -> &mut CompletionSignal {
        &mut self.signal
    }

    // ---- state machine ----------------------------------------------------

    /// Start, or resume from pause. No-op while playing or delayed. A fresh
    /// cycle lazily builds its channels; build errors propagate with the
    /// state unchanged.
    pub(crate) fn play(
        &mut self,
        world: &mut dyn TargetWorld,
        host: &mut dyn TweenHost,
    ) -> Result<(), TweenError> {
        match self.state {
            TweenState::Playing | TweenState::Delayed => return Ok(()),
            TweenState::Paused => {
                for channel in &self.channels {
                    host.play(*channel);
                }
                self.state = TweenState::Playing;
                return Ok(());
            }
            TweenState::Initial | TweenState::Completed | TweenState::Cancelled => {}
        }

        if self.channels.is_empty() {
            let set = planner::build(
                world,
                host,
                self.target,
                self.mode,
                &self.spec,
                &self.field_map,
            )?;
            self.channels = set.channels;
            self.shadows = set.shadows;
        }
        self.signal.begin_cycle();
        self.completion_armed = true;
        for channel in &self.channels {
            host.play(*channel);
        }
        if self.spec.delay > 0.0 {
            self.state = TweenState::Delayed;
            self.delay_timer = Some(host.schedule_wake(self.spec.delay));
        } else {
            self.state = TweenState::Playing;
        }
        Ok(())
    }

    /// Suspend playback. No-op unless playing; progress is preserved by the
    /// host's own pause semantics.
    pub(crate) fn pause(&mut self, host: &mut dyn TweenHost) {
        if !self.state.can_pause() {
            return;
        }
        for channel in &self.channels {
            host.pause(*channel);
        }
        self.state = TweenState::Paused;
    }

    /// Unconditionally release the cycle's resources and fire the signal with
    /// Cancelled. Legal in any state, including before the first play.
    pub(crate) fn cancel(&mut self, world: &mut dyn TargetWorld, host: &mut dyn TweenHost) {
        self.cleanup_cycle(world, host);
        self.state = TweenState::Cancelled;
        self.signal.fire(TweenState::Cancelled);
    }

    /// Subscribe `hook` to the completion signal.
    pub(crate) fn and_then<F: FnMut(TweenState) + 'static>(&mut self, hook: F) {
        self.signal.subscribe(hook);
    }

    /// Keep the controller registered after its cycle ends. Must run before
    /// completion; afterwards the automatic destroy has already won.
    pub(crate) fn persist(&mut self) {
        self.auto_destroy = false;
    }

    /// Full teardown: cycle resources, the synthetic holder if this is a
    /// `connect` tween, every signal subscriber, and the field map.
    pub(crate) fn destroy(&mut self, world: &mut dyn TargetWorld, host: &mut dyn TweenHost) {
        self.cleanup_cycle(world, host);
        if let Some(holder) = self.synthetic.take() {
            world.destroy_holder(holder);
        }
        self.update_hook = None;
        self.signal.clear();
        self.field_map.clear();
        self.completion_armed = false;
    }

    /// React to one host event. Events for other controllers' resources fall
    /// through untouched.
    pub(crate) fn absorb(
        &mut self,
        world: &mut dyn TargetWorld,
        host: &mut dyn TweenHost,
        event: &HostEvent,
    ) {
        match event {
            HostEvent::HolderChanged { holder, value } => {
                if self.synthetic == Some(*holder) {
                    if let Some(hook) = self.update_hook.as_mut() {
                        hook(value);
                    }
                    return;
                }
                if let Some(shadow) = self.shadows.iter_mut().find(|s| s.holder == *holder) {
                    shadow.relay(world, value);
                }
            }
            HostEvent::ChannelCompleted { channel, state } => {
                if self.primary() == Some(*channel) {
                    self.finish(world, host, *state);
                }
            }
            HostEvent::TimerFired { timer } => {
                if self.delay_timer == Some(*timer) {
                    self.delay_timer = None;
                    // Re-check at wake: a cancel inside the delay window must
                    // keep its terminal state.
                    if self.state == TweenState::Delayed {
                        self.state = TweenState::Playing;
                    }
                }
            }
        }
    }

    /// One-shot completion hook: true exactly once per played cycle when the
    /// controller should be fully destroyed.
    pub(crate) fn take_completion_hook(&mut self) -> bool {
        let armed = self.completion_armed;
        self.completion_armed = false;
        armed && self.auto_destroy
    }

    fn finish(
        &mut self,
        world: &mut dyn TargetWorld,
        host: &mut dyn TweenHost,
        terminal: ChannelState,
    ) {
        self.cleanup_cycle(world, host);
        // State mutates before any signal listener observes the terminal.
        self.state = terminal.as_tween_state();
        self.signal.fire(self.state);
    }

    fn cleanup_cycle(&mut self, world: &mut dyn TargetWorld, host: &mut dyn TweenHost) {
        if let Some(timer) = self.delay_timer.take() {
            host.cancel_wake(timer);
        }
        for channel in self.channels.drain(..) {
            host.cancel(channel);
            host.destroy(channel);
        }
        for shadow in self.shadows.drain(..) {
            world.destroy_holder(shadow.holder);
        }
    }
}
