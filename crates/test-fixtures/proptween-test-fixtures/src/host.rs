//! Deterministic fixed-step interpolation engine. Time advances only through
//! `step`; values move after a channel's native delay window; the final tick
//! writes end values exactly, never through the interpolator. Cancels
//! requested through the trait are not echoed back as completion events.
//!
//! Within one tick, events are ordered: due wakes first, then holder value
//! changes in channel order, then completions.

use hashbrown::HashMap;

use proptween_core::{
    AnimRef, ChannelId, ChannelState, HostEvent, IdAllocator, TargetWorld, TimerId, TweenError,
    TweenHost, TweenSpec, Value,
};

use crate::interp::{ease, lerp_value};

#[derive(Debug)]
struct StubChannel {
    target: AnimRef,
    spec: TweenSpec,
    fields: Vec<(String, Value)>,
    /// Captured when the channel first advances past its delay window.
    starts: Option<Vec<Value>>,
    elapsed: f32,
    state: ChannelState,
    completion_emitted: bool,
}

/// Reference `TweenHost` with channel and wake leak accounting.
#[derive(Default)]
pub struct StubHost {
    channels: HashMap<ChannelId, StubChannel>,
    timers: HashMap<TimerId, f32>,
    ids: IdAllocator,
    clock: f32,
    channels_created: usize,
    channels_destroyed: usize,
}

impl StubHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Channels created and not yet destroyed.
    pub fn live_channels(&self) -> usize {
        self.channels.len()
    }

    pub fn channels_created(&self) -> usize {
        self.channels_created
    }

    pub fn channels_destroyed(&self) -> usize {
        self.channels_destroyed
    }

    /// Wakes scheduled and not yet fired or cancelled.
    pub fn pending_wakes(&self) -> usize {
        self.timers.len()
    }

    /// Seconds advanced through `step` so far.
    pub fn clock(&self) -> f32 {
        self.clock
    }
}

impl TweenHost for StubHost {
    fn animate(
        &mut self,
        target: AnimRef,
        spec: &TweenSpec,
        fields: Vec<(String, Value)>,
    ) -> Result<ChannelId, TweenError> {
        if fields.is_empty() {
            return Err(TweenError::host("animate requires at least one field"));
        }
        let id = self.ids.alloc_channel();
        self.channels.insert(
            id,
            StubChannel {
                target,
                spec: spec.clone(),
                fields,
                starts: None,
                elapsed: 0.0,
                state: ChannelState::Begin,
                completion_emitted: false,
            },
        );
        self.channels_created += 1;
        Ok(id)
    }

    fn play(&mut self, channel: ChannelId) {
        if let Some(ch) = self.channels.get_mut(&channel) {
            if matches!(ch.state, ChannelState::Begin | ChannelState::Paused) {
                ch.state = if ch.elapsed < ch.spec.delay {
                    ChannelState::Delayed
                } else {
                    ChannelState::Playing
                };
            }
        }
    }

    fn pause(&mut self, channel: ChannelId) {
        if let Some(ch) = self.channels.get_mut(&channel) {
            if matches!(ch.state, ChannelState::Playing | ChannelState::Delayed) {
                ch.state = ChannelState::Paused;
            }
        }
    }

    fn cancel(&mut self, channel: ChannelId) {
        if let Some(ch) = self.channels.get_mut(&channel) {
            if !ch.state.is_terminal() {
                ch.state = ChannelState::Cancelled;
            }
            // Requested cancels are never echoed as completion events.
            ch.completion_emitted = true;
        }
    }

    fn destroy(&mut self, channel: ChannelId) {
        if self.channels.remove(&channel).is_some() {
            self.channels_destroyed += 1;
        }
    }

    fn channel_state(&self, channel: ChannelId) -> Option<ChannelState> {
        self.channels.get(&channel).map(|ch| ch.state)
    }

    fn schedule_wake(&mut self, after: f32) -> TimerId {
        let id = self.ids.alloc_timer();
        self.timers.insert(id, self.clock + after);
        id
    }

    fn cancel_wake(&mut self, timer: TimerId) {
        self.timers.remove(&timer);
    }

    fn step(&mut self, world: &mut dyn TargetWorld, dt: f32) -> Vec<HostEvent> {
        self.clock += dt;
        let mut events: Vec<HostEvent> = Vec::new();

        let mut due: Vec<TimerId> = self
            .timers
            .iter()
            .filter(|(_, at)| self.clock >= **at)
            .map(|(timer, _)| *timer)
            .collect();
        due.sort_by_key(|timer| timer.0);
        for timer in due {
            self.timers.remove(&timer);
            events.push(HostEvent::TimerFired { timer });
        }

        let mut order: Vec<ChannelId> = self.channels.keys().copied().collect();
        order.sort_by_key(|channel| channel.0);
        let mut completions: Vec<HostEvent> = Vec::new();

        for id in order {
            let ch = match self.channels.get_mut(&id) {
                Some(ch) => ch,
                None => continue,
            };
            if !matches!(ch.state, ChannelState::Playing | ChannelState::Delayed) {
                continue;
            }
            ch.elapsed += dt;
            let active = ch.elapsed - ch.spec.delay;
            if active < 0.0 {
                continue;
            }
            if ch.state == ChannelState::Delayed {
                ch.state = ChannelState::Playing;
            }
            if ch.starts.is_none() {
                let captured: Vec<Value> = ch
                    .fields
                    .iter()
                    .map(|(name, end)| match ch.target {
                        AnimRef::Target(target) => {
                            world.field(target, name).unwrap_or_else(|| end.clone())
                        }
                        AnimRef::Holder(holder) => {
                            world.holder_value(holder).unwrap_or_else(|| end.clone())
                        }
                    })
                    .collect();
                ch.starts = Some(captured);
            }
            let starts = match ch.starts.clone() {
                Some(starts) => starts,
                None => continue,
            };

            let passes = ch.spec.repeat_count.saturating_add(1);
            let pass_len = ch.spec.duration;
            let total = pass_len * passes as f32;
            if pass_len <= 0.0 || active >= total {
                // A reversing run with an even pass count rests back at its
                // starting values.
                let rests_at_start = ch.spec.reverses && passes % 2 == 0;
                for (idx, (name, end)) in ch.fields.iter().enumerate() {
                    let final_value = if rests_at_start {
                        starts[idx].clone()
                    } else {
                        end.clone()
                    };
                    match ch.target {
                        AnimRef::Target(target) => world.set_field(target, name, final_value),
                        AnimRef::Holder(holder) => {
                            world.set_holder_value(holder, final_value.clone());
                            events.push(HostEvent::HolderChanged {
                                holder,
                                value: final_value,
                            });
                        }
                    }
                }
                ch.state = ChannelState::Completed;
                if !ch.completion_emitted {
                    ch.completion_emitted = true;
                    completions.push(HostEvent::ChannelCompleted {
                        channel: id,
                        state: ChannelState::Completed,
                    });
                }
            } else {
                let pass = (active / pass_len) as u32;
                let mut u = (active - pass as f32 * pass_len) / pass_len;
                if ch.spec.reverses && pass % 2 == 1 {
                    u = 1.0 - u;
                }
                let eased = ease(ch.spec.easing, u);
                for (idx, (name, end)) in ch.fields.iter().enumerate() {
                    let value = lerp_value(&starts[idx], end, eased);
                    match ch.target {
                        AnimRef::Target(target) => world.set_field(target, name, value),
                        AnimRef::Holder(holder) => {
                            world.set_holder_value(holder, value.clone());
                            events.push(HostEvent::HolderChanged { holder, value });
                        }
                    }
                }
            }
        }

        events.extend(completions);
        events
    }
}
