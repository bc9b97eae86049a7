//! Capability traits for the two host-side collaborators: the native
//! interpolation engine and the object model it animates. Embedders implement
//! these; the core never interpolates or stores properties itself.

use serde::{Deserialize, Serialize};

use crate::descriptor::TweenSpec;
use crate::error::TweenError;
use crate::ids::{ChannelId, HolderId, TargetId, TimerId};
use crate::playback::ChannelState;
use crate::value::Value;

/// Pseudo-field name under which a value holder's content is animated when
/// the holder itself is the animation target.
pub const HOLDER_FIELD: &str = "Value";

/// What a native animation drives: a world object's fields, or a synthetic
/// value holder.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnimRef {
    Target(TargetId),
    Holder(HolderId),
}

/// Events the host hands back from each `step` call, in the order they
/// occurred inside the tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum HostEvent {
    /// The engine wrote a new value into a holder.
    HolderChanged { holder: HolderId, value: Value },
    /// A channel reached a terminal state on its own. One-shot per play
    /// cycle; explicit cancel/destroy calls from this layer are not echoed.
    ChannelCompleted {
        channel: ChannelId,
        state: ChannelState,
    },
    /// A wake scheduled with `schedule_wake` came due.
    TimerFired { timer: TimerId },
}

/// The native interpolation engine. Implementations own channel storage,
/// timing, easing, and the clock; the core only issues requests and reacts to
/// the events `step` returns.
pub trait TweenHost {
    /// Register a native animation of `fields` on `target` shaped by `spec`.
    /// The channel starts in `ChannelState::Begin`; starting values are
    /// captured when it first advances. Holder targets animate their single
    /// value and expect exactly one entry, conventionally [`HOLDER_FIELD`].
    fn animate(
        &mut self,
        target: AnimRef,
        spec: &TweenSpec,
        fields: Vec<(String, Value)>,
    ) -> Result<ChannelId, TweenError>;

    /// Start or resume a channel. Resuming continues from the elapsed
    /// position.
    fn play(&mut self, channel: ChannelId);

    /// Suspend a channel, preserving progress.
    fn pause(&mut self, channel: ChannelId);

    /// Stop a channel without completing it. No completion event follows.
    fn cancel(&mut self, channel: ChannelId);

    /// Release a channel's storage. Unknown ids are a no-op.
    fn destroy(&mut self, channel: ChannelId);

    /// The channel's native playback state, None once destroyed.
    fn channel_state(&self, channel: ChannelId) -> Option<ChannelState>;

    /// Schedule a cancellable wake `after` seconds from now, delivered as
    /// `TimerFired` from a later `step`.
    fn schedule_wake(&mut self, after: f32) -> TimerId;

    /// Cancel a pending wake; fired or unknown timers are a no-op.
    fn cancel_wake(&mut self, timer: TimerId);

    /// Advance the clock by `dt` seconds, writing animated values through
    /// `world` and returning the events produced. This is the single
    /// cooperative scheduling point of the whole model.
    fn step(&mut self, world: &mut dyn TargetWorld, dt: f32) -> Vec<HostEvent>;
}

/// The host object model: targets with fields, dynamic attributes, and an
/// optional compound pose; plus synthetic value holders. Composite getters
/// return None for targets that are not compound objects.
pub trait TargetWorld {
    fn field(&self, target: TargetId, name: &str) -> Option<Value>;
    fn set_field(&mut self, target: TargetId, name: &str, value: Value);

    fn attribute(&self, target: TargetId, name: &str) -> Option<Value>;
    fn set_attribute(&mut self, target: TargetId, name: &str, value: Value);

    /// Composed pose of a compound target.
    fn pivot(&self, target: TargetId) -> Option<Value>;
    fn pivot_to(&mut self, target: TargetId, pose: Value);

    /// Uniform scale of a compound target.
    fn uniform_scale(&self, target: TargetId) -> Option<Value>;
    fn scale_to(&mut self, target: TargetId, scale: Value);

    /// Allocate a holder seeded with `seed`; the holder's kind is the seed's.
    fn create_holder(&mut self, seed: Value) -> HolderId;
    fn holder_value(&self, holder: HolderId) -> Option<Value>;
    fn set_holder_value(&mut self, holder: HolderId, value: Value);
    fn destroy_holder(&mut self, holder: HolderId);
}
