//! Identifiers and simple allocators for core entities.

use serde::{Deserialize, Serialize};

/// A registered tween controller.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct TweenId(pub u32);

/// A native animation handle issued by the host engine.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ChannelId(pub u32);

/// A synthetic value holder living in the host object model.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct HolderId(pub u32);

/// An animatable object in the host object model.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct TargetId(pub u32);

/// A cancellable wake scheduled on the host clock.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct TimerId(pub u32);

/// Monotonic allocator for the ids this crate hands out itself.
/// Host-issued ids (channels, holders, timers) are allocated host-side;
/// stub hosts reuse this allocator for them.
#[derive(Default, Debug)]
pub struct IdAllocator {
    next_tween: u32,
    next_channel: u32,
    next_holder: u32,
    next_target: u32,
    next_timer: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc_tween(&mut self) -> TweenId {
        let id = TweenId(self.next_tween);
        self.next_tween = self.next_tween.wrapping_add(1);
        id
    }

    #[inline]
    pub fn alloc_channel(&mut self) -> ChannelId {
        let id = ChannelId(self.next_channel);
        self.next_channel = self.next_channel.wrapping_add(1);
        id
    }

    #[inline]
    pub fn alloc_holder(&mut self) -> HolderId {
        let id = HolderId(self.next_holder);
        self.next_holder = self.next_holder.wrapping_add(1);
        id
    }

    #[inline]
    pub fn alloc_target(&mut self) -> TargetId {
        let id = TargetId(self.next_target);
        self.next_target = self.next_target.wrapping_add(1);
        id
    }

    #[inline]
    pub fn alloc_timer(&mut self) -> TimerId {
        let id = TimerId(self.next_timer);
        self.next_timer = self.next_timer.wrapping_add(1);
        id
    }

    #[inline]
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
