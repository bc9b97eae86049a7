//! proptween Core (host-agnostic)
//!
//! Proxy-channel tween coordination above a host interpolation engine. The
//! host can only animate the direct fields it recognizes; this crate plans
//! which requested fields go to it natively and which need a synthetic
//! shadow value relayed back onto the real field, then runs the playback
//! state machine (delayed start, pause/resume, cancellation, completion
//! broadcast) and tears every synthetic resource down deterministically.
//!
//! Interpolation math stays on the host side of the [`host::TweenHost`] /
//! [`host::TargetWorld`] boundary; a deterministic reference host lives in
//! the `proptween-test-fixtures` crate.

pub mod accessor;
pub mod controller;
pub mod descriptor;
pub mod error;
pub mod host;
pub mod ids;
pub mod orchestrator;
mod planner;
pub mod playback;
mod shadow;
pub mod signal;
pub mod value;

// Re-exports for consumers (embedders)
pub use accessor::{CompositeKind, FieldBinding, PIVOT_FIELD, SCALE_FIELD};
pub use controller::{TweenController, TweenMode, UpdateHook};
pub use descriptor::{Easing, TweenSpec};
pub use error::TweenError;
pub use host::{AnimRef, HostEvent, TargetWorld, TweenHost, HOLDER_FIELD};
pub use ids::{ChannelId, HolderId, IdAllocator, TargetId, TimerId, TweenId};
pub use orchestrator::Orchestrator;
pub use playback::{ChannelState, TweenState};
pub use signal::CompletionSignal;
pub use value::{Value, ValueKind};

/// Result alias for operations in this crate
pub type Result<T> = core::result::Result<T, TweenError>;
