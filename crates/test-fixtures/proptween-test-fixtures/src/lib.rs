//! Deterministic reference host for exercising the tween layer: a scriptable
//! object world plus a fixed-step interpolation engine with exact landings
//! and leak accounting on channels, holders, and wakes.

pub mod host;
pub mod interp;
pub mod world;

pub use host::StubHost;
pub use world::StubWorld;
