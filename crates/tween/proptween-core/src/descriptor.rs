//! Duration descriptors: everything the host engine needs to shape a native
//! animation. The core passes these through unmodified; the only field it
//! reads itself is `delay`, for the delayed-start watcher.

use serde::{Deserialize, Serialize};

use crate::error::TweenError;

/// Timing curve requested from the host engine. Semantics (and the math)
/// belong to the host; this is just the label carried in the descriptor.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Easing {
    #[default]
    Linear,
    QuadIn,
    QuadOut,
    QuadInOut,
    SineInOut,
}

/// Host-facing animation descriptor: duration, easing, start delay, repeat
/// policy. Times are in seconds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TweenSpec {
    pub duration: f32,
    pub easing: Easing,
    pub delay: f32,
    /// Extra passes after the first; 0 plays once.
    pub repeat_count: u32,
    /// Odd passes run end-to-start when set.
    pub reverses: bool,
}

impl Default for TweenSpec {
    fn default() -> Self {
        Self {
            duration: 1.0,
            easing: Easing::Linear,
            delay: 0.0,
            repeat_count: 0,
            reverses: false,
        }
    }
}

impl TweenSpec {
    pub fn new(duration: f32) -> Self {
        Self {
            duration,
            ..Self::default()
        }
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn with_delay(mut self, delay: f32) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_repeat(mut self, repeat_count: u32, reverses: bool) -> Self {
        self.repeat_count = repeat_count;
        self.reverses = reverses;
        self
    }

    /// Parse a descriptor from a JSON payload; absent fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, TweenError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_fields() {
        let spec = TweenSpec::from_json(r#"{"duration": 2.5}"#).expect("parse");
        assert_eq!(spec.duration, 2.5);
        assert_eq!(spec.easing, Easing::Linear);
        assert_eq!(spec.delay, 0.0);
        assert_eq!(spec.repeat_count, 0);
        assert!(!spec.reverses);
    }

    #[test]
    fn builder_round_trips_through_json() {
        let spec = TweenSpec::new(0.75)
            .with_easing(Easing::QuadInOut)
            .with_delay(0.2)
            .with_repeat(2, true);
        let json = serde_json::to_string(&spec).expect("serialize");
        let back = TweenSpec::from_json(&json).expect("parse");
        assert_eq!(back, spec);
    }

    #[test]
    fn malformed_json_surfaces_as_error() {
        let err = TweenSpec::from_json("{not json").unwrap_err();
        assert!(matches!(err, TweenError::Serialization { .. }));
    }
}
