use serde::{Deserialize, Serialize};

/// Playback state of a tween controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TweenState {
    /// Created or rebuilt, nothing playing yet
    Initial,
    /// Started, waiting out the descriptor's start delay
    Delayed,
    /// Channels are running
    Playing,
    /// Channels are suspended, progress preserved
    Paused,
    /// Cycle finished on its own
    Completed,
    /// Cycle was cancelled
    Cancelled,
}

impl TweenState {
    /// Get the name of this state
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Initial => "initial",
            Self::Delayed => "delayed",
            Self::Playing => "playing",
            Self::Paused => "paused",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Check if channels exist for the current cycle
    #[inline]
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Delayed | Self::Playing | Self::Paused)
    }

    /// Check if the current cycle has ended
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Check if a play call would start a fresh cycle
    #[inline]
    pub fn starts_fresh_cycle(&self) -> bool {
        matches!(self, Self::Initial | Self::Completed | Self::Cancelled)
    }

    /// Check if the controller can be paused
    #[inline]
    pub fn can_pause(&self) -> bool {
        matches!(self, Self::Playing)
    }
}

impl From<&str> for TweenState {
    fn from(s: &str) -> Self {
        match s {
            "initial" => Self::Initial,
            "delayed" => Self::Delayed,
            "playing" => Self::Playing,
            "paused" => Self::Paused,
            "completed" => Self::Completed,
            "cancelled" => Self::Cancelled,
            _ => Self::Initial,
        }
    }
}

/// Native playback state reported by a host animation handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChannelState {
    /// Created, never played
    Begin,
    /// Waiting out the start delay
    Delayed,
    /// Running
    Playing,
    /// Suspended
    Paused,
    /// Finished on its own
    Completed,
    /// Cancelled by the caller or the host
    Cancelled,
}

impl ChannelState {
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Begin => "begin",
            Self::Delayed => "delayed",
            Self::Playing => "playing",
            Self::Paused => "paused",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// The controller state mirroring this native state.
    #[inline]
    pub fn as_tween_state(&self) -> TweenState {
        match self {
            Self::Begin => TweenState::Initial,
            Self::Delayed => TweenState::Delayed,
            Self::Playing => TweenState::Playing,
            Self::Paused => TweenState::Paused,
            Self::Completed => TweenState::Completed,
            Self::Cancelled => TweenState::Cancelled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predicates_partition_the_states() {
        for state in [
            TweenState::Initial,
            TweenState::Delayed,
            TweenState::Playing,
            TweenState::Paused,
            TweenState::Completed,
            TweenState::Cancelled,
        ] {
            assert_eq!(state.is_active(), !state.starts_fresh_cycle());
            assert_eq!(TweenState::from(state.name()), state);
        }
    }

    #[test]
    fn channel_states_map_onto_tween_states() {
        assert_eq!(ChannelState::Begin.as_tween_state(), TweenState::Initial);
        assert_eq!(
            ChannelState::Completed.as_tween_state(),
            TweenState::Completed
        );
        assert!(ChannelState::Cancelled.is_terminal());
        assert!(!ChannelState::Paused.is_terminal());
    }
}
