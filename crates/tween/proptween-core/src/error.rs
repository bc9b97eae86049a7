//! Error types for channel planning and playback control.

use serde::{Deserialize, Serialize};

use crate::ids::TweenId;
use crate::value::ValueKind;

/// Errors surfaced by construction, channel building, and playback control.
/// Host-engine failures are carried through untranslated in `Host`.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum TweenError {
    #[error("value kind mismatch: expected {expected:?}, got {actual:?}")]
    TypeMismatch {
        expected: ValueKind,
        actual: ValueKind,
    },

    #[error("field '{field}' is neither a composite transform, an attribute, nor a native field")]
    UnresolvedField { field: String },

    #[error("relative playback is not defined for {kind:?} values")]
    DeltaUnsupported { kind: ValueKind },

    #[error("no tween registered under {id:?}")]
    UnknownTween { id: TweenId },

    #[error("serialization error: {message}")]
    Serialization { message: String },

    #[error("host engine error: {message}")]
    Host { message: String },
}

impl TweenError {
    /// Whether the caller can fix the request and retry the same operation.
    pub fn is_recoverable(&self) -> bool {
        match self {
            TweenError::TypeMismatch { .. }
            | TweenError::UnresolvedField { .. }
            | TweenError::DeltaUnsupported { .. }
            | TweenError::Serialization { .. } => true,
            TweenError::UnknownTween { .. } | TweenError::Host { .. } => false,
        }
    }

    /// Coarse grouping for logging and reporting.
    pub fn category(&self) -> &'static str {
        match self {
            TweenError::TypeMismatch { .. } | TweenError::DeltaUnsupported { .. } => "value",
            TweenError::UnresolvedField { .. } => "binding",
            TweenError::UnknownTween { .. } => "lifecycle",
            TweenError::Serialization { .. } => "serialization",
            TweenError::Host { .. } => "host",
        }
    }

    pub fn host<S: Into<String>>(message: S) -> Self {
        TweenError::Host {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for TweenError {
    fn from(err: serde_json::Error) -> Self {
        TweenError::Serialization {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_carries_the_field_name() {
        let err = TweenError::UnresolvedField {
            field: "Cooldown".into(),
        };
        assert!(err.to_string().contains("Cooldown"));
        assert_eq!(err.category(), "binding");
        assert!(err.is_recoverable());
    }

    #[test]
    fn host_errors_are_not_recoverable() {
        let err = TweenError::host("bad descriptor");
        assert_eq!(err.category(), "host");
        assert!(!err.is_recoverable());
    }

    #[test]
    fn serde_errors_convert() {
        let parse: Result<crate::descriptor::TweenSpec, _> = serde_json::from_str("[");
        let err: TweenError = parse.unwrap_err().into();
        assert!(matches!(err, TweenError::Serialization { .. }));
    }
}
