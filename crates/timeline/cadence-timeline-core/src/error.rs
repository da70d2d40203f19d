//! Error types for the timeline engine.

use serde::{Deserialize, Serialize};

use crate::keyframe::Tick;

/// Errors raised while describing or loading a timeline.
///
/// Interpolation itself never fails: zero-length intervals and mismatched
/// value kinds are resolved by convention, so every variant here belongs to
/// the keyframe description or its JSON form.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum TimelineError {
    /// Key frame ticks must be non-decreasing.
    #[error("Key frame {index} has tick {tick}, which is before the previous tick {previous}")]
    NonMonotonicTicks {
        index: usize,
        previous: Tick,
        tick: Tick,
    },

    /// A stored timeline referenced a target path the resolver does not know.
    #[error("Unresolved target '{path}' in key frame {key_frame}")]
    UnresolvedTarget { path: String, key_frame: usize },

    /// A stored value could not be converted into a typed value.
    #[error("Invalid value: {reason}")]
    InvalidValue { reason: String },

    /// Serialization error
    #[error("Parse error: {reason}")]
    Parse { reason: String },
}

impl TimelineError {
    /// Get error category for logging
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::NonMonotonicTicks { .. } => "timeline",
            Self::UnresolvedTarget { .. } => "binding",
            Self::InvalidValue { .. } => "validation",
            Self::Parse { .. } => "serialization",
        }
    }
}

impl From<serde_json::Error> for TimelineError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse {
            reason: err.to_string(),
        }
    }
}
