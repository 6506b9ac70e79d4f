//! Error types for the workout_core library.

use crate::vocabulary::{VALID_GOALS, VALID_STEPS};
use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for workout_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The input text is not well-formed JSON
    #[error("Syntax error: {0}")]
    Syntax(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A workout or repetition was given without its required field
    #[error("Missing field '{field}' on {kind}")]
    MissingField {
        kind: &'static str,
        field: &'static str,
    },

    /// A value was found where a different kind of value was required
    #[error("Expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: String,
    },

    /// The tag matched no step kind, alias or fuzzy candidate
    #[error("Invalid type: {tag}. Valid values are {}", VALID_STEPS.join(", "))]
    InvalidStepType { tag: String },

    /// The tag matched no goal kind, alias or fuzzy candidate
    #[error("Invalid type: {tag}. Valid values are {}", VALID_GOALS.join(", "))]
    InvalidGoalType { tag: String },

    /// A repetition must own at least one step
    #[error("Repetition has no steps")]
    EmptyRepetition,

    /// Unit outside of seconds / meters / miles
    #[error("Invalid unit: {unit}. Valid values are seconds, meters, miles")]
    InvalidUnit { unit: String },
}

impl Error {
    /// True for every failure a `decode` call can report, false for the
    /// IO and configuration errors raised around it.
    pub fn is_decode_failure(&self) -> bool {
        !matches!(self, Error::Io(_) | Error::Toml(_) | Error::Config(_))
    }

    /// Canonical tags listed in the diagnostics of an unresolvable tag
    pub fn valid_tags(&self) -> Option<&'static [&'static str]> {
        match self {
            Error::InvalidStepType { .. } => Some(VALID_STEPS),
            Error::InvalidGoalType { .. } => Some(VALID_GOALS),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_step_type_lists_valid_tags() {
        let err = Error::InvalidStepType { tag: "xyz".into() };
        let msg = err.to_string();
        assert!(msg.starts_with("Invalid type: xyz."));
        assert!(msg.contains("repetition, run, recover, rest, warm-up, cool-down"));
        assert_eq!(err.valid_tags(), Some(VALID_STEPS));
    }

    #[test]
    fn test_invalid_goal_type_lists_valid_tags() {
        let err = Error::InvalidGoalType { tag: "vo2".into() };
        assert!(err.to_string().contains("heart_rate_zone"));
    }

    #[test]
    fn test_decode_failure_classification() {
        assert!(Error::EmptyRepetition.is_decode_failure());
        assert!(!Error::Config("bad".into()).is_decode_failure());
    }
}
