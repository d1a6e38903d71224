//! Error types for authoring edits and assessment phase transitions.
//!
//! Defined in one place so callers can match on them without string
//! comparisons. Note what is deliberately *not* here: an empty composition
//! is a defined scoring result ([`crate::score::Classification::NoQuestions`]),
//! never an error, and a recorded answer for a removed child is inert,
//! not a failure.

use thiserror::Error;

use crate::assessment::AssessmentPhase;
use crate::model::ChildId;

/// Errors surfaced to the authoring layer when editing a container.
///
/// These are rejected at the authoring boundary, so the aggregator and
/// attempt state never see a malformed weight or a dangling edit.
#[derive(Debug, Error)]
pub enum AuthoringError {
    /// An edit referenced a child id not present in the container.
    #[error("unknown child: {0}")]
    UnknownChild(ChildId),

    /// A weight or max_points value that is not strictly positive.
    #[error("invalid weight {0}: must be positive")]
    InvalidWeight(f64),

    /// An appended child reuses an id already present in the container.
    #[error("duplicate child id: {0}")]
    DuplicateChild(ChildId),
}

/// An assessment operation was invoked outside its valid phase.
///
/// This indicates a client/UI desynchronization bug and must surface; it is
/// fatal to the call but leaves attempt state untouched.
#[derive(Debug, Error)]
#[error("'{operation}' is not valid while {phase}")]
pub struct PhaseViolation {
    /// The operation that was attempted.
    pub operation: &'static str,
    /// The phase the state machine was actually in.
    pub phase: AssessmentPhase,
}

impl PhaseViolation {
    pub fn new(operation: &'static str, phase: AssessmentPhase) -> Self {
        Self { operation, phase }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authoring_error_messages() {
        let err = AuthoringError::UnknownChild("q9".into());
        assert_eq!(err.to_string(), "unknown child: q9");
        let err = AuthoringError::InvalidWeight(-2.0);
        assert_eq!(err.to_string(), "invalid weight -2: must be positive");
    }

    #[test]
    fn phase_violation_names_operation_and_phase() {
        let err = PhaseViolation::new("review", AssessmentPhase::Answering { cursor: 0 });
        assert_eq!(
            err.to_string(),
            "'review' is not valid while answering question 1"
        );
    }
}
