//! Per-student, per-container attempt state.
//!
//! Holds only what the student has done: which children have an answer of
//! record and whether each was correct. It knows nothing about which
//! children currently exist; that is container state, joined in lazily at
//! scoring time. Context is passed explicitly (a handle per student), never
//! looked up from ambient session state.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::ChildId;

/// One student's ongoing pass through a container's questions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttemptState {
    /// Unique identifier of this attempt.
    pub attempt_id: Uuid,
    /// The student this attempt belongs to.
    pub student_id: String,
    /// Committed correctness per answered child. A key is present iff the
    /// child has been answered this attempt.
    correctness: HashMap<ChildId, bool>,
}

impl AttemptState {
    /// Create a fresh attempt for a student, as done on first render of
    /// the container for that student.
    pub fn new(student_id: impl Into<String>) -> Self {
        Self {
            attempt_id: Uuid::new_v4(),
            student_id: student_id.into(),
            correctness: HashMap::new(),
        }
    }

    /// Record (or overwrite) the correctness of one child's answer.
    ///
    /// Accepts any child id, including ids no longer present in the
    /// container: such a record is inert, excluded from scoring until the
    /// child reappears. Authoring edits never delete records.
    pub fn record_answer(&mut self, child_id: impl Into<ChildId>, correct: bool) {
        let child_id = child_id.into();
        tracing::debug!(attempt = %self.attempt_id, child = %child_id, correct, "recording answer");
        self.correctness.insert(child_id, correct);
    }

    /// Whether this child has an answer of record for the current attempt.
    pub fn is_answered(&self, child_id: &ChildId) -> bool {
        self.correctness.contains_key(child_id)
    }

    /// The committed correctness for a child, or `None` if never answered.
    pub fn correctness_of(&self, child_id: &ChildId) -> Option<bool> {
        self.correctness.get(child_id).copied()
    }

    /// Number of children with an answer of record.
    pub fn answered_count(&self) -> usize {
        self.correctness.len()
    }

    /// Clear all per-child correctness and answered flags, as done on
    /// retry. The attempt identity survives the reset.
    pub fn reset(&mut self) {
        tracing::debug!(attempt = %self.attempt_id, "resetting attempt state");
        self.correctness.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unanswered_child_is_absent() {
        let attempt = AttemptState::new("student-1");
        assert!(!attempt.is_answered(&"q1".into()));
        assert_eq!(attempt.correctness_of(&"q1".into()), None);
    }

    #[test]
    fn record_answer_overwrites() {
        let mut attempt = AttemptState::new("student-1");
        attempt.record_answer("q1", false);
        assert_eq!(attempt.correctness_of(&"q1".into()), Some(false));
        attempt.record_answer("q1", true);
        assert_eq!(attempt.correctness_of(&"q1".into()), Some(true));
        assert_eq!(attempt.answered_count(), 1);
    }

    #[test]
    fn record_answer_accepts_unknown_children() {
        // Decoupled from the container on purpose: the record is inert
        // until a child with this id exists again.
        let mut attempt = AttemptState::new("student-1");
        attempt.record_answer("ghost", true);
        assert!(attempt.is_answered(&"ghost".into()));
    }

    #[test]
    fn reset_clears_answers_but_keeps_identity() {
        let mut attempt = AttemptState::new("student-1");
        let id = attempt.attempt_id;
        attempt.record_answer("q1", true);
        attempt.record_answer("q2", false);
        attempt.reset();
        assert_eq!(attempt.answered_count(), 0);
        assert!(!attempt.is_answered(&"q1".into()));
        assert_eq!(attempt.attempt_id, id);
        assert_eq!(attempt.student_id, "student-1");
    }
}
