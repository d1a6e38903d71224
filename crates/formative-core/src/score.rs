//! Weighted score aggregation.
//!
//! A pure join over two independently-owned read models: the container's
//! live composition and the student's attempt state. Nothing here is
//! cached or stored; the percentage is recomputed from scratch on every
//! read, which is what lets authoring edits retroactively change a
//! reported score without any new submission event.

use serde::{Deserialize, Serialize};

use crate::attempt::AttemptState;
use crate::container::{CompositionView, Container};
use crate::model::{ChildId, Response};

/// One child's contribution to a score computation.
///
/// Produced fresh for each computation; a record exists only for children
/// currently present in the container AND answered this attempt. Children
/// removed by the author silently drop out of both numerator and
/// denominator — never orphaned, never an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildRecord {
    pub child_id: ChildId,
    pub weight: f64,
    pub max_points: f64,
    pub correct: bool,
}

/// Coarse classification of an aggregate score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    /// Every counted child is correct (percentage 100).
    Correct,
    /// Every counted child is incorrect (percentage 0).
    Incorrect,
    /// Somewhere in between.
    Partial,
    /// No live, answered children to count. Percentage is defined as 0.
    NoQuestions,
}

/// The aggregate result of one score computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Score {
    /// `round(100 * earned / possible)`, or 0 when there is nothing to count.
    pub percentage: u32,
    pub classification: Classification,
    /// Weighted points earned (sum of weights of correct children).
    pub earned: f64,
    /// Weighted points possible (sum of all counted weights).
    pub possible: f64,
    /// Counted children answered correctly.
    pub correct_count: usize,
    /// Counted children answered incorrectly.
    pub incorrect_count: usize,
}

/// Join the live composition with an attempt's recorded correctness.
///
/// The intersection, in display order: answered children still present in
/// the container. Stale records for removed children and unanswered
/// children both contribute nothing.
pub fn join(view: &CompositionView<'_>, attempt: &AttemptState) -> Vec<ChildRecord> {
    view.units()
        .iter()
        .filter_map(|unit| {
            attempt.correctness_of(&unit.id).map(|correct| ChildRecord {
                child_id: unit.id.clone(),
                weight: unit.weight,
                max_points: unit.max_points,
                correct,
            })
        })
        .collect()
}

/// Aggregate a set of child records into a percentage.
///
/// Each child contributes `weight` to the denominator, and `weight` or 0
/// to the numerator; correctness is binary, there is no partial credit
/// within a child. Rounding is half-up to the nearest integer. An empty
/// record set is a defined result (`0`, [`Classification::NoQuestions`]),
/// not a division by zero — authors may legitimately delete every question.
pub fn aggregate(records: &[ChildRecord]) -> Score {
    if records.is_empty() {
        return Score {
            percentage: 0,
            classification: Classification::NoQuestions,
            earned: 0.0,
            possible: 0.0,
            correct_count: 0,
            incorrect_count: 0,
        };
    }

    let possible: f64 = records.iter().map(|r| r.weight).sum();
    let earned: f64 = records.iter().filter(|r| r.correct).map(|r| r.weight).sum();
    let correct_count = records.iter().filter(|r| r.correct).count();
    let incorrect_count = records.len() - correct_count;

    let percentage = (100.0 * earned / possible).round() as u32;
    let classification = match percentage {
        100 => Classification::Correct,
        0 => Classification::Incorrect,
        _ => Classification::Partial,
    };

    Score {
        percentage,
        classification,
        earned,
        possible,
        correct_count,
        incorrect_count,
    }
}

/// Compute the current score for one attempt, at one read instant.
pub fn score_of(container: &Container, attempt: &AttemptState) -> Score {
    aggregate(&join(&container.composition(), attempt))
}

/// What the submission transport relays back to the student after one
/// child is submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionOutcome {
    pub child_id: ChildId,
    pub correct: bool,
    /// Points earned on this child alone (`max_points` or 0); the weight
    /// applies at aggregation, not here.
    pub points_earned: f64,
    pub points_possible: f64,
}

/// Grade a single response against the container's current composition and
/// commit the correctness to the attempt.
///
/// This is the standard-mode submission path. Returns `None` when the
/// child is not currently in the container — nothing can be graded, and
/// the transport is expected to have already re-rendered.
pub fn grade_and_record(
    container: &Container,
    attempt: &mut AttemptState,
    child_id: &ChildId,
    response: &Response,
) -> Option<SubmissionOutcome> {
    let Some(unit) = container.get(child_id) else {
        tracing::warn!(child = %child_id, "submission for a child not in the composition");
        return None;
    };
    let correct = unit.kind.evaluate(response);
    attempt.record_answer(child_id.clone(), correct);
    Some(SubmissionOutcome {
        child_id: child_id.clone(),
        correct,
        points_earned: if correct { unit.max_points } else { 0.0 },
        points_possible: unit.max_points,
    })
}
