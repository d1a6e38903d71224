//! The multi-step assessment workflow state machine.
//!
//! Assessment mode walks the student through the children in sequence,
//! one submission per step, then offers a review of the aggregate score
//! and an unbounded number of retries. The machine owns the attempt state
//! and borrows the container per call, so authoring edits made mid-attempt
//! are picked up lazily — the review always reflects the composition at
//! review time, not at answer time.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::attempt::AttemptState;
use crate::container::Container;
use crate::error::PhaseViolation;
use crate::model::{ChildId, Response};
use crate::score::{score_of, Score, SubmissionOutcome};

/// The workflow step an attempt is currently in.
///
/// Exactly one phase is active at a time. A retry is not a resting state:
/// it resets the attempt and lands back in `Answering` at the first child
/// in one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentPhase {
    /// A single child (at `cursor`, in display order) is current; later
    /// children are unreached.
    Answering { cursor: usize },
    /// Every child has been answered; awaiting the review action.
    Submitted,
    /// Results are on display; a retry is available.
    Reviewed,
}

impl fmt::Display for AssessmentPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssessmentPhase::Answering { cursor } => {
                write!(f, "answering question {}", cursor + 1)
            }
            AssessmentPhase::Submitted => write!(f, "submitted, awaiting review"),
            AssessmentPhase::Reviewed => write!(f, "reviewed"),
        }
    }
}

/// Seam for the upstream grade-event emitter and student-facing UI.
///
/// The analytics pipeline itself is out of scope; this trait is where it
/// attaches.
pub trait GradeObserver: Send + Sync {
    /// One child was submitted and graded.
    fn on_answer_submitted(&self, outcome: &SubmissionOutcome);
    /// An aggregate grade was produced and should be reported upstream.
    fn on_grade(&self, score: &Score);
}

/// No-op grade observer.
pub struct NoopObserver;

impl GradeObserver for NoopObserver {
    fn on_answer_submitted(&self, _: &SubmissionOutcome) {}
    fn on_grade(&self, _: &Score) {}
}

/// When to report an aggregate grade through the [`GradeObserver`].
///
/// An authoring edit after submission retroactively changes the percentage
/// a review displays, but whether that should also re-fire the upstream
/// grade event is a policy decision, made explicit here rather than picked
/// silently.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradeEventPolicy {
    /// Report once, when the last child is submitted. Reviews after an
    /// authoring edit change the displayed score only. This matches the
    /// historically observed behavior.
    #[default]
    SubmissionOnly,
    /// Additionally re-report the recomputed grade on every review.
    EveryReview,
}

/// What `review` hands to the review/retry UI controls: plain data plus
/// the literal summary lines, frozen for this review.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewOutcome {
    pub attempt_id: Uuid,
    pub score: Score,
    /// Student-facing lines: scored percentage, correct count, incorrect
    /// count.
    pub summary: Vec<String>,
    pub reviewed_at: DateTime<Utc>,
}

/// Orchestrates phase transitions for one student's assessment attempt.
pub struct AssessmentStateMachine {
    attempt: AttemptState,
    phase: AssessmentPhase,
    policy: GradeEventPolicy,
    observer: Arc<dyn GradeObserver>,
}

impl AssessmentStateMachine {
    /// Start a fresh attempt for a student, at the first question.
    pub fn new(student_id: impl Into<String>) -> Self {
        Self {
            attempt: AttemptState::new(student_id),
            phase: AssessmentPhase::Answering { cursor: 0 },
            policy: GradeEventPolicy::default(),
            observer: Arc::new(NoopObserver),
        }
    }

    /// Set the grade-event policy, builder-style.
    pub fn with_policy(mut self, policy: GradeEventPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Attach a grade observer, builder-style.
    pub fn with_observer(mut self, observer: Arc<dyn GradeObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn phase(&self) -> AssessmentPhase {
        self.phase
    }

    pub fn attempt(&self) -> &AttemptState {
        &self.attempt
    }

    /// Submit the response for the currently-reachable child.
    ///
    /// Valid only while answering, and only for the child at the cursor;
    /// anything else is a client/UI desynchronization and surfaces as a
    /// [`PhaseViolation`]. Grades the response, commits it to the attempt,
    /// and advances the cursor; submitting the last child moves the phase
    /// to `Submitted` and reports the submission-time grade.
    pub fn submit_answer(
        &mut self,
        container: &Container,
        child_id: &ChildId,
        response: &Response,
    ) -> Result<SubmissionOutcome, PhaseViolation> {
        let AssessmentPhase::Answering { cursor } = self.phase else {
            return Err(PhaseViolation::new("submit_answer", self.phase));
        };

        let Some(unit) = container.composition().units().get(cursor) else {
            // The composition shrank below the cursor mid-attempt.
            return Err(PhaseViolation::new("submit_answer", self.phase));
        };
        if &unit.id != child_id {
            return Err(PhaseViolation::new("submit_answer", self.phase));
        }

        let correct = unit.kind.evaluate(response);
        self.attempt.record_answer(child_id.clone(), correct);
        let outcome = SubmissionOutcome {
            child_id: child_id.clone(),
            correct,
            points_earned: if correct { unit.max_points } else { 0.0 },
            points_possible: unit.max_points,
        };
        self.observer.on_answer_submitted(&outcome);

        if cursor + 1 < container.len() {
            self.phase = AssessmentPhase::Answering { cursor: cursor + 1 };
        } else {
            self.phase = AssessmentPhase::Submitted;
            let score = score_of(container, &self.attempt);
            tracing::debug!(attempt = %self.attempt.attempt_id, percentage = score.percentage,
                "all questions answered, reporting submission grade");
            self.observer.on_grade(&score);
        }
        Ok(outcome)
    }

    /// Compute and return the results for this attempt.
    ///
    /// Valid from `Submitted`, and again from `Reviewed` (re-entering the
    /// results screen re-reads the score; without an intervening edit or
    /// retry the output is identical). The score is computed from the
    /// composition at review time, so an authoring edit between submission
    /// and review changes the reviewed numbers.
    pub fn review(&mut self, container: &Container) -> Result<ReviewOutcome, PhaseViolation> {
        match self.phase {
            AssessmentPhase::Submitted | AssessmentPhase::Reviewed => {}
            phase => return Err(PhaseViolation::new("review", phase)),
        }

        let score = score_of(container, &self.attempt);
        if self.policy == GradeEventPolicy::EveryReview {
            self.observer.on_grade(&score);
        }
        tracing::debug!(attempt = %self.attempt.attempt_id, percentage = score.percentage, "review");
        self.phase = AssessmentPhase::Reviewed;

        let summary = render_summary(&score);
        Ok(ReviewOutcome {
            attempt_id: self.attempt.attempt_id,
            score,
            summary,
            reviewed_at: Utc::now(),
        })
    }

    /// Discard all recorded answers and restart at the first question.
    ///
    /// Valid only from `Reviewed`. Retries are unbounded.
    pub fn retry_attempt(&mut self) -> Result<(), PhaseViolation> {
        if self.phase != AssessmentPhase::Reviewed {
            return Err(PhaseViolation::new("retry_attempt", self.phase));
        }
        self.attempt.reset();
        self.phase = AssessmentPhase::Answering { cursor: 0 };
        tracing::debug!(attempt = %self.attempt.attempt_id, "retrying attempt");
        Ok(())
    }
}

/// Render the student-facing summary lines for a reviewed score.
fn render_summary(score: &Score) -> Vec<String> {
    vec![
        format!("You scored {}% on this assessment.", score.percentage),
        format!(
            "You answered {} question{} correctly.",
            score.correct_count,
            plural(score.correct_count)
        ),
        format!(
            "You answered {} question{} incorrectly.",
            score.incorrect_count,
            plural(score.incorrect_count)
        ),
    ]
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}
