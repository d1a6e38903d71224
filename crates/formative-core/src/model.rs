//! Core data model types for formative.
//!
//! These are the fundamental types the whole system uses to represent a
//! composite assessment container and its child question units.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier of a child question unit, chosen by the author.
///
/// Child ids survive authoring edits: removing a child and adding it back
/// under the same id reconnects it to any correctness a student already has
/// on record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChildId(String);

impl ChildId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChildId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ChildId {
    fn from(s: &str) -> Self {
        ChildId(s.to_string())
    }
}

impl From<String> for ChildId {
    fn from(s: String) -> Self {
        ChildId(s)
    }
}

/// A student's raw response to one question, as delivered by the
/// submission transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Response {
    /// A single selected choice value.
    Choice(String),
    /// A set of selected choice values (order does not matter).
    Choices(Vec<String>),
    /// Free text typed by the student.
    Text(String),
}

/// The gradable behavior of a question.
///
/// The aggregator never looks at the concrete kind; it only consumes the
/// boolean produced by [`QuestionKind::evaluate`] together with the child's
/// weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    /// Exactly one choice is correct.
    MultipleChoice { correct_choice: String },
    /// The student must select exactly the required set of choices.
    MultipleResponse { required_choices: Vec<String> },
    /// Graded by presence: any answer of at least `min_length` non-blank
    /// characters counts as correct.
    FreeText {
        #[serde(default = "default_min_length")]
        min_length: usize,
    },
}

fn default_min_length() -> usize {
    1
}

impl QuestionKind {
    /// Grade a raw response to a binary correct/incorrect.
    ///
    /// A response whose shape does not match the question kind (e.g. free
    /// text delivered to a multiple-choice question) grades as incorrect
    /// rather than erroring; the transport owns payload validation.
    pub fn evaluate(&self, response: &Response) -> bool {
        match (self, response) {
            (QuestionKind::MultipleChoice { correct_choice }, Response::Choice(value)) => {
                value == correct_choice
            }
            (QuestionKind::MultipleResponse { required_choices }, Response::Choices(values)) => {
                values.len() == required_choices.len()
                    && required_choices.iter().all(|c| values.contains(c))
            }
            (QuestionKind::FreeText { min_length }, Response::Text(text)) => {
                text.trim().chars().count() >= *min_length
            }
            _ => false,
        }
    }
}

/// One gradable question owned by a container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildUnit {
    /// Stable identifier.
    pub id: ChildId,
    /// Points this child contributes to the percentage denominator
    /// (and to the numerator when correct).
    #[serde(default = "default_weight")]
    pub weight: f64,
    /// Maximum points for a single submission of this child, as reported
    /// back to the submission transport. 1 for a plain MCQ; may exceed 1
    /// for multi-part children.
    #[serde(default = "default_weight")]
    pub max_points: f64,
    /// How responses to this child are graded.
    pub kind: QuestionKind,
}

fn default_weight() -> f64 {
    1.0
}

impl ChildUnit {
    /// Build a child with default weight and max_points of 1.
    pub fn new(id: impl Into<ChildId>, kind: QuestionKind) -> Self {
        Self {
            id: id.into(),
            weight: 1.0,
            max_points: 1.0,
            kind,
        }
    }

    /// Set the weight, builder-style.
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }
}

/// Workflow mode of a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Single-shot: all questions visible, one submit, immediate feedback.
    Standard,
    /// Step-by-step: answer in sequence, submit, review, optionally retry.
    Assessment,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Standard => write!(f, "standard"),
            Mode::Assessment => write!(f, "assessment"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiple_choice_grading() {
        let kind = QuestionKind::MultipleChoice {
            correct_choice: "yes".into(),
        };
        assert!(kind.evaluate(&Response::Choice("yes".into())));
        assert!(!kind.evaluate(&Response::Choice("no".into())));
        assert!(!kind.evaluate(&Response::Text("yes".into())));
    }

    #[test]
    fn multiple_response_is_order_insensitive() {
        let kind = QuestionKind::MultipleResponse {
            required_choices: vec!["elegance".into(), "clarity".into()],
        };
        assert!(kind.evaluate(&Response::Choices(vec![
            "clarity".into(),
            "elegance".into()
        ])));
        assert!(!kind.evaluate(&Response::Choices(vec!["elegance".into()])));
        assert!(!kind.evaluate(&Response::Choices(vec![
            "elegance".into(),
            "clarity".into(),
            "bugs".into()
        ])));
    }

    #[test]
    fn free_text_requires_min_length() {
        let kind = QuestionKind::FreeText { min_length: 1 };
        assert!(kind.evaluate(&Response::Text("It's boring.".into())));
        assert!(!kind.evaluate(&Response::Text("   ".into())));
        assert!(!kind.evaluate(&Response::Text("".into())));
    }

    #[test]
    fn child_unit_defaults() {
        let unit = ChildUnit::new("q1", QuestionKind::FreeText { min_length: 1 });
        assert_eq!(unit.weight, 1.0);
        assert_eq!(unit.max_points, 1.0);
        assert_eq!(unit.id.as_str(), "q1");
    }

    #[test]
    fn child_unit_serde_defaults_weight() {
        let json = r#"{"id":"q1","kind":{"free_text":{}}}"#;
        let unit: ChildUnit = serde_json::from_str(json).unwrap();
        assert_eq!(unit.weight, 1.0);
        assert_eq!(unit.max_points, 1.0);
        assert_eq!(unit.kind, QuestionKind::FreeText { min_length: 1 });
    }

    #[test]
    fn mode_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Mode::Assessment).unwrap(), "\"assessment\"");
        let mode: Mode = serde_json::from_str("\"standard\"").unwrap();
        assert_eq!(mode, Mode::Standard);
    }
}
