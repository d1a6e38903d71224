//! The parent container and its authoring operations.
//!
//! The container owns the ordered list of child units and is the sole
//! source of truth for every score computation. Authoring edits mutate it
//! directly and take effect for every subsequent computation; there is no
//! migration or invalidation step for in-flight attempts. Scores are
//! recomputed lazily from the live composition, so each computation is
//! independently consistent at its own read instant.

use serde::{Deserialize, Serialize};

use crate::error::AuthoringError;
use crate::model::{ChildId, ChildUnit, Mode};

/// The composite parent unit holding ordered child question units.
///
/// Child order defines display sequence only; it never affects scoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Container {
    /// Workflow mode.
    pub mode: Mode,
    children: Vec<ChildUnit>,
}

impl Container {
    /// Create an empty container.
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            children: Vec::new(),
        }
    }

    /// Append a child to the end of the display sequence.
    ///
    /// Weight sanity is enforced here, at the authoring boundary, so the
    /// aggregator never has to validate it.
    pub fn append_child(&mut self, unit: ChildUnit) -> Result<(), AuthoringError> {
        if unit.weight <= 0.0 || !unit.weight.is_finite() {
            return Err(AuthoringError::InvalidWeight(unit.weight));
        }
        if unit.max_points <= 0.0 || !unit.max_points.is_finite() {
            return Err(AuthoringError::InvalidWeight(unit.max_points));
        }
        if self.children.iter().any(|c| c.id == unit.id) {
            return Err(AuthoringError::DuplicateChild(unit.id));
        }
        tracing::debug!(child = %unit.id, weight = unit.weight, "appending child");
        self.children.push(unit);
        Ok(())
    }

    /// Remove a child from the composition, returning it.
    ///
    /// Any correctness students have on record for the removed child
    /// becomes inert: it drops out of both numerator and denominator on
    /// the next score computation, and reconnects if the id reappears.
    pub fn remove_child(&mut self, id: &ChildId) -> Result<ChildUnit, AuthoringError> {
        let pos = self
            .children
            .iter()
            .position(|c| &c.id == id)
            .ok_or_else(|| AuthoringError::UnknownChild(id.clone()))?;
        tracing::debug!(child = %id, "removing child");
        Ok(self.children.remove(pos))
    }

    /// Change the weight of an existing child.
    pub fn reweight_child(&mut self, id: &ChildId, new_weight: f64) -> Result<(), AuthoringError> {
        if new_weight <= 0.0 || !new_weight.is_finite() {
            return Err(AuthoringError::InvalidWeight(new_weight));
        }
        let child = self
            .children
            .iter_mut()
            .find(|c| &c.id == id)
            .ok_or_else(|| AuthoringError::UnknownChild(id.clone()))?;
        tracing::debug!(child = %id, old = child.weight, new = new_weight, "reweighting child");
        child.weight = new_weight;
        Ok(())
    }

    /// Take a read-only snapshot of the composition for one score query.
    pub fn composition(&self) -> CompositionView<'_> {
        CompositionView {
            children: &self.children,
        }
    }

    /// Look up a child by id.
    pub fn get(&self, id: &ChildId) -> Option<&ChildUnit> {
        self.children.iter().find(|c| &c.id == id)
    }

    /// Number of children currently configured.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

/// Read-only view of the container's child list at one read instant.
///
/// Never cached across authoring saves: callers take a fresh view per
/// score computation so edits are picked up lazily.
#[derive(Debug, Clone, Copy)]
pub struct CompositionView<'a> {
    children: &'a [ChildUnit],
}

impl<'a> CompositionView<'a> {
    /// The currently-configured children, in display order.
    pub fn units(&self) -> &'a [ChildUnit] {
        self.children
    }

    /// The currently-configured child ids, in display order.
    pub fn current_children(&self) -> impl Iterator<Item = &'a ChildId> {
        self.children.iter().map(|c| &c.id)
    }

    pub fn get(&self, id: &ChildId) -> Option<&'a ChildUnit> {
        self.children.iter().find(|c| &c.id == id)
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QuestionKind;

    fn mcq(id: &str) -> ChildUnit {
        ChildUnit::new(
            id,
            QuestionKind::MultipleChoice {
                correct_choice: "yes".into(),
            },
        )
    }

    #[test]
    fn append_and_order() {
        let mut container = Container::new(Mode::Standard);
        container.append_child(mcq("q1")).unwrap();
        container.append_child(mcq("q2")).unwrap();
        let ids: Vec<_> = container
            .composition()
            .current_children()
            .map(|id| id.as_str().to_string())
            .collect();
        assert_eq!(ids, ["q1", "q2"]);
    }

    #[test]
    fn append_rejects_bad_weight() {
        let mut container = Container::new(Mode::Standard);
        let unit = mcq("q1").with_weight(0.0);
        assert!(matches!(
            container.append_child(unit),
            Err(AuthoringError::InvalidWeight(_))
        ));
        assert!(container.is_empty());
    }

    #[test]
    fn append_rejects_duplicate_id() {
        let mut container = Container::new(Mode::Standard);
        container.append_child(mcq("q1")).unwrap();
        assert!(matches!(
            container.append_child(mcq("q1")),
            Err(AuthoringError::DuplicateChild(_))
        ));
    }

    #[test]
    fn remove_unknown_child_errors() {
        let mut container = Container::new(Mode::Standard);
        assert!(matches!(
            container.remove_child(&"q9".into()),
            Err(AuthoringError::UnknownChild(_))
        ));
    }

    #[test]
    fn reweight_validates_then_applies() {
        let mut container = Container::new(Mode::Standard);
        container.append_child(mcq("q1")).unwrap();
        assert!(matches!(
            container.reweight_child(&"q1".into(), -1.0),
            Err(AuthoringError::InvalidWeight(_))
        ));
        container.reweight_child(&"q1".into(), 5.0).unwrap();
        assert_eq!(container.get(&"q1".into()).unwrap().weight, 5.0);
    }

    #[test]
    fn view_reflects_latest_edit() {
        let mut container = Container::new(Mode::Standard);
        container.append_child(mcq("q1")).unwrap();
        container.append_child(mcq("q2")).unwrap();
        assert_eq!(container.composition().len(), 2);
        container.remove_child(&"q1".into()).unwrap();
        assert_eq!(container.composition().len(), 1);
    }
}
