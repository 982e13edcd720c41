//! Relationship creation and pruning.
//!
//! Drawing a relationship takes two picks: [`begin_pair`] records the
//! first endpoint in the selection, [`complete_pair`] yields a temporary
//! relationship for display, and [`commit_label`] turns it into a real one
//! once the user picks a label.

use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::model::{ColorLabelMap, LabelId, Relationship, SequenceUnit, TextId};
use crate::selection::{Mode, SelectionState};

/// Whether `unit` may be an endpoint under the labeled-only policy
fn eligible(unit: &SequenceUnit, labeled_only: bool) -> bool {
    !labeled_only || unit.is_labeled()
}

/// Record `unit` as the first endpoint.
///
/// Ignored outside relationship mode, while an endpoint is already
/// pending, or when `labeled_only` is set and the unit has no label.
pub fn begin_pair(selection: &SelectionState, unit: &SequenceUnit, labeled_only: bool) -> SelectionState {
    if selection.mode() != Mode::Relationships {
        log::debug!("ignoring pair start in {} mode", selection.mode().as_str());
        return selection.clone();
    }
    if selection.pending_first().is_some() {
        log::debug!("ignoring pair start on {}: endpoint already pending", unit.text_id);
        return selection.clone();
    }
    if !eligible(unit, labeled_only) {
        log::debug!("ignoring pair start on unlabeled unit {}", unit.text_id);
        return selection.clone();
    }
    selection.with_pending(unit.text_id.clone())
}

/// Pair the pending endpoint with `unit`.
///
/// On success the pending endpoint is cleared and a temporary relationship
/// is returned. Picking the pending unit itself is ignored.
pub fn complete_pair(
    selection: &SelectionState,
    unit: &SequenceUnit,
    labeled_only: bool,
) -> (SelectionState, Option<Relationship>) {
    let Some(first) = selection.pending_first() else {
        log::debug!("ignoring pair completion: no endpoint pending");
        return (selection.clone(), None);
    };
    if first == &unit.text_id {
        log::debug!("ignoring pair completion on its own first endpoint {}", first);
        return (selection.clone(), None);
    }
    if !eligible(unit, labeled_only) {
        log::debug!("ignoring pair completion on unlabeled unit {}", unit.text_id);
        return (selection.clone(), None);
    }

    let pending = Relationship::pending(first.clone(), unit.text_id.clone());
    (selection.clear(), Some(pending))
}

/// Give a temporary relationship its label
pub fn commit_label(pending: &Relationship, label: &LabelId, colors: &ColorLabelMap) -> Result<Relationship> {
    let color = colors
        .get(label)
        .cloned()
        .ok_or_else(|| Error::unknown_label(label.as_str()))?;
    Ok(Relationship {
        from: pending.from.clone(),
        to: pending.to.clone(),
        label: label.clone(),
        color,
        temp: false,
    })
}

/// Ids of every unit in `sequence`
pub fn valid_ids(sequence: &[SequenceUnit]) -> HashSet<&TextId> {
    sequence.iter().map(|u| &u.text_id).collect()
}

/// Keep only relationships whose endpoints are both in `valid`
pub fn prune(relationships: &[Relationship], valid: &HashSet<&TextId>) -> Vec<Relationship> {
    let kept: Vec<Relationship> = relationships
        .iter()
        .filter(|r| valid.contains(&r.from) && valid.contains(&r.to))
        .cloned()
        .collect();
    let dropped = relationships.len() - kept.len();
    if dropped > 0 {
        log::debug!("pruned {} dangling relationship(s)", dropped);
    }
    kept
}

/// [`prune`] against the ids present in `sequence`
pub fn prune_against(relationships: &[Relationship], sequence: &[SequenceUnit]) -> Vec<Relationship> {
    prune(relationships, &valid_ids(sequence))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Color, Label, PENDING_COLOR, PENDING_LABEL};

    fn john() -> SequenceUnit {
        SequenceUnit::labeled("a".into(), "John", "PERSON".into(), Color::new("#000"))
    }

    fn mary() -> SequenceUnit {
        SequenceUnit::labeled("b".into(), "Mary", "PERSON".into(), Color::new("#000"))
    }

    fn word() -> SequenceUnit {
        SequenceUnit::unlabeled("c".into(), "met")
    }

    fn relationship_mode() -> SelectionState {
        SelectionState::new(Mode::Relationships)
    }

    #[test]
    fn test_two_phase_creation() {
        let started = begin_pair(&relationship_mode(), &john(), false);
        assert_eq!(started.pending_first(), Some(&TextId::from("a")));

        let (done, pending) = complete_pair(&started, &mary(), false);
        assert_eq!(done.pending_first(), None);
        let pending = pending.unwrap();
        assert!(pending.temp);
        assert_eq!(pending.label.as_str(), PENDING_LABEL);
        assert_eq!(pending.color.as_str(), PENDING_COLOR);

        let colors = ColorLabelMap::new(&[Label::new("PERSON")], &[Label::new("MET")]);
        let committed = commit_label(&pending, &"MET".into(), &colors).unwrap();
        assert!(!committed.temp);
        assert_eq!(committed.from, TextId::from("a"));
        assert_eq!(committed.to, TextId::from("b"));
        assert_eq!(Some(&committed.color), colors.get(&"MET".into()));

        assert!(matches!(
            commit_label(&pending, &"NOPE".into(), &colors),
            Err(Error::UnknownLabel(_))
        ));
    }

    #[test]
    fn test_begin_pair_guards() {
        let entities = SelectionState::default();
        assert_eq!(begin_pair(&entities, &john(), false), entities);

        let started = begin_pair(&relationship_mode(), &john(), false);
        let again = begin_pair(&started, &mary(), false);
        assert_eq!(again.pending_first(), Some(&TextId::from("a")));

        let constrained = begin_pair(&relationship_mode(), &word(), true);
        assert_eq!(constrained.pending_first(), None);
        let unconstrained = begin_pair(&relationship_mode(), &word(), false);
        assert_eq!(unconstrained.pending_first(), Some(&TextId::from("c")));
    }

    #[test]
    fn test_complete_pair_guards() {
        let (state, rel) = complete_pair(&relationship_mode(), &mary(), false);
        assert!(rel.is_none());
        assert_eq!(state.pending_first(), None);

        let started = begin_pair(&relationship_mode(), &john(), false);
        let (same, rel) = complete_pair(&started, &john(), false);
        assert!(rel.is_none());
        assert_eq!(same.pending_first(), Some(&TextId::from("a")));

        let (still, rel) = complete_pair(&started, &word(), true);
        assert!(rel.is_none());
        assert_eq!(still, started);
    }

    #[test]
    fn test_prune_drops_dangling() {
        let colors = ColorLabelMap::new(&[], &[Label::new("MET")]);
        let keep = commit_label(&Relationship::pending("a".into(), "b".into()), &"MET".into(), &colors).unwrap();
        let dangling = commit_label(&Relationship::pending("a".into(), "z".into()), &"MET".into(), &colors).unwrap();

        let pruned = prune_against(&[keep.clone(), dangling], &[john(), mary()]);
        assert_eq!(pruned, vec![keep]);
    }
}
