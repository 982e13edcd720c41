//! Highlighted range, pending relationship endpoint, and the active mode.
//!
//! A highlighted range and a pending endpoint are variants of one enum, so
//! they can never be active together. Every method returns a new state.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{HighlightRange, SequenceUnit, TextId};

/// What the label picker currently acts on
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Entities,
    Relationships,
}

impl Mode {
    pub fn toggled(self) -> Self {
        match self {
            Mode::Entities => Mode::Relationships,
            Mode::Relationships => Mode::Entities,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Entities => "entities",
            Mode::Relationships => "relationships",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    Empty,
    /// Units highlighted for labeling (entity mode)
    Range(HighlightRange),
    /// First endpoint of a relationship being drawn (relationship mode)
    Pending(TextId),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    mode: Mode,
    selection: Selection,
}

impl SelectionState {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            selection: Selection::Empty,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn highlighted(&self) -> Option<HighlightRange> {
        match self.selection {
            Selection::Range(range) => Some(range),
            _ => None,
        }
    }

    pub fn pending_first(&self) -> Option<&TextId> {
        match &self.selection {
            Selection::Pending(id) => Some(id),
            _ => None,
        }
    }

    /// Highlight `from..=to` in either order.
    ///
    /// Whitespace-only units at either end are trimmed off. The request is
    /// ignored in relationship mode, when only whitespace is covered, or
    /// when any covered unit is already labeled.
    pub fn highlight_range(&self, sequence: &[SequenceUnit], from: usize, to: usize) -> Result<Self> {
        let len = sequence.len();
        if let Some(&index) = [from, to].iter().find(|&&i| i >= len) {
            return Err(Error::out_of_bounds(index, len));
        }
        if self.mode != Mode::Entities {
            log::debug!("ignoring highlight in {} mode", self.mode.as_str());
            return Ok(self.clone());
        }

        let range = HighlightRange::new(from, to);
        let covered = &sequence[range.indices()];
        if covered.iter().any(SequenceUnit::is_labeled) {
            log::debug!("ignoring highlight {}..={}: covers a labeled unit", range.start_index, range.end_index);
            return Ok(self.clone());
        }

        let first = covered.iter().position(|u| !u.is_space());
        let last = covered.iter().rposition(|u| !u.is_space());
        match (first, last) {
            (Some(first), Some(last)) => Ok(Self {
                mode: self.mode,
                selection: Selection::Range(HighlightRange::new(
                    range.start_index + first,
                    range.start_index + last,
                )),
            }),
            _ => {
                log::debug!("ignoring whitespace-only highlight");
                Ok(self.clone())
            }
        }
    }

    /// Drop any highlight or pending endpoint
    pub fn clear(&self) -> Self {
        Self::new(self.mode)
    }

    /// Switch mode; always abandons the current gesture
    pub fn with_mode(&self, mode: Mode) -> Self {
        Self::new(mode)
    }

    pub fn toggle_mode(&self) -> Self {
        self.with_mode(self.mode.toggled())
    }

    pub(crate) fn with_pending(&self, first: TextId) -> Self {
        Self {
            mode: self.mode,
            selection: Selection::Pending(first),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Color;

    fn sequence() -> Vec<SequenceUnit> {
        vec![
            SequenceUnit::unlabeled("a".into(), "John"),
            SequenceUnit::unlabeled("b".into(), " "),
            SequenceUnit::unlabeled("c".into(), "met"),
            SequenceUnit::unlabeled("d".into(), " "),
            SequenceUnit::labeled("e".into(), "Mary", "PERSON".into(), Color::new("#000")),
        ]
    }

    #[test]
    fn test_highlight_normalizes_and_trims() {
        let state = SelectionState::default();
        let seq = sequence();

        let next = state.highlight_range(&seq, 3, 0).unwrap();
        assert_eq!(next.highlighted(), Some(HighlightRange::new(0, 2)));

        let next = state.highlight_range(&seq, 1, 2).unwrap();
        assert_eq!(next.highlighted(), Some(HighlightRange::new(2, 2)));
    }

    #[test]
    fn test_highlight_ignored_cases() {
        let state = SelectionState::default();
        let seq = sequence();

        assert_eq!(state.highlight_range(&seq, 1, 1).unwrap(), state);
        assert_eq!(state.highlight_range(&seq, 2, 4).unwrap(), state);

        let rel = state.with_mode(Mode::Relationships);
        assert_eq!(rel.highlight_range(&seq, 0, 0).unwrap(), rel);
    }

    #[test]
    fn test_highlight_out_of_bounds() {
        let state = SelectionState::default();
        assert!(matches!(
            state.highlight_range(&sequence(), 0, 9),
            Err(Error::IndexOutOfBounds { index: 9, len: 5 })
        ));
    }

    #[test]
    fn test_highlight_and_pending_are_exclusive() {
        let seq = sequence();
        let pending = SelectionState::default().with_pending("a".into());
        let highlighted = pending.highlight_range(&seq, 0, 0).unwrap();
        assert_eq!(highlighted.pending_first(), None);
        assert!(highlighted.highlighted().is_some());

        let pending_again = highlighted.with_pending("c".into());
        assert_eq!(pending_again.highlighted(), None);
    }

    #[test]
    fn test_mode_switch_clears() {
        let seq = sequence();
        let state = SelectionState::default().highlight_range(&seq, 0, 0).unwrap();
        let toggled = state.toggle_mode();
        assert_eq!(toggled.mode(), Mode::Relationships);
        assert_eq!(toggled.selection(), &Selection::Empty);

        let back = toggled.with_pending("a".into()).toggle_mode();
        assert_eq!(back.mode(), Mode::Entities);
        assert_eq!(back.selection(), &Selection::Empty);
    }
}
