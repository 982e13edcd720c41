//! Applying and removing entity labels on the unit sequence.
//!
//! Both operations return `Ok(None)` when the request does not apply to
//! the current sequence, and an error only when an index is out of range
//! or the label is unknown.

use crate::error::{Error, Result};
use crate::identity::IdAssigner;
use crate::model::{ColorLabelMap, HighlightRange, LabelId, SequenceUnit};

/// Result of a successful [`apply_label`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labeled {
    pub sequence: Vec<SequenceUnit>,
    /// The merged unit, now at `range.start_index`
    pub unit: SequenceUnit,
}

/// Merge the units in `range` into one labeled unit.
///
/// The merged unit reuses the id of the first unit in the range, so
/// relationships pointing at it stay valid. Ranges that include an
/// already-labeled unit are ignored.
pub fn apply_label(
    sequence: &[SequenceUnit],
    range: HighlightRange,
    label: &LabelId,
    colors: &ColorLabelMap,
) -> Result<Option<Labeled>> {
    if range.end_index >= sequence.len() {
        return Err(Error::out_of_bounds(range.end_index, sequence.len()));
    }
    let color = colors
        .get(label)
        .cloned()
        .ok_or_else(|| Error::unknown_label(label.as_str()))?;

    let consumed = &sequence[range.indices()];
    if let Some(unit) = consumed.iter().find(|u| u.is_labeled()) {
        log::debug!("ignoring label {}: range covers labeled unit {}", label, unit.text_id);
        return Ok(None);
    }

    let text: String = consumed.iter().map(|u| u.text.as_str()).collect();
    let unit = SequenceUnit::labeled(consumed[0].text_id.clone(), text, label.clone(), color);

    let mut next = Vec::with_capacity(sequence.len() - range.len() + 1);
    next.extend_from_slice(&sequence[..range.start_index]);
    next.push(unit.clone());
    next.extend_from_slice(&sequence[range.end_index + 1..]);

    Ok(Some(Labeled {
        sequence: next,
        unit,
    }))
}

/// Strip the label from the unit at `index`.
///
/// The unit stays whole (a merged span is not split back into its
/// original pieces) and gets a fresh id: the labeled span it was is gone,
/// and so are relationships that pointed at it.
pub fn remove_label(
    sequence: &[SequenceUnit],
    index: usize,
    ids: &mut IdAssigner,
) -> Result<Option<Vec<SequenceUnit>>> {
    let unit = sequence
        .get(index)
        .ok_or_else(|| Error::out_of_bounds(index, sequence.len()))?;
    if !unit.is_labeled() {
        log::debug!("ignoring label removal: unit {} is not labeled", unit.text_id);
        return Ok(None);
    }

    let mut next = sequence.to_vec();
    next[index] = SequenceUnit::unlabeled(ids.generate(), unit.text.clone());
    Ok(Some(next))
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::model::{Label, TextId};
    use proptest::prelude::*;

    proptest! {
        /// The merged unit's text is the in-order concatenation of the range
        #[test]
        fn merge_preserves_text(
            words in proptest::collection::vec("[a-z ]{1,6}", 1..12),
            a in 0usize..12,
            b in 0usize..12,
        ) {
            let seq: Vec<SequenceUnit> = words
                .iter()
                .enumerate()
                .map(|(i, w)| SequenceUnit::unlabeled(TextId::new(format!("t{}", i)), w.as_str()))
                .collect();
            let range = HighlightRange::new(a % seq.len(), b % seq.len());
            let colors = ColorLabelMap::new(&[Label::new("X")], &[]);

            let labeled = apply_label(&seq, range, &"X".into(), &colors).unwrap().unwrap();
            let expected: String = words[range.indices()].concat();
            prop_assert_eq!(&labeled.unit.text, &expected);

            let before: String = words.concat();
            let after: String = labeled.sequence.iter().map(|u| u.text.as_str()).collect();
            prop_assert_eq!(after, before);
        }
    }
}
