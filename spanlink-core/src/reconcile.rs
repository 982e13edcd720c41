//! Re-deriving the unit sequence from a new source without losing
//! annotation work.
//!
//! A unit is *preserved* when it carries a label or when a relationship
//! points at it. Preserved units keep their id, text and label; all other
//! text is segmented afresh.
//!
//! For a new plain-text document the old and new texts are aligned by
//! their longest common prefix and suffix, which leaves a single edited
//! window. Preserved units outside that window keep their position
//! (shifted by the length change when they sit after it). A preserved
//! unit inside the window is looked up by content, taking the occurrence
//! nearest to where the previous anchors predict it. If its text no longer
//! occurs, the unit claims the whole region it maps to and its own text
//! replaces whatever the new document has there.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::identity::IdAssigner;
use crate::model::{sequence_text, ColorLabelMap, Relationship, SequenceUnit, TextId, UnitDraft};
use crate::segment::{segment, Separator};

/// New source content supplied by the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Source {
    /// Raw document text
    Document(String),
    /// Pre-segmented units, possibly labeled and identified
    Sequence(Vec<UnitDraft>),
}

/// Ids used as an endpoint by any relationship
pub fn referenced_ids(relationships: &[Relationship]) -> HashSet<&TextId> {
    relationships
        .iter()
        .flat_map(|r| [&r.from, &r.to])
        .collect()
}

pub struct Reconciler<'a> {
    separator: &'a Separator,
    colors: &'a ColorLabelMap,
}

impl<'a> Reconciler<'a> {
    pub fn new(separator: &'a Separator, colors: &'a ColorLabelMap) -> Self {
        Self { separator, colors }
    }

    pub fn reconcile(
        &self,
        source: &Source,
        previous: &[SequenceUnit],
        relationships: &[Relationship],
        ids: &mut IdAssigner,
    ) -> Vec<SequenceUnit> {
        // Every id already in play must be known before any is generated
        for id in referenced_ids(relationships) {
            ids.observe(id);
        }
        let incoming = match source {
            Source::Document(_) => previous.iter().map(|u| &u.text_id).collect::<Vec<_>>(),
            Source::Sequence(drafts) => drafts.iter().filter_map(|d| d.text_id.as_ref()).collect(),
        };
        for id in incoming {
            ids.observe(id);
        }

        match source {
            Source::Document(text) => self.reconcile_text(text, previous, relationships, ids),
            Source::Sequence(drafts) => self.reconcile_drafts(drafts, relationships, ids),
        }
    }

    /// Keep labeled or referenced drafts whole; segment the rest.
    pub fn reconcile_drafts(
        &self,
        drafts: &[UnitDraft],
        relationships: &[Relationship],
        ids: &mut IdAssigner,
    ) -> Vec<SequenceUnit> {
        let referenced = referenced_ids(relationships);
        let mut sequence = Vec::with_capacity(drafts.len());

        for draft in drafts {
            let keep = draft.label.is_some()
                || draft
                    .text_id
                    .as_ref()
                    .is_some_and(|id| referenced.contains(id));
            if keep {
                sequence.push(ids.assign(draft.clone(), self.colors));
            } else {
                let pieces = segment(&draft.text, self.separator);
                sequence.extend(ids.assign_all(pieces, self.colors));
            }
        }

        sequence
    }

    /// Align `previous` against `new_text`, keeping preserved units.
    pub fn reconcile_text(
        &self,
        new_text: &str,
        previous: &[SequenceUnit],
        relationships: &[Relationship],
        ids: &mut IdAssigner,
    ) -> Vec<SequenceUnit> {
        let referenced = referenced_ids(relationships);
        let old_text = sequence_text(previous);
        let window = EditWindow::between(&old_text, new_text);

        let mut sequence = Vec::new();
        let mut cursor = 0;
        let mut old_offset = 0;
        // Offset of the new text relative to the old at the last placed unit
        let mut drift: isize = 0;

        for unit in previous {
            let old_start = old_offset;
            let old_end = old_start + unit.text.len();
            old_offset = old_end;

            if !(unit.is_labeled() || referenced.contains(&unit.text_id)) {
                continue;
            }

            let mapped = (window.map_start(old_start), window.map_end(old_end));
            let (start, end) = if old_end <= window.prefix || old_start >= window.old_tail {
                mapped
            } else {
                let bound = if old_end <= window.old_tail {
                    window.new_tail
                } else {
                    new_text.len()
                };
                let expected = (old_start as isize + drift).max(0) as usize;
                nearest_occurrence(new_text, &unit.text, cursor, bound, expected)
                    .map(|s| (s, s + unit.text.len()))
                    .unwrap_or(mapped)
            };
            let start = start.max(cursor);
            let end = end.max(start);

            if start > cursor {
                self.push_segmented(&mut sequence, &new_text[cursor..start], ids);
            }
            if new_text[start..end] != unit.text {
                log::debug!(
                    "preserved unit {} overrides edited text {:?}",
                    unit.text_id,
                    &new_text[start..end]
                );
            }
            sequence.push(unit.clone());
            cursor = end;
            drift = end as isize - old_end as isize;
        }

        if cursor < new_text.len() {
            self.push_segmented(&mut sequence, &new_text[cursor..], ids);
        }

        sequence
    }

    fn push_segmented(&self, sequence: &mut Vec<SequenceUnit>, text: &str, ids: &mut IdAssigner) {
        let pieces = segment(text, self.separator);
        sequence.extend(ids.assign_all(pieces, self.colors));
    }
}

/// Start of the occurrence of `needle` within `text[from..to]` closest to
/// `expected`
fn nearest_occurrence(text: &str, needle: &str, from: usize, to: usize, expected: usize) -> Option<usize> {
    if needle.is_empty() || to <= from {
        return None;
    }
    text[from..to]
        .match_indices(needle)
        .map(|(i, _)| from + i)
        .min_by_key(|&start| start.abs_diff(expected))
}

/// The single region where two texts differ, bounded by their common
/// prefix and suffix. All offsets are byte offsets on char boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct EditWindow {
    prefix: usize,
    old_tail: usize,
    new_tail: usize,
}

impl EditWindow {
    fn between(old: &str, new: &str) -> Self {
        let prefix: usize = old
            .chars()
            .zip(new.chars())
            .take_while(|(a, b)| a == b)
            .map(|(a, _)| a.len_utf8())
            .sum();
        let suffix: usize = old[prefix..]
            .chars()
            .rev()
            .zip(new[prefix..].chars().rev())
            .take_while(|(a, b)| a == b)
            .map(|(a, _)| a.len_utf8())
            .sum();

        Self {
            prefix,
            old_tail: old.len() - suffix,
            new_tail: new.len() - suffix,
        }
    }

    fn shift(&self, old: usize) -> usize {
        old - self.old_tail + self.new_tail
    }

    /// Where a unit starting at `old` starts in the new text
    fn map_start(&self, old: usize) -> usize {
        if old >= self.old_tail {
            self.shift(old)
        } else if old <= self.prefix {
            old
        } else {
            self.prefix
        }
    }

    /// Where a unit ending at `old` ends in the new text
    fn map_end(&self, old: usize) -> usize {
        if old <= self.prefix {
            old
        } else if old >= self.old_tail {
            self.shift(old)
        } else {
            self.new_tail
        }
    }
}
