use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::{AnnotatorConfig, AnnotatorInput};
use crate::error::{Error, Result};
use crate::identity::IdAssigner;
use crate::labeling::{apply_label, remove_label};
use crate::model::{sequence_text, ColorLabelMap, Label, LabelId, Relationship, SequenceUnit, TextId};
use crate::reconcile::{Reconciler, Source};
use crate::relations::{begin_pair, commit_label, complete_pair, prune_against};
use crate::selection::{Mode, SelectionState};

/// A user intent, dispatched through [`Annotator::dispatch`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Intent {
    /// Highlight units `from..=to` for labeling
    HighlightRange { from: usize, to: usize },
    ClearSelection,
    /// Label the highlight (entity mode) or the pending relationship
    /// (relationship mode)
    SelectLabel { label: LabelId },
    SetMode { mode: Mode },
    ToggleMode,
    BeginPair {
        #[serde(rename = "textId")]
        text_id: TextId,
    },
    CompletePair {
        #[serde(rename = "textId")]
        text_id: TextId,
    },
    RemoveLabel { index: usize },
    RemoveRelationship { index: usize },
    /// The host supplies a new document or pre-segmented sequence
    ReplaceSource { source: Source },
}

impl Intent {
    /// Host-driven intents still apply in overview mode
    fn is_user_edit(&self) -> bool {
        !matches!(self, Intent::ReplaceSource { .. })
    }
}

/// Snapshot handed to the host after a committed mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Change {
    pub sequence: Vec<SequenceUnit>,
    pub relationships: Vec<Relationship>,
}

/// Outcome of a dispatched intent
#[derive(Debug, Clone)]
pub struct Transition {
    pub annotator: Annotator,
    /// Set when the intent committed a change the host should persist
    pub change: Option<Change>,
}

/// Annotation state for one document session.
///
/// An `Annotator` is never mutated in place: [`dispatch`](Self::dispatch)
/// returns the next state and leaves `self` untouched, so hosts can keep
/// and compare earlier snapshots.
#[derive(Debug, Clone)]
pub struct Annotator {
    config: Arc<AnnotatorConfig>,
    colors: Arc<ColorLabelMap>,
    ids: IdAssigner,
    sequence: Vec<SequenceUnit>,
    relationships: Vec<Relationship>,
    selection: SelectionState,
    /// Relationship awaiting a label, shown only in relationship mode
    pending: Option<Relationship>,
}

impl Annotator {
    pub fn new(config: AnnotatorConfig, input: AnnotatorInput) -> Self {
        let colors = config.color_label_map();
        let mut ids = IdAssigner::new(config.id_scheme);
        let committed: Vec<Relationship> = input
            .initial_relationships
            .iter()
            .filter(|r| !r.temp)
            .cloned()
            .collect();

        let sequence = Reconciler::new(&config.separator, &colors).reconcile(
            &input.source(),
            &[],
            &committed,
            &mut ids,
        );
        let relationships = prune_against(&committed, &sequence);
        let mode = if config.entity_labels.is_empty() && !config.relationship_labels.is_empty() {
            Mode::Relationships
        } else {
            Mode::Entities
        };

        log::info!(
            "session started: {} unit(s), {} relationship(s)",
            sequence.len(),
            relationships.len()
        );

        Self {
            config: Arc::new(config),
            colors: Arc::new(colors),
            ids,
            sequence,
            relationships,
            selection: SelectionState::new(mode),
            pending: None,
        }
    }

    pub fn from_document(config: AnnotatorConfig, text: impl Into<String>) -> Self {
        Self::new(config, AnnotatorInput::document(text))
    }

    pub fn config(&self) -> &AnnotatorConfig {
        &self.config
    }

    pub fn colors(&self) -> &ColorLabelMap {
        &self.colors
    }

    pub fn sequence(&self) -> &[SequenceUnit] {
        &self.sequence
    }

    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn mode(&self) -> Mode {
        self.selection.mode()
    }

    pub fn pending_relationship(&self) -> Option<&Relationship> {
        self.pending.as_ref()
    }

    /// Full document text as currently segmented
    pub fn text(&self) -> String {
        sequence_text(&self.sequence)
    }

    pub fn unit(&self, id: &TextId) -> Option<&SequenceUnit> {
        self.sequence.iter().find(|u| &u.text_id == id)
    }

    pub fn index_of(&self, id: &TextId) -> Option<usize> {
        self.sequence.iter().position(|u| &u.text_id == id)
    }

    /// Labels offered by the picker in the current mode
    pub fn active_labels(&self) -> &[Label] {
        match self.mode() {
            Mode::Entities => &self.config.entity_labels,
            Mode::Relationships => &self.config.relationship_labels,
        }
    }

    /// Committed relationships plus the pending one while drawing
    pub fn display_relationships(&self) -> Vec<Relationship> {
        let mut shown = self.relationships.clone();
        if self.mode() == Mode::Relationships {
            shown.extend(self.pending.iter().cloned());
        }
        shown
    }

    /// Committed relationships with both endpoint units resolved
    pub fn relationship_endpoints(&self) -> Vec<(&SequenceUnit, &Relationship, &SequenceUnit)> {
        self.relationships
            .iter()
            .filter_map(|r| Some((self.unit(&r.from)?, r, self.unit(&r.to)?)))
            .collect()
    }

    /// The outbound `{sequence, relationships}` view
    pub fn snapshot(&self) -> Change {
        Change {
            sequence: self.sequence.clone(),
            relationships: prune_against(&self.relationships, &self.sequence),
        }
    }

    /// Apply one intent and return the resulting state.
    ///
    /// Intents that do not apply (stale indices aside) return an unchanged
    /// state with no change; out-of-range indices and unknown labels are
    /// reported as errors.
    pub fn dispatch(&self, intent: Intent) -> Result<Transition> {
        if self.config.overview_mode && intent.is_user_edit() {
            log::debug!("ignoring {:?} in overview mode", intent);
            return Ok(self.unchanged());
        }

        let mut next = self.clone();
        let committed = match intent {
            Intent::HighlightRange { from, to } => {
                next.selection = self.selection.highlight_range(&self.sequence, from, to)?;
                false
            }
            Intent::ClearSelection => {
                next.selection = self.selection.clear();
                false
            }
            Intent::SelectLabel { label } => match self.mode() {
                Mode::Entities => next.label_highlight(&label)?,
                Mode::Relationships => next.label_pending(&label)?,
            },
            Intent::SetMode { mode } => {
                next.switch_mode(mode);
                false
            }
            Intent::ToggleMode => {
                next.switch_mode(self.mode().toggled());
                false
            }
            Intent::BeginPair { text_id } => {
                if let Some(unit) = self.known_unit(&text_id) {
                    next.selection = begin_pair(&self.selection, unit, self.config.constraint_relationships);
                    if next.selection != self.selection {
                        next.pending = None;
                    }
                }
                false
            }
            Intent::CompletePair { text_id } => {
                if let Some(unit) = self.known_unit(&text_id) {
                    let (selection, pending) =
                        complete_pair(&self.selection, unit, self.config.constraint_relationships);
                    next.selection = selection;
                    if pending.is_some() {
                        next.pending = pending;
                    }
                }
                false
            }
            Intent::RemoveLabel { index } => {
                match remove_label(&self.sequence, index, &mut next.ids)? {
                    Some(sequence) => {
                        next.replace_sequence(sequence);
                        true
                    }
                    None => false,
                }
            }
            Intent::RemoveRelationship { index } => {
                if index >= self.relationships.len() {
                    return Err(Error::out_of_bounds(index, self.relationships.len()));
                }
                next.relationships.remove(index);
                true
            }
            Intent::ReplaceSource { source } => {
                let sequence = Reconciler::new(&self.config.separator, &self.colors).reconcile(
                    &source,
                    &self.sequence,
                    &self.relationships,
                    &mut next.ids,
                );
                next.replace_sequence(sequence);
                true
            }
        };

        let change = committed.then(|| {
            log::info!(
                "committed: {} unit(s), {} relationship(s)",
                next.sequence.len(),
                next.relationships.len()
            );
            next.snapshot()
        });
        Ok(Transition {
            annotator: next,
            change,
        })
    }

    fn unchanged(&self) -> Transition {
        Transition {
            annotator: self.clone(),
            change: None,
        }
    }

    fn known_unit(&self, id: &TextId) -> Option<&SequenceUnit> {
        let unit = self.unit(id);
        if unit.is_none() {
            log::debug!("ignoring stale unit id {}", id);
        }
        unit
    }

    fn require_label(catalog: &[Label], label: &LabelId) -> Result<()> {
        if catalog.iter().any(|l| &l.id == label) {
            Ok(())
        } else {
            Err(Error::unknown_label(label.as_str()))
        }
    }

    fn label_highlight(&mut self, label: &LabelId) -> Result<bool> {
        let Some(range) = self.selection.highlighted() else {
            log::debug!("ignoring label {}: nothing highlighted", label);
            return Ok(false);
        };
        Self::require_label(&self.config.entity_labels, label)?;

        match apply_label(&self.sequence, range, label, &self.colors)? {
            Some(labeled) => {
                log::debug!("labeled {} as {}", labeled.unit.text_id, label);
                self.replace_sequence(labeled.sequence);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn label_pending(&mut self, label: &LabelId) -> Result<bool> {
        let Some(pending) = self.pending.as_ref() else {
            log::debug!("ignoring label {}: no relationship pending", label);
            return Ok(false);
        };
        Self::require_label(&self.config.relationship_labels, label)?;

        let relationship = commit_label(pending, label, &self.colors)?;
        self.relationships.push(relationship);
        self.pending = None;
        Ok(true)
    }

    fn switch_mode(&mut self, mode: Mode) {
        if mode != self.mode() {
            log::debug!("switching to {} mode", mode.as_str());
        }
        self.selection = self.selection.with_mode(mode);
        self.pending = None;
    }

    /// Install a new sequence and drop everything that pointed into the
    /// old one
    fn replace_sequence(&mut self, sequence: Vec<SequenceUnit>) {
        self.relationships = prune_against(&self.relationships, &sequence);
        self.sequence = sequence;
        self.selection = self.selection.clear();
        self.pending = None;
    }
}
