//! Identifier assignment for sequence units.
//!
//! Two schemes are available:
//!
//! - [`IdScheme::Random`] draws a v4 UUID (122 random bits). Among `n`
//!   generated ids the chance of any collision is roughly `n² / 2¹²³`,
//!   about 10⁻²⁵ for a million units, so uniqueness is assumed rather
//!   than checked.
//! - [`IdScheme::Sequential`] counts up from `u0` within the session and
//!   skips past any `u<n>` id it has seen on incoming units, so it never
//!   collides with ids it has been shown. Once the counter is exhausted it
//!   falls back to random ids, whose hex form never carries the `u` prefix.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{ColorLabelMap, SequenceUnit, TextId, UnitDraft};

const SEQUENTIAL_PREFIX: &str = "u";

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IdScheme {
    #[default]
    Random,
    Sequential,
}

/// Session-scoped id generator
#[derive(Debug, Clone)]
pub struct IdAssigner {
    scheme: IdScheme,
    /// Next sequential number; `None` once `u64::MAX` has been used
    next: Option<u64>,
}

impl IdAssigner {
    pub fn new(scheme: IdScheme) -> Self {
        Self { scheme, next: Some(0) }
    }

    pub fn scheme(&self) -> IdScheme {
        self.scheme
    }

    /// Produce an id not handed out before
    pub fn generate(&mut self) -> TextId {
        match (self.scheme, self.next) {
            (IdScheme::Sequential, Some(n)) => {
                self.next = n.checked_add(1);
                TextId::new(format!("{}{}", SEQUENTIAL_PREFIX, n))
            }
            _ => TextId::new(Uuid::new_v4().simple().to_string()),
        }
    }

    /// Record an id that arrived from outside so sequential ids skip it
    pub fn observe(&mut self, id: &TextId) {
        if self.scheme != IdScheme::Sequential {
            return;
        }
        let n = id
            .as_str()
            .strip_prefix(SEQUENTIAL_PREFIX)
            .and_then(|rest| rest.parse::<u64>().ok());
        if let (Some(n), Some(next)) = (n, self.next) {
            if n >= next {
                self.next = n.checked_add(1);
            }
        }
    }

    /// Attach a fresh id if the draft has none. Idempotent.
    pub fn ensure_id(&mut self, mut draft: UnitDraft) -> UnitDraft {
        match &draft.text_id {
            Some(id) => self.observe(id),
            None => draft.text_id = Some(self.generate()),
        }
        draft
    }

    /// Turn a draft into a unit, assigning an id and resolving the colour
    /// of a labeled draft that did not bring its own.
    pub fn assign(&mut self, draft: UnitDraft, colors: &ColorLabelMap) -> SequenceUnit {
        let text_id = match draft.text_id {
            Some(id) => {
                self.observe(&id);
                id
            }
            None => self.generate(),
        };
        match draft.label {
            Some(label) => {
                let color = draft.color.unwrap_or_else(|| colors.color_for(&label));
                SequenceUnit::labeled(text_id, draft.text, label, color)
            }
            None => SequenceUnit::unlabeled(text_id, draft.text),
        }
    }

    pub fn assign_all(
        &mut self,
        drafts: impl IntoIterator<Item = UnitDraft>,
        colors: &ColorLabelMap,
    ) -> Vec<SequenceUnit> {
        drafts
            .into_iter()
            .map(|draft| self.assign(draft, colors))
            .collect()
    }
}

impl Default for IdAssigner {
    fn default() -> Self {
        Self::new(IdScheme::default())
    }
}
