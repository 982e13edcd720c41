use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Color, LabelId};

/// Stable identifier of a sequence unit within one document session
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TextId(String);

impl TextId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TextId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// One addressable span of document text.
///
/// `label` and `color` are either both set (a labeled span) or both unset.
/// Use [`SequenceUnit::labeled`] and [`SequenceUnit::unlabeled`] to keep
/// that pairing intact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SequenceUnit {
    pub text_id: TextId,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<LabelId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
}

impl SequenceUnit {
    pub fn unlabeled(text_id: TextId, text: impl Into<String>) -> Self {
        Self {
            text_id,
            text: text.into(),
            label: None,
            color: None,
        }
    }

    pub fn labeled(text_id: TextId, text: impl Into<String>, label: LabelId, color: Color) -> Self {
        Self {
            text_id,
            text: text.into(),
            label: Some(label),
            color: Some(color),
        }
    }

    pub fn is_labeled(&self) -> bool {
        self.label.is_some()
    }

    /// Whitespace-only units (spaces, newlines) are never highlighted
    pub fn is_space(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// A unit that may not carry an identifier yet.
///
/// Produced by the segmenter and accepted from hosts as pre-segmented
/// input; turned into a [`SequenceUnit`] by the id assigner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitDraft {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<LabelId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_id: Option<TextId>,
}

impl UnitDraft {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}

impl From<SequenceUnit> for UnitDraft {
    fn from(unit: SequenceUnit) -> Self {
        Self {
            text: unit.text,
            label: unit.label,
            color: unit.color,
            text_id: Some(unit.text_id),
        }
    }
}

/// Concatenate the text of every unit in order
pub fn sequence_text(sequence: &[SequenceUnit]) -> String {
    sequence.iter().map(|u| u.text.as_str()).collect()
}
