use serde::{Deserialize, Serialize};

use super::{Color, LabelId, TextId};

/// Label shown on a relationship whose label has not been picked yet
pub const PENDING_LABEL: &str = "???";

/// Colour of a pending relationship
pub const PENDING_COLOR: &str = "#ff0000";

/// A directed, labeled edge between two units
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    pub from: TextId,
    pub to: TextId,
    pub label: LabelId,
    pub color: Color,
    /// Display-only relationship awaiting a label
    #[serde(default)]
    pub temp: bool,
}

impl Relationship {
    pub fn pending(from: TextId, to: TextId) -> Self {
        Self {
            from,
            to,
            label: LabelId::new(PENDING_LABEL),
            color: Color::new(PENDING_COLOR),
            temp: true,
        }
    }

    pub fn touches(&self, id: &TextId) -> bool {
        &self.from == id || &self.to == id
    }
}
