use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of an entity or relationship label
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelId(String);

impl LabelId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LabelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LabelId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A CSS-style colour string such as `#f44336`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(String);

impl Color {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse `#rgb` or `#rrggbb` into components
    pub fn to_rgb(&self) -> Option<(u8, u8, u8)> {
        let hex = self.0.strip_prefix('#').filter(|h| h.is_ascii())?;
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match hex.len() {
            3 => {
                let mut it = hex.chars().map(|c| {
                    let v = c.to_digit(16)? as u8;
                    Some(v * 16 + v)
                });
                Some((it.next()??, it.next()??, it.next()??))
            }
            6 => Some((channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?)),
            _ => None,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Material 500 shades, assigned to labels without an explicit colour
pub const PALETTE: [&str; 19] = [
    "#f44336", // red
    "#e91e63", // pink
    "#9c27b0", // purple
    "#673ab7", // deep purple
    "#3f51b5", // indigo
    "#2196f3", // blue
    "#03a9f4", // light blue
    "#00bcd4", // cyan
    "#009688", // teal
    "#4caf50", // green
    "#8bc34a", // light green
    "#cddc39", // lime
    "#ffeb3b", // yellow
    "#ffc107", // amber
    "#ff9800", // orange
    "#ff5722", // deep orange
    "#795548", // brown
    "#9e9e9e", // grey
    "#607d8b", // blue grey
];

/// Colour for labels that appear in neither catalog
pub const FALLBACK_COLOR: &str = "#333333";

/// A label offered to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub id: LabelId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
}

impl Label {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: LabelId::new(id),
            color: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(Color::new(color));
        self
    }
}

/// Colour of every known label id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorLabelMap {
    colors: HashMap<LabelId, Color>,
}

impl ColorLabelMap {
    /// Build over `entity_labels ++ relationship_labels`; position `i` in
    /// the concatenation picks `PALETTE[i % PALETTE.len()]` when the label
    /// has no colour of its own. A later duplicate id wins.
    pub fn new(entity_labels: &[Label], relationship_labels: &[Label]) -> Self {
        let colors = entity_labels
            .iter()
            .chain(relationship_labels)
            .enumerate()
            .map(|(i, label)| {
                let color = label
                    .color
                    .clone()
                    .unwrap_or_else(|| Color::new(PALETTE[i % PALETTE.len()]));
                (label.id.clone(), color)
            })
            .collect();
        Self { colors }
    }

    pub fn get(&self, label: &LabelId) -> Option<&Color> {
        self.colors.get(label)
    }

    /// Colour for `label`, or [`FALLBACK_COLOR`] when it is not catalogued
    pub fn color_for(&self, label: &LabelId) -> Color {
        self.get(label)
            .cloned()
            .unwrap_or_else(|| Color::new(FALLBACK_COLOR))
    }

    pub fn contains(&self, label: &LabelId) -> bool {
        self.colors.contains_key(label)
    }
}
