//! Splitting raw text into addressable units.
//!
//! Every separator match becomes a unit of its own, as does every run of
//! text between matches, so whitespace and newlines stay addressable and
//! concatenating the units reproduces the input exactly. Empty pieces are
//! never emitted; a separator that can match the empty string therefore
//! acts as a pure split point.

use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::UnitDraft;

/// Separator used when none is configured
pub const DEFAULT_SEPARATOR: &str = r"\s+";

/// Compiled separator pattern
#[derive(Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Separator {
    regex: Regex,
}

impl Separator {
    pub fn new(pattern: &str) -> Result<Self> {
        Ok(Self {
            regex: Regex::new(pattern)?,
        })
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

impl Default for Separator {
    fn default() -> Self {
        Self::new(DEFAULT_SEPARATOR).expect("default separator pattern compiles")
    }
}

impl fmt::Debug for Separator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Separator").field(&self.as_str()).finish()
    }
}

impl PartialEq for Separator {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl TryFrom<String> for Separator {
    type Error = crate::Error;

    fn try_from(pattern: String) -> Result<Self> {
        Self::new(&pattern)
    }
}

impl From<Separator> for String {
    fn from(separator: Separator) -> Self {
        separator.as_str().to_string()
    }
}

/// Split `text` into unlabeled, unidentified units
pub fn segment(text: &str, separator: &Separator) -> Vec<UnitDraft> {
    let mut units = Vec::new();
    let mut last = 0;

    for m in separator.regex.find_iter(text) {
        if m.start() > last {
            units.push(UnitDraft::new(&text[last..m.start()]));
        }
        if !m.is_empty() {
            units.push(UnitDraft::new(m.as_str()));
        }
        last = m.end();
    }

    if last < text.len() {
        units.push(UnitDraft::new(&text[last..]));
    }

    units
}
