use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::annotator::Annotator;
use crate::config::AnnotatorInput;
use crate::error::Result;
use crate::model::{Relationship, SequenceUnit, UnitDraft};

/// Saved annotation session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionExport {
    pub exported_at: DateTime<Utc>,
    pub text: String,
    pub sequence: Vec<SequenceUnit>,
    pub relationships: Vec<Relationship>,
}

impl From<&Annotator> for SessionExport {
    fn from(annotator: &Annotator) -> Self {
        let snapshot = annotator.snapshot();
        Self {
            exported_at: Utc::now(),
            text: annotator.text(),
            sequence: snapshot.sequence,
            relationships: snapshot.relationships,
        }
    }
}

impl SessionExport {
    /// Resume the session: the saved sequence is fed back as
    /// pre-segmented input so labeled and related units keep their ids.
    pub fn into_input(self) -> AnnotatorInput {
        AnnotatorInput {
            document: Some(self.text),
            initial_sequence: Some(self.sequence.into_iter().map(UnitDraft::from).collect()),
            initial_relationships: self.relationships,
        }
    }
}

pub fn to_json(annotator: &Annotator) -> Result<String> {
    Ok(serde_json::to_string_pretty(&SessionExport::from(annotator))?)
}

pub fn from_json(json: &str) -> Result<SessionExport> {
    Ok(serde_json::from_str(json)?)
}

/// One line per relationship, e.g. `"John" -[MET]-> "Mary"`
pub fn describe_relationships(annotator: &Annotator) -> Vec<String> {
    annotator
        .relationship_endpoints()
        .into_iter()
        .map(|(from, rel, to)| format!("{:?} -[{}]-> {:?}", from.text, rel.label, to.text))
        .collect()
}
