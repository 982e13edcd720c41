use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::identity::IdScheme;
use crate::model::{ColorLabelMap, Label, Relationship, UnitDraft};
use crate::reconcile::Source;
use crate::segment::Separator;

/// Settings for one annotation session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnnotatorConfig {
    pub separator: Separator,
    pub entity_labels: Vec<Label>,
    pub relationship_labels: Vec<Label>,
    /// Read-only display; every user intent is ignored
    pub overview_mode: bool,
    /// Relationships may only connect labeled units
    pub constraint_relationships: bool,
    pub id_scheme: IdScheme,
}

impl AnnotatorConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn color_label_map(&self) -> ColorLabelMap {
        ColorLabelMap::new(&self.entity_labels, &self.relationship_labels)
    }
}

/// Initial content of a session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotatorInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document: Option<String>,
    /// Takes precedence over `document` when both are given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_sequence: Option<Vec<UnitDraft>>,
    #[serde(default)]
    pub initial_relationships: Vec<Relationship>,
}

impl AnnotatorInput {
    pub fn document(text: impl Into<String>) -> Self {
        Self {
            document: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn source(&self) -> Source {
        match (&self.initial_sequence, &self.document) {
            (Some(sequence), _) => Source::Sequence(sequence.clone()),
            (None, Some(text)) => Source::Document(text.clone()),
            (None, None) => Source::Document(String::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_json_defaults() {
        let config = AnnotatorConfig::from_json(
            r##"{
                "entityLabels": [{"id": "PERSON"}, {"id": "ORG", "color": "#00ff00"}],
                "relationshipLabels": [{"id": "WORKS_AT"}],
                "constraintRelationships": true,
                "idScheme": "sequential"
            }"##,
        )
        .unwrap();

        assert_eq!(config.separator, Separator::default());
        assert!(!config.overview_mode);
        assert!(config.constraint_relationships);
        assert_eq!(config.id_scheme, IdScheme::Sequential);
        assert_eq!(config.entity_labels.len(), 2);
        assert!(config.color_label_map().contains(&"WORKS_AT".into()));
    }

    #[test]
    fn test_config_rejects_bad_separator() {
        assert!(AnnotatorConfig::from_json(r#"{"separator": "(("}"#).is_err());
    }

    #[test]
    fn test_input_prefers_sequence() {
        let input: AnnotatorInput = serde_json::from_str(
            r#"{"document": "ignored", "initialSequence": [{"text": "kept", "label": "X"}]}"#,
        )
        .unwrap();
        match input.source() {
            Source::Sequence(drafts) => assert_eq!(drafts[0].text, "kept"),
            other => panic!("unexpected source {:?}", other),
        }
        assert_eq!(AnnotatorInput::default().source(), Source::Document(String::new()));
    }
}
