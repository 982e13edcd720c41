//! Spanlink Core - Annotation state engine
//!
//! This crate segments text into addressable units, labels highlighted
//! ranges of them, and keeps a graph of typed relationships between
//! labeled spans consistent as the sequence changes. It has no rendering
//! or I/O of its own; hosts drive it through [`Annotator::dispatch`] and
//! persist the [`Change`] snapshots it returns.

pub mod annotator;
pub mod config;
pub mod error;
pub mod export;
pub mod identity;
pub mod labeling;
pub mod model;
pub mod reconcile;
pub mod relations;
pub mod segment;
pub mod selection;

pub use annotator::{Annotator, Change, Intent, Transition};
pub use config::{AnnotatorConfig, AnnotatorInput};
pub use error::{Error, Result};
pub use export::{describe_relationships, from_json, to_json, SessionExport};
pub use identity::{IdAssigner, IdScheme};
pub use model::{
    Color, ColorLabelMap, HighlightRange, Label, LabelId, Relationship, SequenceUnit, TextId, UnitDraft,
};
pub use reconcile::{Reconciler, Source};
pub use segment::{segment, Separator};
pub use selection::{Mode, Selection, SelectionState};
