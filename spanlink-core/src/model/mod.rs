pub mod highlight;
pub mod label;
pub mod relationship;
pub mod unit;

pub use highlight::HighlightRange;
pub use label::{Color, ColorLabelMap, Label, LabelId, FALLBACK_COLOR, PALETTE};
pub use relationship::{Relationship, PENDING_COLOR, PENDING_LABEL};
pub use unit::{sequence_text, SequenceUnit, TextId, UnitDraft};
