use std::path::PathBuf;

use spanlink_core::{Annotator, Intent, Label, Mode, Relationship, SequenceUnit, Source, Transition};

use crate::cursor::UnitCursor;

/// Host interaction mode, independent of the engine's entity/relationship mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Normal,
    /// Extending a highlight from `anchor` to the cursor
    Visual,
    Help,
}

/// Focus area
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Editor,
    Sidebar,
}

/// Terminal host state wrapped around the engine
pub struct App {
    pub annotator: Annotator,
    pub cursor: UnitCursor,
    pub view: View,
    pub focus: Focus,
    pub running: bool,

    /// Where a visual highlight started
    pub anchor: Option<usize>,

    // Sidebar state
    pub sidebar_selected: usize,

    /// File the document was loaded from, for reloads
    pub source_path: Option<PathBuf>,
    /// Committed changes not yet exported
    pub dirty: bool,

    // Status message
    pub status_message: Option<String>,
}

impl App {
    pub fn new(annotator: Annotator) -> Self {
        let mut cursor = UnitCursor::new();
        cursor.set_sequence(annotator.sequence());
        Self {
            annotator,
            cursor,
            view: View::Normal,
            focus: Focus::Editor,
            running: true,
            anchor: None,
            sidebar_selected: 0,
            source_path: None,
            dirty: false,
            status_message: None,
        }
    }

    /// Send an intent to the engine and adopt the resulting state
    pub fn dispatch(&mut self, intent: Intent) -> bool {
        match self.annotator.dispatch(intent) {
            Ok(Transition { annotator, change }) => {
                self.annotator = annotator;
                self.cursor.set_sequence(self.annotator.sequence());
                self.clamp_sidebar();
                if change.is_some() {
                    self.dirty = true;
                }
                change.is_some()
            }
            Err(e) => {
                log::warn!("intent rejected: {}", e);
                self.set_status(&format!("Error: {}", e));
                false
            }
        }
    }

    pub fn mode(&self) -> Mode {
        self.annotator.mode()
    }

    pub fn current_unit(&self) -> Option<&SequenceUnit> {
        self.annotator.sequence().get(self.cursor.index)
    }

    // Cursor movement methods
    pub fn move_up(&mut self) {
        self.cursor.move_up();
        self.update_selection();
    }

    pub fn move_down(&mut self) {
        self.cursor.move_down();
        self.update_selection();
    }

    pub fn move_left(&mut self) {
        self.cursor.move_left();
        self.update_selection();
    }

    pub fn move_right(&mut self) {
        self.cursor.move_right();
        self.update_selection();
    }

    pub fn move_to_top(&mut self) {
        self.cursor.move_to_top();
        self.update_selection();
    }

    pub fn move_to_bottom(&mut self) {
        self.cursor.move_to_bottom();
        self.update_selection();
    }

    /// Enter visual mode and highlight the unit under the cursor
    pub fn enter_visual_mode(&mut self) {
        if self.mode() != Mode::Entities {
            self.set_status("Switch to entity mode (Tab) to highlight");
            return;
        }
        if self.current_unit().is_some_and(|u| u.is_labeled()) {
            self.set_status("Already labeled; press x to remove the label");
            return;
        }
        self.anchor = Some(self.cursor.index);
        self.view = View::Visual;
        self.update_selection();
    }

    pub fn exit_visual_mode(&mut self) {
        self.anchor = None;
        self.view = View::Normal;
        self.dispatch(Intent::ClearSelection);
    }

    /// Extend the highlight to the cursor while in visual mode
    pub fn update_selection(&mut self) {
        if let (View::Visual, Some(anchor)) = (self.view, self.anchor) {
            self.dispatch(Intent::HighlightRange {
                from: anchor,
                to: self.cursor.index,
            });
        }
    }

    /// Pick the `n`th label (1-based) of the active catalog
    pub fn pick_label(&mut self, n: usize) {
        let Some(label) = self.active_labels().get(n.wrapping_sub(1)).cloned() else {
            return;
        };
        if self.dispatch(Intent::SelectLabel { label: label.id.clone() }) {
            self.set_status(&format!("Labeled {}", label.id));
        }
        self.anchor = None;
        self.view = View::Normal;
    }

    pub fn active_labels(&self) -> &[Label] {
        self.annotator.active_labels()
    }

    pub fn toggle_mode(&mut self) {
        self.anchor = None;
        self.view = View::Normal;
        self.dispatch(Intent::ToggleMode);
        self.set_status(&format!("{} mode", self.mode().as_str()));
    }

    /// Start or finish a relationship at the cursor
    pub fn pair_at_cursor(&mut self) {
        if self.mode() != Mode::Relationships {
            self.set_status("Switch to relationship mode (Tab) to link spans");
            return;
        }
        let Some(id) = self.current_unit().map(|u| u.text_id.clone()) else {
            return;
        };

        if self.annotator.selection().pending_first().is_some() {
            self.dispatch(Intent::CompletePair { text_id: id });
            if self.annotator.pending_relationship().is_some() {
                self.set_status("Pick a relationship label (1-9)");
            }
        } else {
            self.dispatch(Intent::BeginPair { text_id: id });
            if self.annotator.selection().pending_first().is_some() {
                self.set_status("Move to the target span and press Enter");
            } else if self.annotator.config().constraint_relationships {
                self.set_status("Relationships need labeled spans");
            }
        }
    }

    pub fn remove_label_at_cursor(&mut self) {
        if self.dispatch(Intent::RemoveLabel {
            index: self.cursor.index,
        }) {
            self.set_status("Label removed");
        }
    }

    /// Relationships shown in the sidebar, pending one last.
    ///
    /// Only the committed rows are selectable: `sidebar_selected` indexes
    /// `relationships()`, which is what `RemoveRelationship` addresses, so
    /// the trailing pending row can never be selected or deleted.
    pub fn sidebar_relationships(&self) -> Vec<Relationship> {
        self.annotator.display_relationships()
    }

    /// Cycle over committed relationships; the pending row is skipped
    pub fn next_relationship(&mut self) {
        let count = self.annotator.relationships().len();
        if count > 0 {
            self.sidebar_selected = (self.sidebar_selected + 1) % count;
        }
    }

    pub fn prev_relationship(&mut self) {
        let count = self.annotator.relationships().len();
        if count > 0 {
            self.sidebar_selected = if self.sidebar_selected == 0 {
                count - 1
            } else {
                self.sidebar_selected - 1
            };
        }
    }

    /// Delete selected relationship
    pub fn delete_selected_relationship(&mut self) -> bool {
        if self.annotator.relationships().is_empty() {
            return false;
        }
        let removed = self.dispatch(Intent::RemoveRelationship {
            index: self.sidebar_selected,
        });
        if removed {
            self.set_status("Relationship deleted");
        }
        removed
    }

    /// Feed new document text through reconciliation
    pub fn replace_document(&mut self, text: String) {
        self.anchor = None;
        self.view = View::Normal;
        if self.dispatch(Intent::ReplaceSource {
            source: Source::Document(text),
        }) {
            self.set_status("Document reloaded; annotations kept");
        }
    }

    fn clamp_sidebar(&mut self) {
        let count = self.annotator.relationships().len();
        if self.sidebar_selected >= count {
            self.sidebar_selected = count.saturating_sub(1);
        }
    }

    /// Set status message
    pub fn set_status(&mut self, msg: &str) {
        self.status_message = Some(msg.to_string());
    }

    /// Clear status message
    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    /// Toggle focus between editor and sidebar
    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Editor => Focus::Sidebar,
            Focus::Sidebar => Focus::Editor,
        };
    }

    /// Get title for display
    pub fn title(&self) -> String {
        self.source_path
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "Untitled".to_string())
    }
}
