use spanlink_core::SequenceUnit;

/// Cursor over sequence units.
///
/// Whitespace-only units are stepped over so the cursor always rests on
/// something that can be labeled or linked. Line movement treats any unit
/// containing a newline as a line break.
#[derive(Debug, Clone, Default)]
pub struct UnitCursor {
    pub index: usize,
    /// Index of the first unit on each line
    line_starts: Vec<usize>,
    /// Whether each unit can hold the cursor
    stops: Vec<bool>,
}

impl UnitCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute line layout after the sequence changed, keeping the
    /// cursor as close to its old index as possible
    pub fn set_sequence(&mut self, sequence: &[SequenceUnit]) {
        self.stops = sequence.iter().map(|u| !u.is_space()).collect();
        self.line_starts.clear();
        self.line_starts.push(0);
        for (i, unit) in sequence.iter().enumerate() {
            if unit.text.contains('\n') && i + 1 < sequence.len() {
                self.line_starts.push(i + 1);
            }
        }

        self.index = self.index.min(sequence.len().saturating_sub(1));
        if !self.is_stop(self.index) {
            self.index = self
                .next_stop(self.index)
                .or_else(|| self.prev_stop(self.index))
                .unwrap_or(0);
        }
    }

    /// Line the cursor is on
    pub fn line(&self) -> usize {
        self.line_of(self.index)
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    fn line_of(&self, index: usize) -> usize {
        self.line_starts
            .iter()
            .rposition(|&start| start <= index)
            .unwrap_or(0)
    }

    fn is_stop(&self, index: usize) -> bool {
        self.stops.get(index).copied().unwrap_or(false)
    }

    fn next_stop(&self, from: usize) -> Option<usize> {
        (from + 1..self.stops.len()).find(|&i| self.stops[i])
    }

    fn prev_stop(&self, from: usize) -> Option<usize> {
        (0..from).rev().find(|&i| self.stops[i])
    }

    fn first_stop_from(&self, from: usize) -> Option<usize> {
        if self.is_stop(from) {
            Some(from)
        } else {
            self.next_stop(from)
        }
    }

    // Cursor movement methods

    pub fn move_left(&mut self) {
        if let Some(i) = self.prev_stop(self.index) {
            self.index = i;
        }
    }

    pub fn move_right(&mut self) {
        if let Some(i) = self.next_stop(self.index) {
            self.index = i;
        }
    }

    pub fn move_up(&mut self) {
        let line = self.line();
        if line > 0 {
            let target = self.line_starts[line - 1];
            if let Some(i) = self.first_stop_from(target).filter(|&i| i < self.line_starts[line]) {
                self.index = i;
            }
        }
    }

    pub fn move_down(&mut self) {
        let line = self.line();
        if let Some(&target) = self.line_starts.get(line + 1) {
            if let Some(i) = self.first_stop_from(target) {
                self.index = i;
            }
        }
    }

    pub fn move_to_top(&mut self) {
        if let Some(i) = self.first_stop_from(0) {
            self.index = i;
        }
    }

    pub fn move_to_bottom(&mut self) {
        if let Some(i) = self.prev_stop(self.stops.len()) {
            self.index = i;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spanlink_core::{segment, IdAssigner, IdScheme, Separator};

    fn units(text: &str) -> Vec<SequenceUnit> {
        let mut ids = IdAssigner::new(IdScheme::Sequential);
        ids.assign_all(segment(text, &Separator::default()), &Default::default())
    }

    #[test]
    fn test_cursor_skips_whitespace() {
        let mut cursor = UnitCursor::new();
        cursor.set_sequence(&units(" Hello world"));
        assert_eq!(cursor.index, 1);

        cursor.move_right();
        assert_eq!(cursor.index, 3);
        cursor.move_right();
        assert_eq!(cursor.index, 3);

        cursor.move_left();
        assert_eq!(cursor.index, 1);
        cursor.move_left();
        assert_eq!(cursor.index, 1);
    }

    #[test]
    fn test_line_movement() {
        // Hello, "\n", World, " ", again, "\n", Test
        let seq = units("Hello\nWorld again\nTest");
        let mut cursor = UnitCursor::new();
        cursor.set_sequence(&seq);
        assert_eq!(cursor.line_count(), 3);

        cursor.move_down();
        assert_eq!(cursor.index, 2);
        assert_eq!(cursor.line(), 1);

        cursor.move_right();
        cursor.move_down();
        assert_eq!(cursor.index, 6);

        cursor.move_up();
        assert_eq!(cursor.index, 2);

        cursor.move_to_bottom();
        assert_eq!(cursor.index, 6);
        cursor.move_to_top();
        assert_eq!(cursor.index, 0);
    }

    #[test]
    fn test_set_sequence_clamps() {
        let mut cursor = UnitCursor::new();
        cursor.set_sequence(&units("a b c"));
        cursor.move_to_bottom();
        assert_eq!(cursor.index, 4);

        cursor.set_sequence(&units("a b"));
        assert_eq!(cursor.index, 2);
    }
}
