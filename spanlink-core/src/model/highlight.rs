use serde::{Deserialize, Serialize};

/// Inclusive range of sequence indices
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HighlightRange {
    pub start_index: usize,
    pub end_index: usize,
}

impl HighlightRange {
    pub fn new(from: usize, to: usize) -> Self {
        Self {
            start_index: from.min(to),
            end_index: from.max(to),
        }
    }

    /// Check if this range contains the given index
    pub fn contains(&self, index: usize) -> bool {
        index >= self.start_index && index <= self.end_index
    }

    pub fn len(&self) -> usize {
        self.end_index - self.start_index + 1
    }

    pub fn indices(&self) -> std::ops::RangeInclusive<usize> {
        self.start_index..=self.end_index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_normalizes() {
        let range = HighlightRange::new(4, 1);
        assert_eq!(range.start_index, 1);
        assert_eq!(range.end_index, 4);
        assert_eq!(range.len(), 4);
        assert!(range.contains(4));
        assert!(!range.contains(5));
    }
}
