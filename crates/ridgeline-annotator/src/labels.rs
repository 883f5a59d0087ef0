//! Marking labels.
//!
//! One generator serves both canvases, so a label never means two different
//! markings anywhere in a session.

use std::collections::HashSet;

use crate::model::Marking;

/// Monotonic label source. The first label is 1.
#[derive(Debug, Clone)]
pub struct LabelGenerator {
    next: u32,
}

impl Default for LabelGenerator {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl LabelGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the next label and advances.
    pub fn next_label(&mut self) -> u32 {
        let label = self.next;
        self.next = self.next.saturating_add(1);
        label
    }

    /// The label the next call to [`LabelGenerator::next_label`] returns.
    pub fn peek(&self) -> u32 {
        self.next
    }

    /// Makes sure future labels are greater than `label`.
    pub fn ensure_above(&mut self, label: u32) {
        if self.next <= label {
            self.next = label.saturating_add(1);
        }
    }
}

/// Labels that occur more than once, in ascending order.
pub fn duplicate_labels(markings: &[Marking]) -> Vec<u32> {
    let mut seen = HashSet::new();
    let mut duplicates: Vec<u32> = markings
        .iter()
        .filter(|m| !seen.insert(m.label))
        .map(|m| m.label)
        .collect();
    duplicates.sort_unstable();
    duplicates.dedup();
    duplicates
}
