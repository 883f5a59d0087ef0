//! Information-table view across both canvases.
//!
//! A canvas lists its own markings in full and one placeholder row for each
//! label that only exists on the opposite canvas, so the two tables line up
//! label by label.

use std::collections::BTreeSet;

use crate::model::{Marking, MarkingClass};

/// One row of a canvas information table.
#[derive(Debug, Clone, PartialEq)]
pub enum InfoRow<'a> {
    Marking(&'a Marking),
    /// Label present only on the opposite canvas.
    Placeholder { label: u32 },
}

impl InfoRow<'_> {
    pub fn label(&self) -> u32 {
        match self {
            InfoRow::Marking(m) => m.label,
            InfoRow::Placeholder { label } => *label,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, InfoRow::Placeholder { .. })
    }
}

/// Rows for `this` canvas merged with labels from `opposite`, sorted by label.
///
/// Measurement markings of the opposite canvas never produce placeholders.
pub fn merged_rows<'a>(this: &'a [Marking], opposite: &[Marking]) -> Vec<InfoRow<'a>> {
    let own: BTreeSet<u32> = this.iter().map(|m| m.label).collect();
    let placeholders: BTreeSet<u32> = opposite
        .iter()
        .filter(|m| m.class() != MarkingClass::Measurement && !own.contains(&m.label))
        .map(|m| m.label)
        .collect();

    let mut rows: Vec<InfoRow<'a>> = this
        .iter()
        .map(InfoRow::Marking)
        .chain(
            placeholders
                .into_iter()
                .map(|label| InfoRow::Placeholder { label }),
        )
        .collect();
    rows.sort_by_key(|row| row.label());
    rows
}
