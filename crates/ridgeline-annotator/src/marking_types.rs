//! Registry of marking types.
//!
//! Holds the operator-defined types, the type selected for new markings,
//! and the set of types hidden from rendering. Hiding is independent of
//! deletion. Removal of a type that is still in use is guarded by
//! [`crate::registry::CanvasRegistry::remove_marking_type`].

use anyhow::{Context, Result};
use ridgeline_core::{IntegrityError, WorkingMode};
use std::collections::HashSet;
use std::path::Path;

use crate::model::{measurement_tool_type, MarkingType, MarkingTypePatch, MEASUREMENT_TOOL_TYPE_ID};

#[derive(Debug, Clone, Default)]
pub struct MarkingTypes {
    types: Vec<MarkingType>,
    selected_type_id: Option<String>,
    hidden: HashSet<String>,
    measurement_type: Option<MarkingType>,
}

impl MarkingTypes {
    pub fn new() -> Self {
        Self {
            measurement_type: Some(measurement_tool_type()),
            ..Default::default()
        }
    }

    pub fn with_types(types: Vec<MarkingType>) -> Self {
        let mut registry = Self::new();
        registry.add_many(types);
        registry
    }

    pub fn all(&self) -> &[MarkingType] {
        &self.types
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn find(&self, id: &str) -> Option<&MarkingType> {
        self.types.iter().find(|t| t.id == id)
    }

    /// Type to draw a marking with. Falls back to the synthetic
    /// measurement-tool type for its reserved id.
    pub fn resolve_for_render(&self, id: &str) -> Option<&MarkingType> {
        self.find(id).or_else(|| {
            if id == MEASUREMENT_TOOL_TYPE_ID {
                self.measurement_type.as_ref()
            } else {
                None
            }
        })
    }

    /// True for registered ids and the measurement-tool id.
    pub fn is_known(&self, id: &str) -> bool {
        self.resolve_for_render(id).is_some()
    }

    pub fn for_working_mode(&self, mode: WorkingMode) -> impl Iterator<Item = &MarkingType> {
        self.types.iter().filter(move |t| t.category == mode)
    }

    /// Adds a new type; an existing id is an error.
    pub fn add(&mut self, marking_type: MarkingType) -> Result<(), IntegrityError> {
        if self.find(&marking_type.id).is_some() || marking_type.id == MEASUREMENT_TOOL_TYPE_ID {
            return Err(IntegrityError::DuplicateType {
                type_id: marking_type.id,
            });
        }
        tracing::debug!("Marking type {} ({}) added", marking_type.id, marking_type.name);
        self.types.push(marking_type);
        Ok(())
    }

    /// Adds types, replacing any existing type with the same id.
    pub fn add_many(&mut self, incoming: Vec<MarkingType>) {
        for marking_type in incoming {
            if marking_type.id == MEASUREMENT_TOOL_TYPE_ID {
                tracing::warn!("Ignoring reserved marking type id {}", MEASUREMENT_TOOL_TYPE_ID);
                continue;
            }
            match self.types.iter_mut().find(|t| t.id == marking_type.id) {
                Some(existing) => *existing = marking_type,
                None => self.types.push(marking_type),
            }
        }
    }

    /// Registered types whose id collides with one of `incoming`.
    pub fn conflicts(&self, incoming: &[MarkingType]) -> Vec<&MarkingType> {
        self.types
            .iter()
            .filter(|t| incoming.iter().any(|i| i.id == t.id))
            .collect()
    }

    pub fn update(&mut self, id: &str, patch: &MarkingTypePatch) -> Result<(), IntegrityError> {
        let marking_type = self
            .types
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| IntegrityError::MissingType {
                type_id: id.to_string(),
            })?;
        marking_type.apply(patch);
        Ok(())
    }

    /// Removes a type without checking usage. Also drops it from the
    /// selection and the hidden set.
    pub(crate) fn remove_unchecked(&mut self, id: &str) -> Option<MarkingType> {
        let index = self.types.iter().position(|t| t.id == id)?;
        self.hidden.remove(id);
        if self.selected_type_id.as_deref() == Some(id) {
            self.selected_type_id = None;
        }
        Some(self.types.remove(index))
    }

    pub fn selected(&self) -> Option<&MarkingType> {
        self.selected_type_id.as_deref().and_then(|id| self.find(id))
    }

    /// Selects the type used for new markings. Only registered ids.
    pub fn select(&mut self, id: Option<&str>) -> Result<(), IntegrityError> {
        match id {
            Some(id) if self.find(id).is_none() => Err(IntegrityError::MissingType {
                type_id: id.to_string(),
            }),
            _ => {
                self.selected_type_id = id.map(str::to_string);
                Ok(())
            }
        }
    }

    pub fn is_hidden(&self, id: &str) -> bool {
        self.hidden.contains(id)
    }

    /// Flips visibility of a type and returns whether it is now hidden.
    pub fn toggle_hidden(&mut self, id: &str) -> bool {
        if self.hidden.remove(id) {
            false
        } else {
            self.hidden.insert(id.to_string());
            true
        }
    }

    pub fn reset_visibility(&mut self) {
        self.hidden.clear();
    }

    pub fn export_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.types).context("Failed to serialize marking types")
    }

    /// Parses a type list and merges it with [`MarkingTypes::add_many`].
    /// Returns the number of types read.
    pub fn import_json(&mut self, json: &str) -> Result<usize> {
        let types: Vec<MarkingType> =
            serde_json::from_str(json).context("Failed to parse marking types")?;
        let count = types.len();
        self.add_many(types);
        Ok(count)
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path.as_ref(), self.export_json()?)
            .context("Failed to write marking types file")?;
        Ok(())
    }

    pub fn load_from_file(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let content = std::fs::read_to_string(path.as_ref())
            .context("Failed to read marking types file")?;
        self.import_json(&content)
    }
}
