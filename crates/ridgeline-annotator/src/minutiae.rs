//! Conversion of detector minutiae into ray markings.

use ridgeline_core::{CanvasId, MinutiaKind, MinutiaRecord};
use std::f64::consts::FRAC_PI_2;

use crate::labels::LabelGenerator;
use crate::marking_types::MarkingTypes;
use crate::model::{Marking, MarkingShape, Point};
use crate::registry::CanvasRegistry;

/// Well-known id of the ridge-ending type.
pub const RIDGE_ENDING_TYPE_ID: &str = "e6cbde52-5a18-4236-8287-7a1daf941ba9";
/// Well-known id of the bifurcation type.
pub const BIFURCATION_TYPE_ID: &str = "f47c4b97-2d62-4959-aa21-edebfa7a756a";

const RIDGE_ENDING_NAME: &str = "ridgeending";
const BIFURCATION_NAME: &str = "bifurcation";

/// Lowercases and strips everything that is not an ASCII letter or digit.
///
/// ```
/// use ridgeline_annotator::minutiae::normalize_type_name;
/// assert_eq!(normalize_type_name("Ridge-Ending"), "ridgeending");
/// ```
pub fn normalize_type_name(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

fn lookup(types: &MarkingTypes, id: &str, normalized_name: &str) -> Option<String> {
    types
        .find(id)
        .or_else(|| {
            types.all().iter().find(|t| {
                normalize_type_name(&t.name) == normalized_name
                    || normalize_type_name(&t.display_name) == normalized_name
            })
        })
        .map(|t| t.id.clone())
}

/// Marking type for a minutia kind.
///
/// Tries the kind's well-known id, then a normalised name match, then the
/// ridge-ending type by id or name. `None` when none is registered.
pub fn resolve_type_id(types: &MarkingTypes, kind: &MinutiaKind) -> Option<String> {
    let preferred = match kind {
        MinutiaKind::Bifurcation => lookup(types, BIFURCATION_TYPE_ID, BIFURCATION_NAME),
        MinutiaKind::Ending | MinutiaKind::Other(_) => None,
    };
    preferred.or_else(|| lookup(types, RIDGE_ENDING_TYPE_ID, RIDGE_ENDING_NAME))
}

/// Builds one ray marking per usable record.
///
/// `angle_rad = direction - π/2`. Records with non-finite values, outside
/// `image_size` when one is given, or without a resolvable type are
/// skipped. Labels are drawn
/// only for accepted records.
pub fn convert_minutiae(
    records: &[MinutiaRecord],
    image_size: Option<(f64, f64)>,
    types: &MarkingTypes,
    labels: &mut LabelGenerator,
) -> Vec<Marking> {
    let mut markings = Vec::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        if !record.is_finite() {
            tracing::warn!("Skipping minutia {}: non-finite value", index);
            continue;
        }
        if let Some((width, height)) = image_size {
            let inside = (0.0..=width).contains(&record.x) && (0.0..=height).contains(&record.y);
            if !inside {
                tracing::warn!(
                    "Skipping minutia {} at ({}, {}): outside {}x{} image",
                    index,
                    record.x,
                    record.y,
                    width,
                    height
                );
                continue;
            }
        }
        let kind = record.minutia_kind();
        if let MinutiaKind::Other(raw) = &kind {
            tracing::debug!("Minutia {} has unknown kind '{}'", index, raw);
        }
        let Some(type_id) = resolve_type_id(types, &kind) else {
            tracing::warn!(
                "Skipping minutia {}: no type registered for {:?} or ridge endings",
                index,
                kind
            );
            continue;
        };
        markings.push(Marking::new(
            labels.next_label(),
            type_id,
            Point::new(record.x, record.y),
            MarkingShape::Ray {
                angle_rad: record.direction - FRAC_PI_2,
            },
        ));
    }
    markings
}

/// Converts `records` and adds them to `canvas` in one batch. Returns the
/// new labels.
pub fn auto_mark_minutiae(
    registry: &mut CanvasRegistry,
    canvas: CanvasId,
    records: &[MinutiaRecord],
    image_size: Option<(f64, f64)>,
) -> Vec<u32> {
    let types = registry.types().clone();
    let markings = convert_minutiae(records, image_size, &types, registry.labels_mut());
    let labels: Vec<u32> = markings.iter().map(|m| m.label).collect();
    tracing::info!(
        "Adding {} of {} minutiae to {} canvas",
        labels.len(),
        records.len(),
        canvas
    );
    registry.store_mut(canvas).add_many(markings);
    labels
}
