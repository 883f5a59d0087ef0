use ridgeline_annotator::{
    default_fingerprint_types, CanvasRegistry, InfoRow, Marking, MarkingShape, Point,
    MEASUREMENT_TOOL_TYPE_ID,
};
use ridgeline_core::{CanvasId, WorkingMode};

fn add_point(registry: &mut CanvasRegistry, canvas: CanvasId, label: u32) {
    registry.store_mut(canvas).add_one(Marking::new(
        label,
        "t",
        Point::new(label as f64, 0.0),
        MarkingShape::Point,
    ));
}

fn labels(rows: &[InfoRow<'_>]) -> Vec<(u32, bool)> {
    rows.iter().map(|r| (r.label(), r.is_placeholder())).collect()
}

#[test]
fn test_rows_line_up_across_canvases() {
    let mut registry =
        CanvasRegistry::new(WorkingMode::Fingerprint).with_types(default_fingerprint_types());
    add_point(&mut registry, CanvasId::Left, 3);
    add_point(&mut registry, CanvasId::Left, 1);
    add_point(&mut registry, CanvasId::Right, 2);
    add_point(&mut registry, CanvasId::Right, 3);

    assert_eq!(
        labels(&registry.info_rows(CanvasId::Left)),
        vec![(1, false), (2, true), (3, false)]
    );
    assert_eq!(
        labels(&registry.info_rows(CanvasId::Right)),
        vec![(1, true), (2, false), (3, false)]
    );
}

#[test]
fn test_measurements_stay_on_their_canvas() {
    let mut registry = CanvasRegistry::new(WorkingMode::Fingerprint);
    add_point(&mut registry, CanvasId::Left, 1);
    registry.store_mut(CanvasId::Right).add_one(Marking::new(
        2,
        MEASUREMENT_TOOL_TYPE_ID,
        Point::new(0.0, 0.0),
        MarkingShape::Measurement {
            endpoint: Point::new(0.0, 9.0),
        },
    ));

    assert_eq!(labels(&registry.info_rows(CanvasId::Left)), vec![(1, false)]);
    assert_eq!(
        labels(&registry.info_rows(CanvasId::Right)),
        vec![(1, true), (2, false)]
    );
}
