use ridgeline_annotator::serialization::{ExportDocument, MarkingRecord};
use ridgeline_annotator::{
    default_fingerprint_types, CanvasRegistry, Marking, MarkingShape, Point,
    MEASUREMENT_TOOL_TYPE_ID,
};
use ridgeline_core::{CanvasId, ImportError, WorkingMode};

fn registry() -> CanvasRegistry {
    CanvasRegistry::new(WorkingMode::Fingerprint).with_types(default_fingerprint_types())
}

fn populate(registry: &mut CanvasRegistry) {
    let ray = registry.types().all()[0].id.clone();
    let count = registry.types().all()[4].id.clone();
    let scar = registry.types().all()[5].id.clone();
    let shapes = vec![
        (ray, Point::new(1.0, 2.0), MarkingShape::Ray { angle_rad: 0.25 }),
        (
            count,
            Point::new(3.0, 4.0),
            MarkingShape::LineSegment {
                endpoint: Point::new(30.0, 40.0),
            },
        ),
        (
            scar,
            Point::new(0.0, 0.0),
            MarkingShape::Polygon {
                points: vec![
                    Point::new(0.0, 0.0),
                    Point::new(5.0, 0.0),
                    Point::new(5.0, 5.0),
                ],
            },
        ),
        (
            MEASUREMENT_TOOL_TYPE_ID.to_string(),
            Point::new(0.0, 0.0),
            MarkingShape::Measurement {
                endpoint: Point::new(0.0, 12.0),
            },
        ),
    ];
    for (type_id, origin, shape) in shapes {
        let label = registry.next_label();
        registry
            .store_mut(CanvasId::Left)
            .add_one(Marking::new(label, type_id, origin, shape));
    }
}

#[test]
fn test_round_trip_through_file() {
    let mut source = registry();
    populate(&mut source);
    let doc = ExportDocument::from_registry(&source, CanvasId::Left, "0.1.0");
    assert_eq!(doc.metadata.types.len(), 3);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("left.json");
    doc.save_to_file(&path).unwrap();
    let loaded = ExportDocument::load_from_file(&path).unwrap();
    assert_eq!(loaded, doc);

    let mut target = registry();
    target.next_label();
    target.next_label();
    let labels = loaded.import_into(&mut target, CanvasId::Right).unwrap();
    assert_eq!(labels, vec![3, 4, 5, 6]);

    let imported = target.store(CanvasId::Right).markings();
    let original = source.store(CanvasId::Left).markings();
    assert_eq!(imported.len(), original.len());
    for (a, b) in imported.iter().zip(original) {
        assert_eq!(a.ids, b.ids);
        assert_eq!(a.type_id, b.type_id);
        assert_eq!(a.origin, b.origin);
        assert_eq!(a.shape, b.shape);
    }
}

#[test]
fn test_missing_ids_are_generated() {
    let json = r#"{
        "metadata": {
            "software": { "name": "ridgeline", "version": "0.1.0" },
            "workingMode": "fingerprint"
        },
        "data": {
            "markings": [
                { "markingClass": "measurement", "origin": { "x": 0, "y": 0 },
                  "typeId": "__measurement__", "endpoint": { "x": 3, "y": 4 } }
            ]
        }
    }"#;
    let doc = ExportDocument::parse(json).unwrap();
    let mut target = registry();
    let labels = doc.import_into(&mut target, CanvasId::Left).unwrap();
    assert_eq!(labels, vec![1]);
    let marking = &target.store(CanvasId::Left).markings()[0];
    assert_eq!(marking.ids.len(), 1);
    assert!(!marking.ids[0].is_empty());
    assert_eq!(marking.distance_px(), Some(5.0));
}

fn assert_untouched(registry: &CanvasRegistry) {
    assert!(registry.store(CanvasId::Left).markings().is_empty());
    assert_eq!(registry.labels().peek(), 1);
}

#[test]
fn test_working_mode_mismatch_is_rejected() {
    let mut source = registry();
    populate(&mut source);
    let doc = ExportDocument::from_registry(&source, CanvasId::Left, "0.1.0");

    let mut target =
        CanvasRegistry::new(WorkingMode::Ear).with_types(default_fingerprint_types());
    let err = doc.import_into(&mut target, CanvasId::Left).unwrap_err();
    assert!(matches!(err, ImportError::WorkingModeMismatch { .. }));
    assert_untouched(&target);
}

#[test]
fn test_unknown_type_rejects_whole_document() {
    let mut source = registry();
    populate(&mut source);
    let mut doc = ExportDocument::from_registry(&source, CanvasId::Left, "0.1.0");
    doc.data.markings[2].type_id = "no-such-type".to_string();

    let mut target = registry();
    let err = doc.import_into(&mut target, CanvasId::Left).unwrap_err();
    match err {
        ImportError::UnknownType { index, type_id } => {
            assert_eq!(index, 2);
            assert_eq!(type_id, "no-such-type");
        }
        other => panic!("unexpected error {:?}", other),
    }
    assert_untouched(&target);
}

#[test]
fn test_non_finite_geometry_is_rejected() {
    let mut source = registry();
    populate(&mut source);
    let mut doc = ExportDocument::from_registry(&source, CanvasId::Left, "0.1.0");
    let broken = MarkingRecord {
        ids: vec![],
        origin: Point::new(f64::NAN, 0.0),
        ..doc.data.markings[0].clone()
    };
    doc.data.markings.push(broken);

    let mut target = registry();
    let err = doc.import_into(&mut target, CanvasId::Left).unwrap_err();
    assert!(matches!(err, ImportError::Geometry { index: 4, .. }));
    assert_untouched(&target);
}

#[test]
fn test_malformed_json() {
    assert!(matches!(
        ExportDocument::parse("{ not json"),
        Err(ImportError::Malformed(_))
    ));
    let missing_points = r#"{
        "metadata": { "software": { "name": "x", "version": "1" }, "workingMode": "fingerprint" },
        "data": { "markings": [
            { "markingClass": "polygon", "origin": { "x": 0, "y": 0 }, "typeId": "__measurement__" }
        ] }
    }"#;
    let doc = ExportDocument::parse(missing_points).unwrap();
    let err = doc.validate(&registry()).unwrap_err();
    assert_eq!(err.to_string(), "Marking 0 (polygon) is missing 'points'");
}
