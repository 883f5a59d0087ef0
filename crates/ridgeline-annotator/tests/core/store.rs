use ridgeline_annotator::{Marking, MarkingPatch, MarkingShape, MarkingsStore, Point};
use ridgeline_core::{
    AnnotationEvent, Calibration, CanvasId, EventBus, EventBusConfig, IntegrityError,
    MarkingsEvent,
};
use std::sync::Arc;

fn store() -> (MarkingsStore, Arc<EventBus>) {
    let bus = Arc::new(EventBus::with_config(EventBusConfig {
        enable_history: true,
        ..Default::default()
    }));
    (MarkingsStore::new(CanvasId::Left, bus.clone()), bus)
}

fn point(label: u32) -> Marking {
    Marking::new(label, "t", Point::new(label as f64, 0.0), MarkingShape::Point)
}

#[test]
fn test_hash_changes_only_on_list_mutation() {
    let (mut store, _bus) = store();
    let initial = store.markings_hash();

    store.add_one(point(1));
    let after_add = store.markings_hash();
    assert_ne!(initial, after_add);

    store.set_selected(Some(1)).unwrap();
    store.set_calibration(Calibration::new("mm", 2.0));
    store.set_temporary(Some(point(9)));
    assert_eq!(store.markings_hash(), after_add);

    store.remove_by_label(1);
    assert_ne!(store.markings_hash(), after_add);
}

#[test]
fn test_no_op_mutations_publish_nothing() {
    let (mut store, bus) = store();
    store.add_one(point(1));
    store.set_selected(Some(1)).unwrap();
    store.set_calibration(Calibration::new("mm", 2.0));
    bus.clear_history();

    store.set_selected(Some(1)).unwrap();
    store.set_calibration(Calibration::new("mm", 2.0));
    assert!(store.remove_by_label(99).is_none());
    store.set_temporary(None);
    assert!(!store.update_temporary(&MarkingPatch::origin(Point::new(1.0, 1.0))));

    assert!(bus.history().is_empty());
}

#[test]
fn test_add_many_is_one_notification() {
    let (mut store, bus) = store();
    store.add_many(vec![point(1), point(2), point(3)]);
    let history = bus.history();
    assert_eq!(history.len(), 1);
    match &history[0] {
        AnnotationEvent::Markings(MarkingsEvent::Added { labels, hash, .. }) => {
            assert_eq!(labels, &vec![1, 2, 3]);
            assert_eq!(*hash, store.markings_hash());
        }
        other => panic!("unexpected event {:?}", other),
    }

    store.add_many(Vec::new());
    assert_eq!(bus.history().len(), 1);
}

#[test]
fn test_temporary_lifecycle() {
    let (mut store, _bus) = store();
    store.set_temporary(Some(Marking::new(
        5,
        "t",
        Point::new(0.0, 0.0),
        MarkingShape::LineSegment {
            endpoint: Point::new(0.0, 0.0),
        },
    )));
    let revision = store.temporary_revision();
    assert!(store.update_temporary(&MarkingPatch::endpoint(Point::new(3.0, 4.0))));
    assert!(store.temporary_revision() > revision);
    assert!(store.markings().is_empty());

    assert_eq!(store.commit_temporary(), Some(5));
    assert!(store.temporary().is_none());
    assert_eq!(store.find(5).unwrap().distance_px(), Some(5.0));
}

#[test]
fn test_selection_requires_existing_label() {
    let (mut store, _bus) = store();
    assert_eq!(
        store.set_selected(Some(3)),
        Err(IntegrityError::UnknownLabel { label: 3 })
    );
    store.add_one(point(3));
    store.set_selected(Some(3)).unwrap();
    store.clear();
    assert_eq!(store.selected_label(), None);
}

#[test]
fn test_selection_tool_edits() {
    let (mut store, _bus) = store();
    store.add_one(point(1));
    let hash = store.markings_hash();

    store.set_marking_type(1, "other").unwrap();
    assert_eq!(store.find(1).unwrap().type_id, "other");
    assert_ne!(store.markings_hash(), hash);

    let hash = store.markings_hash();
    store.set_marking_type(1, "other").unwrap();
    assert_eq!(store.markings_hash(), hash);

    store.move_marking_origin(1, Point::new(7.0, 8.0)).unwrap();
    assert_eq!(store.find(1).unwrap().origin, Point::new(7.0, 8.0));
    assert!(store.move_marking_origin(2, Point::new(0.0, 0.0)).is_err());
}
