use ridgeline_annotator::minutiae::{auto_mark_minutiae, BIFURCATION_TYPE_ID, RIDGE_ENDING_TYPE_ID};
use ridgeline_annotator::{default_fingerprint_types, CanvasRegistry, Point};
use ridgeline_core::{
    AnnotationEvent, CanvasId, EventBus, EventBusConfig, MarkingsEvent, MinutiaRecord, WorkingMode,
};
use std::f64::consts::{FRAC_PI_2, PI};
use std::sync::Arc;

fn registry() -> (CanvasRegistry, Arc<EventBus>) {
    let bus = Arc::new(EventBus::with_config(EventBusConfig {
        enable_history: true,
        ..Default::default()
    }));
    let registry = CanvasRegistry::with_bus(WorkingMode::Fingerprint, bus.clone())
        .with_types(default_fingerprint_types());
    (registry, bus)
}

#[test]
fn test_single_ending_becomes_ray() {
    let (mut registry, bus) = registry();
    let records = [MinutiaRecord::new(10.0, 20.0, 0.0, "ending")];
    let labels = auto_mark_minutiae(&mut registry, CanvasId::Left, &records, Some((100.0, 100.0)));
    assert_eq!(labels, vec![1]);

    let ray = &registry.store(CanvasId::Left).markings()[0];
    assert_eq!(ray.type_id, RIDGE_ENDING_TYPE_ID);
    assert_eq!(ray.origin, Point::new(10.0, 20.0));
    assert!((ray.angle_rad().unwrap() + FRAC_PI_2).abs() < 1e-12);

    let added: Vec<_> = bus
        .history()
        .into_iter()
        .filter(|e| matches!(e, AnnotationEvent::Markings(MarkingsEvent::Added { .. })))
        .collect();
    assert_eq!(added.len(), 1);
}

#[test]
fn test_batch_is_one_notification() {
    let (mut registry, bus) = registry();
    let records = [
        MinutiaRecord::new(1.0, 1.0, PI, "bifurcation"),
        MinutiaRecord::new(2.0, 2.0, 0.0, "ending"),
        MinutiaRecord::new(3.0, 3.0, 0.0, "whorl"),
        MinutiaRecord::new(-4.0, 3.0, 0.0, "ending"),
    ];
    let labels = auto_mark_minutiae(&mut registry, CanvasId::Right, &records, Some((50.0, 50.0)));
    assert_eq!(labels, vec![1, 2, 3]);

    let markings = registry.store(CanvasId::Right).markings();
    assert_eq!(markings[0].type_id, BIFURCATION_TYPE_ID);
    assert!((markings[0].angle_rad().unwrap() - FRAC_PI_2).abs() < 1e-12);
    assert_eq!(markings[1].type_id, RIDGE_ENDING_TYPE_ID);
    assert_eq!(markings[2].type_id, RIDGE_ENDING_TYPE_ID);

    let history = bus.history();
    assert_eq!(history.len(), 1);
    match &history[0] {
        AnnotationEvent::Markings(MarkingsEvent::Added { canvas, labels, .. }) => {
            assert_eq!(*canvas, CanvasId::Right);
            assert_eq!(labels, &vec![1, 2, 3]);
        }
        other => panic!("unexpected event {:?}", other),
    }
}

#[test]
fn test_nothing_usable_adds_nothing() {
    let (mut registry, bus) = registry();
    let records = [MinutiaRecord::new(f64::INFINITY, 1.0, 0.0, "ending")];
    let labels = auto_mark_minutiae(&mut registry, CanvasId::Left, &records, None);
    assert!(labels.is_empty());
    assert!(registry.store(CanvasId::Left).markings().is_empty());
    assert!(bus.history().is_empty());
}
