use proptest::prelude::*;
use ridgeline_annotator::labels::{duplicate_labels, LabelGenerator};
use ridgeline_annotator::{CanvasRegistry, Marking, MarkingShape, Point};
use ridgeline_core::{CanvasId, IntegrityError, WorkingMode};

#[test]
fn test_generator_is_shared_and_monotonic() {
    let mut registry = CanvasRegistry::new(WorkingMode::Fingerprint);
    let a = registry.next_label();
    registry.store_mut(CanvasId::Left).add_one(Marking::new(
        a,
        "t",
        Point::new(0.0, 0.0),
        MarkingShape::Point,
    ));
    let b = registry.next_label();
    assert!(b > a);
    assert_eq!(registry.labels().peek(), b + 1);
}

#[test]
fn test_ensure_above() {
    let mut labels = LabelGenerator::new();
    labels.ensure_above(41);
    assert_eq!(labels.next_label(), 42);
    labels.ensure_above(10);
    assert_eq!(labels.next_label(), 43);
}

#[test]
fn test_adopted_labels_push_the_generator() {
    let mut registry = CanvasRegistry::new(WorkingMode::Fingerprint);
    let point = |label| Marking::new(label, "t", Point::new(0.0, 0.0), MarkingShape::Point);
    registry
        .adopt_markings(CanvasId::Left, vec![point(4), point(17)])
        .unwrap();
    assert_eq!(registry.next_label(), 18);

    // The same label may pair a feature on the other canvas.
    registry
        .adopt_markings(CanvasId::Right, vec![point(17)])
        .unwrap();
    assert_eq!(registry.store(CanvasId::Right).markings().len(), 1);

    let err = registry
        .adopt_markings(CanvasId::Left, vec![point(30), point(4)])
        .unwrap_err();
    assert!(matches!(err, IntegrityError::DuplicateLabel { label: 4, .. }));
    assert_eq!(registry.store(CanvasId::Left).markings().len(), 2);
    assert_eq!(registry.labels().peek(), 19);
}

proptest! {
    #[test]
    fn prop_labels_stay_unique(ops in prop::collection::vec((0u8..3, any::<bool>(), 0usize..6), 0..60)) {
        let mut registry = CanvasRegistry::new(WorkingMode::Fingerprint);
        for (op, left, n) in ops {
            let canvas = if left { CanvasId::Left } else { CanvasId::Right };
            match op {
                0 => {
                    let label = registry.next_label();
                    registry.store_mut(canvas).add_one(Marking::new(
                        label,
                        "t",
                        Point::new(n as f64, n as f64),
                        MarkingShape::Point,
                    ));
                }
                1 => {
                    let batch: Vec<Marking> = (0..n)
                        .map(|i| {
                            Marking::new(
                                registry.next_label(),
                                "t",
                                Point::new(i as f64, 0.0),
                                MarkingShape::Point,
                            )
                        })
                        .collect();
                    registry.store_mut(canvas).add_many(batch);
                }
                _ => {
                    let label = registry.store(canvas).markings().get(n).map(|m| m.label);
                    if let Some(label) = label {
                        registry.store_mut(canvas).remove_by_label(label);
                    }
                }
            }
        }
        prop_assert!(registry.validate_labels().is_ok());
        for id in CanvasId::ALL {
            prop_assert!(duplicate_labels(registry.store(id).markings()).is_empty());
        }
    }
}
