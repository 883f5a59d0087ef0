use ridgeline_annotator::render::RecordingSurface;
use ridgeline_annotator::{
    default_fingerprint_types, render_frame, CanvasRegistry, FrameInput, HandlerOutcome,
    MarkingClass, MarkingOptions, MarkingSession, Point, PointerEvent, RenderOptions, Tool,
    MEASUREMENT_TOOL_TYPE_ID,
};
use ridgeline_core::{Calibration, CanvasId, GeometryError, WorkingMode};
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

const LEFT: CanvasId = CanvasId::Left;

fn setup(tool: Tool) -> (CanvasRegistry, MarkingSession) {
    let mut registry =
        CanvasRegistry::new(WorkingMode::Fingerprint).with_types(default_fingerprint_types());
    let mut session = MarkingSession::new(MarkingOptions::default());
    session.set_tool(&mut registry, tool);
    (registry, session)
}

fn down(s: &mut MarkingSession, r: &mut CanvasRegistry, x: f64, y: f64) -> HandlerOutcome {
    s.pointer_down(r, LEFT, &PointerEvent::primary(x, y))
}

fn drag(s: &mut MarkingSession, r: &mut CanvasRegistry, x: f64, y: f64) -> HandlerOutcome {
    s.pointer_move(r, LEFT, &PointerEvent::primary(x, y))
}

fn up(s: &mut MarkingSession, r: &mut CanvasRegistry, x: f64, y: f64) -> HandlerOutcome {
    s.pointer_up(r, LEFT, &PointerEvent::primary(x, y))
}

#[test]
fn test_measurement_two_click_flow() {
    let (mut registry, mut session) = setup(Tool::Measurement);

    assert_eq!(down(&mut session, &mut registry, 0.0, 0.0), HandlerOutcome::Continue);
    assert_eq!(up(&mut session, &mut registry, 0.0, 0.0), HandlerOutcome::Continue);
    assert!(registry.store(LEFT).markings().is_empty());
    assert_eq!(registry.canvas(LEFT).ray_position(), Some(Point::new(0.0, 0.0)));

    drag(&mut session, &mut registry, 0.0, 40.0);
    let outcome = down(&mut session, &mut registry, 0.0, 40.0);
    assert_eq!(outcome, HandlerOutcome::Committed(1));
    assert!(!session.is_active());

    let markings = registry.store(LEFT).markings();
    assert_eq!(markings.len(), 1);
    let m = &markings[0];
    assert_eq!(m.class(), MarkingClass::Measurement);
    assert_eq!(m.type_id, MEASUREMENT_TOOL_TYPE_ID);
    assert_eq!(m.origin, Point::new(0.0, 0.0));
    assert_eq!(m.endpoint(), Some(Point::new(0.0, 40.0)));
    assert!(registry.store(LEFT).temporary().is_none());
    assert_eq!(registry.canvas(LEFT).ray_position(), None);

    registry
        .store_mut(LEFT)
        .set_calibration(Calibration::new("mm", 2.0));
    let mut surface = RecordingSurface::new(100, 100);
    let input = FrameInput::from_canvas(
        registry.canvas(LEFT),
        registry.types(),
        RenderOptions::default(),
    );
    render_frame(&mut surface, &input);
    assert!(surface.texts().contains(&"20.00 mm"));
}

#[test]
fn test_measurement_too_short_is_discarded() {
    let (mut registry, mut session) = setup(Tool::Measurement);
    down(&mut session, &mut registry, 3.0, 3.0);
    up(&mut session, &mut registry, 3.0, 3.0);
    let outcome = down(&mut session, &mut registry, 3.1, 3.0);
    assert!(matches!(outcome, HandlerOutcome::Discarded(GeometryError::Degenerate { .. })));
    assert!(registry.store(LEFT).markings().is_empty());
}

#[test]
fn test_ray_angle_follows_pointer() {
    let (mut registry, mut session) = setup(Tool::Mark(MarkingClass::Ray));
    down(&mut session, &mut registry, 10.0, 10.0);
    drag(&mut session, &mut registry, 10.0, 30.0);
    let angle = registry.store(LEFT).temporary().and_then(|m| m.angle_rad());
    assert!((angle.unwrap() - FRAC_PI_2).abs() < 1e-12);

    assert_eq!(up(&mut session, &mut registry, 10.0, 30.0), HandlerOutcome::Committed(1));
    let ray = &registry.store(LEFT).markings()[0];
    assert_eq!(ray.origin, Point::new(10.0, 10.0));
    assert_eq!(ray.type_id, registry.types().all()[0].id);
}

#[test]
fn test_ray_on_rotated_canvas_stores_unrotated_angle() {
    let (mut registry, mut session) = setup(Tool::Mark(MarkingClass::Ray));
    let canvas = registry.canvas_mut(LEFT);
    canvas.viewport.set_image_size(100.0, 100.0);
    canvas.viewport.set_screen_size(100.0, 100.0);
    canvas.set_rotation(FRAC_PI_2);

    down(&mut session, &mut registry, 50.0, 50.0);
    drag(&mut session, &mut registry, 50.0, 70.0);
    up(&mut session, &mut registry, 50.0, 70.0);

    let ray = &registry.store(LEFT).markings()[0];
    assert!((ray.origin.x - 50.0).abs() < 1e-9);
    assert!(ray.angle_rad().unwrap().abs() < 1e-9);
}

#[test]
fn test_short_segment_is_discarded() {
    let (mut registry, mut session) = setup(Tool::Mark(MarkingClass::LineSegment));
    down(&mut session, &mut registry, 5.0, 5.0);
    let outcome = up(&mut session, &mut registry, 5.5, 5.0);
    assert!(matches!(outcome, HandlerOutcome::Discarded(_)));
    assert!(registry.store(LEFT).markings().is_empty());
    assert!(registry.store(LEFT).temporary().is_none());

    down(&mut session, &mut registry, 5.0, 5.0);
    drag(&mut session, &mut registry, 8.0, 9.0);
    assert!(matches!(
        up(&mut session, &mut registry, 8.0, 9.0),
        HandlerOutcome::Committed(_)
    ));
    assert_eq!(registry.store(LEFT).markings()[0].distance_px(), Some(5.0));
}

#[test]
fn test_polygon_closes_near_first_vertex() {
    let (mut registry, mut session) = setup(Tool::Mark(MarkingClass::Polygon));
    down(&mut session, &mut registry, 0.0, 0.0);
    up(&mut session, &mut registry, 0.0, 0.0);
    down(&mut session, &mut registry, 10.0, 0.0);
    down(&mut session, &mut registry, 10.0, 10.0);
    drag(&mut session, &mut registry, 4.0, 8.0);
    assert_eq!(
        registry.store(LEFT).temporary().and_then(|m| m.points()).map(<[Point]>::len),
        Some(4)
    );

    let outcome = down(&mut session, &mut registry, 1.0, 1.0);
    assert_eq!(outcome, HandlerOutcome::Committed(1));
    let polygon = &registry.store(LEFT).markings()[0];
    assert_eq!(
        polygon.points().unwrap(),
        &[
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0)
        ]
    );
}

#[test]
fn test_polygon_secondary_button_finalizes() {
    let (mut registry, mut session) = setup(Tool::Mark(MarkingClass::Polygon));
    down(&mut session, &mut registry, 0.0, 0.0);
    down(&mut session, &mut registry, 20.0, 0.0);
    down(&mut session, &mut registry, 20.0, 20.0);
    let outcome = session.pointer_down(&mut registry, LEFT, &PointerEvent::secondary(50.0, 50.0));
    assert!(matches!(outcome, HandlerOutcome::Committed(_)));
    assert_eq!(registry.store(LEFT).markings()[0].points().unwrap().len(), 3);
}

#[test]
fn test_rectangle_corners() {
    let (mut registry, mut session) = setup(Tool::Mark(MarkingClass::Rectangle));
    down(&mut session, &mut registry, 2.0, 3.0);
    drag(&mut session, &mut registry, 10.0, 10.0);
    let outcome = up(&mut session, &mut registry, 22.0, 13.0);
    assert_eq!(outcome, HandlerOutcome::Committed(1));
    assert_eq!(
        registry.store(LEFT).markings()[0].points().unwrap(),
        &[
            Point::new(2.0, 3.0),
            Point::new(22.0, 3.0),
            Point::new(22.0, 13.0),
            Point::new(2.0, 13.0)
        ]
    );
}

#[test]
fn test_tool_switch_interrupts_in_progress_shape() {
    let (mut registry, mut session) = setup(Tool::Mark(MarkingClass::Ray));
    down(&mut session, &mut registry, 1.0, 1.0);
    assert!(registry.store(LEFT).temporary().is_some());

    session.set_tool(&mut registry, Tool::Selection);
    assert!(!session.is_active());
    assert!(registry.store(LEFT).temporary().is_none());
    assert!(registry.store(LEFT).markings().is_empty());

    // The label drawn for the dropped ray is not reused.
    assert_eq!(registry.labels().peek(), 2);
}

#[test]
fn test_labels_continue_across_canvases() {
    let (mut registry, mut session) = setup(Tool::Mark(MarkingClass::Point));
    down(&mut session, &mut registry, 1.0, 1.0);
    up(&mut session, &mut registry, 1.0, 1.0);
    let outcome = session.pointer_down(&mut registry, CanvasId::Right, &PointerEvent::primary(2.0, 2.0));
    assert_eq!(outcome, HandlerOutcome::Committed(2));
    assert_eq!(registry.store(CanvasId::Right).markings()[0].label, 2);
}

#[test]
fn test_auto_rotate_sets_overlay_and_rotation() {
    let (mut registry, mut session) = setup(Tool::AutoRotate);
    down(&mut session, &mut registry, 0.0, 0.0);
    up(&mut session, &mut registry, 0.0, 0.0);
    drag(&mut session, &mut registry, 10.0, 10.0);
    assert!(registry.canvas(LEFT).overlay().auto_rotate_temp.is_some());

    assert_eq!(down(&mut session, &mut registry, 10.0, 10.0), HandlerOutcome::Completed);
    let overlay = registry.canvas(LEFT).overlay();
    assert!(overlay.auto_rotate_temp.is_none());
    assert!(overlay.auto_rotate_finished.is_some());
    assert!(registry.store(LEFT).markings().is_empty());

    let rotation = registry.canvas_mut(LEFT).apply_auto_rotation().unwrap();
    assert!((rotation + FRAC_PI_4).abs() < 1e-12);
    assert!((registry.canvas(LEFT).viewport.rotation() + FRAC_PI_4).abs() < 1e-12);
}

fn with_image(registry: &mut CanvasRegistry, width: f64, height: f64) {
    let canvas = registry.canvas_mut(LEFT);
    canvas.viewport.set_image_size(width, height);
    canvas.viewport.set_screen_size(width, height);
}

#[test]
fn test_point_outside_image_is_discarded() {
    let (mut registry, mut session) = setup(Tool::Mark(MarkingClass::Point));
    with_image(&mut registry, 100.0, 100.0);

    let outcome = down(&mut session, &mut registry, 5000.0, -300.0);
    assert!(matches!(
        outcome,
        HandlerOutcome::Discarded(GeometryError::OutOfImage {
            width: 100,
            height: 100,
            ..
        })
    ));
    assert!(registry.store(LEFT).markings().is_empty());
    assert_eq!(registry.labels().peek(), 1);

    assert_eq!(down(&mut session, &mut registry, 100.0, 100.0), HandlerOutcome::Committed(1));
}

#[test]
fn test_segment_dragged_off_image_is_discarded() {
    let (mut registry, mut session) = setup(Tool::Mark(MarkingClass::LineSegment));
    with_image(&mut registry, 100.0, 100.0);

    down(&mut session, &mut registry, 10.0, 10.0);
    drag(&mut session, &mut registry, 150.0, 10.0);
    let outcome = up(&mut session, &mut registry, 150.0, 10.0);
    match outcome {
        HandlerOutcome::Discarded(GeometryError::OutOfImage { x, y, .. }) => {
            assert_eq!((x, y), (150.0, 10.0));
        }
        other => panic!("unexpected outcome {:?}", other),
    }
    assert!(registry.store(LEFT).markings().is_empty());
    assert!(registry.store(LEFT).temporary().is_none());
}

#[test]
fn test_measurement_first_stage_moves_origin_only() {
    let (mut registry, mut session) = setup(Tool::Measurement);
    down(&mut session, &mut registry, 10.0, 10.0);
    drag(&mut session, &mut registry, 50.0, 10.0);

    let temporary = registry.store(LEFT).temporary().unwrap();
    assert_eq!(temporary.origin, Point::new(50.0, 10.0));
    assert_eq!(temporary.endpoint(), Some(Point::new(10.0, 10.0)));

    up(&mut session, &mut registry, 50.0, 10.0);
    drag(&mut session, &mut registry, 50.0, 60.0);
    assert_eq!(
        down(&mut session, &mut registry, 50.0, 60.0),
        HandlerOutcome::Committed(1)
    );
    let m = &registry.store(LEFT).markings()[0];
    assert_eq!(m.origin, Point::new(50.0, 10.0));
    assert_eq!(m.endpoint(), Some(Point::new(50.0, 60.0)));
}
