use ridgeline_annotator::model::ViewportRatios;
use ridgeline_annotator::render::{DrawCommand, PixmapSurface, Projection, RecordingSurface};
use ridgeline_annotator::{
    default_fingerprint_types, render_frame, Brush, CanvasRegistry, Color, FrameInput, Marking,
    MarkingShape, Point, RenderOptions, Renderer, TracingMode, MEASUREMENT_TOOL_TYPE_ID,
};
use ridgeline_core::{Calibration, CanvasId, WorkingMode};

const LEFT: CanvasId = CanvasId::Left;

fn registry() -> CanvasRegistry {
    let mut registry =
        CanvasRegistry::new(WorkingMode::Fingerprint).with_types(default_fingerprint_types());
    let canvas = registry.canvas_mut(LEFT);
    canvas.viewport.set_image_size(64.0, 64.0);
    canvas.viewport.set_screen_size(64.0, 64.0);
    registry
}

fn core_type(registry: &CanvasRegistry) -> String {
    registry.types().all()[2].id.clone()
}

fn scar_type(registry: &CanvasRegistry) -> String {
    registry.types().all()[5].id.clone()
}

#[test]
fn test_frame_draws_labels() {
    let mut registry = registry();
    let type_id = core_type(&registry);
    registry
        .store_mut(LEFT)
        .add_one(Marking::new(7, type_id, Point::new(10.0, 10.0), MarkingShape::Point));

    let mut surface = RecordingSurface::new(64, 64);
    let input = FrameInput::from_canvas(registry.canvas(LEFT), registry.types(), RenderOptions::default());
    assert_eq!(render_frame(&mut surface, &input), 1);
    assert_eq!(surface.texts(), vec!["7"]);
    assert!(matches!(surface.commands()[0], DrawCommand::Clear));
}

#[test]
fn test_hidden_labels_draw_holes() {
    let mut registry = registry();
    let type_id = core_type(&registry);
    registry
        .store_mut(LEFT)
        .add_one(Marking::new(1, type_id, Point::new(10.0, 10.0), MarkingShape::Point));

    let options = RenderOptions {
        show_labels: false,
        ..RenderOptions::default()
    };
    let mut surface = RecordingSurface::new(64, 64);
    let input = FrameInput::from_canvas(registry.canvas(LEFT), registry.types(), options);
    assert_eq!(render_frame(&mut surface, &input), 1);
    assert!(surface.texts().is_empty());
    assert!(!surface.is_blank());
}

#[test]
fn test_temporary_marking_is_drawn() {
    let mut registry = registry();
    let type_id = core_type(&registry);
    registry.store_mut(LEFT).set_temporary(Some(Marking::new(
        4,
        type_id,
        Point::new(5.0, 5.0),
        MarkingShape::Point,
    )));

    let mut surface = RecordingSurface::new(64, 64);
    let input = FrameInput::from_canvas(registry.canvas(LEFT), registry.types(), RenderOptions::default());
    assert_eq!(render_frame(&mut surface, &input), 1);
    assert_eq!(surface.texts(), vec!["4"]);
}

#[test]
fn test_renderer_redraws_on_store_changes() {
    let mut registry = registry();
    let type_id = core_type(&registry);
    let mut renderer = Renderer::new(LEFT, RenderOptions::default());
    renderer.attach(registry.bus());
    let mut surface = RecordingSurface::new(64, 64);

    assert!(renderer.render(&mut surface, registry.canvas(LEFT), registry.types(), 0));
    assert!(!renderer.render(&mut surface, registry.canvas(LEFT), registry.types(), 16));

    registry
        .store_mut(LEFT)
        .add_one(Marking::new(1, type_id, Point::new(3.0, 3.0), MarkingShape::Point));
    assert!(renderer.render(&mut surface, registry.canvas(LEFT), registry.types(), 32));
    assert_eq!(surface.texts(), vec!["1"]);

    let core = core_type(&registry);
    registry.types_mut().toggle_hidden(&core);
    renderer.invalidate();
    assert!(renderer.render(&mut surface, registry.canvas(LEFT), registry.types(), 48));
    assert!(surface.is_blank());
    assert_eq!(renderer.frames_drawn(), 3);
    assert_eq!(surface.frames(), 3);
}

#[test]
fn test_pixmap_surface_rasterises_polygon() {
    let mut registry = registry();
    let type_id = scar_type(&registry);
    registry.store_mut(LEFT).add_one(Marking::new(
        1,
        type_id,
        Point::new(8.0, 8.0),
        MarkingShape::Polygon {
            points: vec![
                Point::new(8.0, 8.0),
                Point::new(56.0, 8.0),
                Point::new(56.0, 56.0),
                Point::new(8.0, 56.0),
            ],
        },
    ));

    let mut surface = PixmapSurface::new(64, 64, Color::rgb(0, 0, 0)).unwrap();
    let input = FrameInput::from_canvas(registry.canvas(LEFT), registry.types(), RenderOptions::default());
    render_frame(&mut surface, &input);

    let image = surface.to_rgb_image();
    assert_eq!(image.dimensions(), (64, 64));
    assert_eq!(image.get_pixel(62, 62).0, [0, 0, 0]);
    let inside = image.get_pixel(40, 40).0;
    assert_ne!(inside, [0, 0, 0]);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("frame.png");
    surface.save_png(&path).unwrap();
    assert!(path.exists());
}

#[test]
fn test_measurement_label_ignores_zoom() {
    let mut registry = registry();
    registry.store_mut(LEFT).add_one(Marking::new(
        1,
        MEASUREMENT_TOOL_TYPE_ID,
        Point::new(10.0, 10.0),
        MarkingShape::Measurement {
            endpoint: Point::new(50.0, 10.0),
        },
    ));
    registry
        .store_mut(LEFT)
        .set_calibration(Calibration::new("mm", 2.0));

    let mut ends = Vec::new();
    for ratios in [ViewportRatios::new(1.0, 1.0), ViewportRatios::new(0.25, 0.5)] {
        let mut surface = RecordingSurface::new(64, 64);
        let mut input =
            FrameInput::from_canvas(registry.canvas(LEFT), registry.types(), RenderOptions::default());
        input.projection = Projection::new(ratios, 0.0, 64.0, 64.0);
        render_frame(&mut surface, &input);

        assert_eq!(surface.texts(), vec!["20.00 mm"]);
        let end = surface.commands().iter().find_map(|c| match c {
            DrawCommand::Line { from, to, .. } => Some((*from, *to)),
            _ => None,
        });
        ends.push(end.unwrap());
    }
    // The drawn line does follow the zoom.
    assert_eq!(ends[0].1, Point::new(50.0, 10.0));
    assert_eq!(ends[1].1, Point::new(12.5, 5.0));
}

#[test]
fn test_tracing_strokes_are_rasterised() {
    let mut registry = registry();
    let brush = Brush {
        color: Color::rgb(0, 255, 0),
        brush_size: 4.0,
        mode: TracingMode::Line,
        ..Brush::default()
    };
    registry.canvas_mut(LEFT).edit_traces(|traces| {
        traces.begin_stroke(Point::new(4.0, 32.0), &brush);
        traces.extend_stroke(Point::new(60.0, 32.0));
        traces.end_stroke();
    });

    let mut surface = PixmapSurface::new(64, 64, Color::rgb(0, 0, 0)).unwrap();
    let input = FrameInput::from_canvas(registry.canvas(LEFT), registry.types(), RenderOptions::default());
    assert_eq!(render_frame(&mut surface, &input), 0);

    let image = surface.to_rgb_image();
    assert_eq!(image.get_pixel(32, 32).0, [0, 255, 0]);
    assert_eq!(image.get_pixel(32, 10).0, [0, 0, 0]);

    // Undo takes the stroke off the next frame.
    registry.canvas_mut(LEFT).edit_traces(|traces| traces.undo());
    let input = FrameInput::from_canvas(registry.canvas(LEFT), registry.types(), RenderOptions::default());
    render_frame(&mut surface, &input);
    assert_eq!(surface.to_rgb_image().get_pixel(32, 32).0, [0, 0, 0]);
}
