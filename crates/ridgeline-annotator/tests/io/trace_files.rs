use ridgeline_annotator::{Brush, CanvasRegistry, Point, TracingDocument};
use ridgeline_core::{CanvasId, WorkingMode};

#[test]
fn test_tracing_file_round_trip_replaces_strokes() {
    let mut source = CanvasRegistry::new(WorkingMode::Fingerprint);
    source.canvas_mut(CanvasId::Left).edit_traces(|traces| {
        traces.begin_stroke(Point::new(1.0, 1.0), &Brush::default());
        traces.extend_stroke(Point::new(5.0, 8.0));
        traces.end_stroke();
    });
    let document = TracingDocument::from_store(source.canvas(CanvasId::Left).traces(), "0.3.0");

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("latent.paint.json");
    document.save_to_file(&path).unwrap();

    let mut target = CanvasRegistry::new(WorkingMode::Fingerprint);
    target.canvas_mut(CanvasId::Right).edit_traces(|traces| {
        traces.begin_stroke(Point::new(9.0, 9.0), &Brush::default());
        traces.end_stroke();
    });
    let loaded = TracingDocument::load_from_file(&path).unwrap();
    target
        .canvas_mut(CanvasId::Right)
        .edit_traces(|traces| loaded.load_into(traces));

    let traces = target.canvas(CanvasId::Right).traces();
    assert_eq!(traces.paths(), source.canvas(CanvasId::Left).traces().paths());
    assert!(!traces.can_undo());
    assert!(target.canvas(CanvasId::Left).traces().is_empty());
}

#[test]
fn test_markings_file_is_not_tracing_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("markings.json");
    std::fs::write(&path, r#"{"metadata":{"software":{"name":"ridgeline","version":"1"}},"data":{"markings":[]}}"#).unwrap();
    assert!(TracingDocument::load_from_file(&path).is_err());
}
