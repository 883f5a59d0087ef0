use proptest::prelude::*;
use ridgeline_annotator::model::{rotate_about, ViewportRatios};
use ridgeline_annotator::{CanvasViewport, Point};
use std::f64::consts::FRAC_PI_2;

#[test]
fn test_adjusted_position_undoes_rotation() {
    let mut viewport = CanvasViewport::new(100.0, 100.0);
    viewport.set_rotation(FRAC_PI_2);
    let stored = viewport.adjusted_position(Point::new(50.0, 0.0));
    assert!((stored.x - 0.0).abs() < 1e-9);
    assert!((stored.y - 50.0).abs() < 1e-9);
}

#[test]
fn test_pan_and_zoom_normalisation() {
    let mut viewport = CanvasViewport::new(100.0, 100.0);
    viewport.set_zoom(2.0);
    viewport.set_pan(10.0, 20.0);
    assert_eq!(
        viewport.screen_to_image(Point::new(30.0, 40.0)),
        Point::new(10.0, 10.0)
    );
}

#[test]
fn test_ratios_follow_zoom() {
    let mut viewport = CanvasViewport::new(200.0, 100.0);
    assert_eq!(viewport.ratios(), ViewportRatios::identity());
    viewport.set_zoom(2.0);
    assert_eq!(viewport.ratios(), ViewportRatios::new(0.5, 0.5));
}

#[test]
fn test_rotate_about_zero_is_identity() {
    let p = Point::new(3.25, -7.5);
    assert_eq!(rotate_about(p, 0.0, 100.0, 100.0), p);
}

proptest! {
    #[test]
    fn prop_stored_to_screen_inverts_adjusted_position(
        x in -500.0f64..500.0,
        y in -500.0f64..500.0,
        rotation in -6.3f64..6.3,
        zoom in 0.1f64..8.0,
    ) {
        let mut viewport = CanvasViewport::new(320.0, 240.0);
        viewport.set_rotation(rotation);
        viewport.set_zoom(zoom);
        viewport.set_pan(12.0, -7.0);
        let screen = Point::new(x, y);
        let back = viewport.stored_to_screen(viewport.adjusted_position(screen));
        prop_assert!((back.x - screen.x).abs() < 1e-6);
        prop_assert!((back.y - screen.y).abs() < 1e-6);
    }
}
