use proptest::prelude::*;
use ridgeline_core::{Calibration, PIXEL_UNIT};

#[test]
fn test_default_calibration_is_pixels() {
    let cal = Calibration::default();
    assert_eq!(cal.unit, PIXEL_UNIT);
    assert!(!cal.is_calibrated());
    assert_eq!(cal.format_distance(3.0), "3.00 px");
}

#[test]
fn test_pixel_unit_ignores_scale() {
    let cal = Calibration::new("px", 4.0);
    assert_eq!(cal.format_distance(8.0), "8.00 px");
}

proptest! {
    #[test]
    fn prop_calibrated_distance_round_trips(
        distance in 0.0f64..100_000.0,
        pixels_per_unit in 0.01f64..1_000.0,
    ) {
        let text = Calibration::new("mm", pixels_per_unit).format_distance(distance);
        let value = text.strip_suffix(" mm").expect("unit suffix");
        let parsed: f64 = value.parse().expect("number");
        prop_assert!((parsed - distance / pixels_per_unit).abs() <= 0.005 + 1e-9);
    }
}
