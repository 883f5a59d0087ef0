//! Ruler-based calibration.
//!
//! The operator draws a line across the millimetre ticks of a ruler
//! photographed with the print. Intensity is sampled along the line, dark
//! dips are detected as ticks, and the mean tick spacing gives the
//! pixels-per-millimetre scale.

use image::imageops::FilterType;
use image::RgbImage;
use ridgeline_core::Calibration;

use crate::model::Point;

pub const MM_PER_INCH: f64 = 25.4;
pub const DEFAULT_TARGET_DPI: f64 = 1000.0;
pub const DEFAULT_MIN_PEAK_DISTANCE: usize = 5;

/// Dips must fall this many standard deviations below the mean.
const PEAK_THRESHOLD_SIGMA: f64 = 0.7;

/// Mean RGB intensity at `max(|dx|, |dy|) + 1` evenly spaced points from
/// `a` to `b`, rounded to the nearest pixel. Pixels outside the image
/// read as 0.
pub fn sample_line(image: &RgbImage, a: Point, b: Point) -> Vec<f64> {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let steps = dx.abs().max(dy.abs()).round() as usize;
    (0..=steps)
        .map(|i| {
            let t = if steps == 0 { 0.0 } else { i as f64 / steps as f64 };
            let x = (a.x + dx * t).round();
            let y = (a.y + dy * t).round();
            intensity(image, x, y)
        })
        .collect()
}

fn intensity(image: &RgbImage, x: f64, y: f64) -> f64 {
    if x < 0.0 || y < 0.0 || x >= image.width() as f64 || y >= image.height() as f64 {
        return 0.0;
    }
    let p = image.get_pixel(x as u32, y as u32);
    (f64::from(p[0]) + f64::from(p[1]) + f64::from(p[2])) / 3.0
}

/// Indices of the dark dips in `values`.
///
/// A dip is a run of samples below `mean - 0.7 * stddev` (population
/// deviation); its reported index is the run's minimum. A dip closer than
/// `min_distance` to the previously reported one is dropped. Fewer than
/// three samples yield no peaks.
pub fn find_peaks(values: &[f64], min_distance: usize) -> Vec<usize> {
    let mut peaks = Vec::new();
    if values.len() < 3 {
        return peaks;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    let threshold = mean - variance.sqrt() * PEAK_THRESHOLD_SIGMA;

    let far_enough =
        |peaks: &[usize], idx: usize| peaks.last().map_or(true, |&last| idx - last >= min_distance);

    // (index, value) of the minimum of the current dip
    let mut dip: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        if v < threshold {
            dip = match dip {
                Some((_, min)) if v >= min => dip,
                _ => Some((i, v)),
            };
        } else if let Some((idx, _)) = dip.take() {
            if far_enough(&peaks, idx) {
                peaks.push(idx);
            }
        }
    }
    if let Some((idx, _)) = dip {
        if far_enough(&peaks, idx) {
            peaks.push(idx);
        }
    }
    peaks
}

/// Mean gap between successive peaks, in samples. `None` below two peaks.
pub fn pixels_per_mm(peaks: &[usize]) -> Option<f64> {
    if peaks.len() < 2 {
        return None;
    }
    let total: usize = peaks.windows(2).map(|w| w[1] - w[0]).sum();
    Some(total as f64 / (peaks.len() - 1) as f64)
}

/// Resolution implied by a pixels-per-millimetre scale.
pub fn dpi(pixels_per_mm: f64) -> f64 {
    pixels_per_mm * MM_PER_INCH
}

/// Factor that rescales an image with the given tick peaks to `target_dpi`.
pub fn dpi_scale_factor(peaks: &[usize], target_dpi: f64) -> Option<f64> {
    let ppm = pixels_per_mm(peaks)?;
    (ppm > 0.0).then(|| target_dpi / dpi(ppm))
}

/// Result of measuring a ruler line.
#[derive(Debug, Clone, PartialEq)]
pub struct RulerReading {
    pub peaks: Vec<usize>,
    /// Image positions of the detected ticks.
    pub tick_points: Vec<Point>,
    pub pixels_per_mm: f64,
}

impl RulerReading {
    pub fn calibration(&self) -> Calibration {
        Calibration::new("mm", self.pixels_per_mm)
    }

    pub fn dpi(&self) -> f64 {
        dpi(self.pixels_per_mm)
    }
}

/// Samples `a`..`b`, detects ticks and derives the scale.
///
/// Sample gaps are converted to image pixels using the sample spacing, so
/// diagonal lines measure correctly. `None` when fewer than two ticks
/// are found.
pub fn calibration_from_ruler(
    image: &RgbImage,
    a: Point,
    b: Point,
    min_distance: usize,
) -> Option<RulerReading> {
    let values = sample_line(image, a, b);
    let peaks = find_peaks(&values, min_distance);
    let samples_per_mm = pixels_per_mm(&peaks)?;
    let steps = (values.len() - 1).max(1) as f64;
    let step_length = a.distance_to(&b) / steps;
    let tick_points = peaks
        .iter()
        .map(|&i| {
            let t = i as f64 / steps;
            Point::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
        })
        .collect();

    tracing::info!(
        "Ruler: {} ticks, {:.3} px/mm ({:.0} dpi)",
        peaks.len(),
        samples_per_mm * step_length,
        dpi(samples_per_mm * step_length)
    );
    Some(RulerReading {
        peaks,
        tick_points,
        pixels_per_mm: samples_per_mm * step_length,
    })
}

/// Resamples `image` by `factor`.
pub fn rescale_image(image: &RgbImage, factor: f64) -> RgbImage {
    let width = ((image.width() as f64 * factor).round() as u32).max(1);
    let height = ((image.height() as f64 * factor).round() as u32).max(1);
    image::imageops::resize(image, width, height, FilterType::Triangle)
}
