//! Per-shape paint routines.
//!
//! All sizes are in surface pixels. Marking coordinates are projected with
//! [`Projection`] first; ray direction and cap sizes are not scaled.

use ridgeline_core::Calibration;

use super::surface::{text_extent, DrawSurface, LineStyle, TextStyle};
use crate::model::{rotate_about, Color, Marking, MarkingShape, MarkingType, Point, ViewportRatios};

const LINE_WIDTH: f64 = 2.0;
const SHADOW_WIDTH: f64 = 0.5;
const RAY_LENGTH: f64 = 4.0;
const HALO_PADDING: f64 = 2.0;
const TICK_SIZE: f64 = 10.0;
const DISTANCE_TEXT_OFFSET: f64 = 15.0;
const DISTANCE_TEXT_SIZE: f64 = 14.0;
const FILL_ALPHA: f64 = 0.3;
/// Measurements shorter than this (image pixels) are not drawn.
const MIN_DRAWN_MEASUREMENT_PX: f64 = 0.1;

const HALO: Color = Color::rgba(0x00, 0x00, 0xff, 0x80);
const MEASUREMENT_HALO: Color = Color::rgba(0x00, 0x00, 0xff, 0x4d);
const LABEL_BACKDROP: Color = Color::rgba(0x00, 0x00, 0x00, 0xb3);
const DISTANCE_BACKDROP: Color = Color::rgba(0x00, 0x00, 0x00, 0x99);
const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);

/// Image space to surface space: ratio scaling, then rotation about the
/// image's visual centre.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub ratios: ViewportRatios,
    pub rotation: f64,
    pub center: Point,
}

impl Projection {
    pub fn new(ratios: ViewportRatios, rotation: f64, image_width: f64, image_height: f64) -> Self {
        Self {
            ratios,
            rotation,
            center: Point::new(
                image_width / 2.0 * ratios.width,
                image_height / 2.0 * ratios.height,
            ),
        }
    }

    pub fn apply(&self, p: Point) -> Point {
        let v = self.ratios.project(p);
        rotate_about(v, self.rotation, self.center.x, self.center.y)
    }
}

/// How one marking is painted.
#[derive(Debug, Clone, Copy)]
pub struct PaintStyle<'a> {
    pub marking_type: &'a MarkingType,
    pub emphasize: bool,
    pub show_labels: bool,
    /// Layer opacity multiplied into every colour.
    pub alpha: f64,
    pub calibration: &'a Calibration,
}

impl PaintStyle<'_> {
    fn background(&self) -> Color {
        self.marking_type.background_color.with_alpha(self.alpha)
    }

    fn text(&self) -> Color {
        self.marking_type.text_color.with_alpha(self.alpha)
    }

    fn size(&self) -> f64 {
        self.marking_type.size
    }
}

/// Font size for a numeric label: shrinks with the digit count, clamped
/// to 6..=32.
pub fn label_font_size(text: &str, size: f64) -> f64 {
    let len = text.chars().count();
    let divisor = if len == 1 { 1.0 } else { len as f64 * 0.58 };
    ((size * 2.0) / divisor).ceil().clamp(6.0, 32.0)
}

pub fn paint_marking(
    surface: &mut dyn DrawSurface,
    marking: &Marking,
    projection: &Projection,
    style: &PaintStyle<'_>,
) {
    let origin = projection.apply(marking.origin);
    match &marking.shape {
        MarkingShape::Point => {
            if style.emphasize {
                halo(surface, origin, origin, style);
            }
            cap(surface, origin, style);
            label_or_hole(surface, marking.label, origin, style);
        }
        MarkingShape::Ray { angle_rad } => {
            if style.emphasize {
                halo(surface, origin, origin, style);
            }
            let direction = angle_rad + projection.rotation;
            let length = RAY_LENGTH * style.size();
            let tip = Point::new(
                origin.x + direction.cos() * length,
                origin.y + direction.sin() * length,
            );
            outlined_line(surface, origin, tip, style);
            cap(surface, origin, style);
            label_or_hole(surface, marking.label, origin, style);
        }
        MarkingShape::LineSegment { endpoint } => {
            let end = projection.apply(*endpoint);
            if style.emphasize {
                halo(surface, origin, origin, style);
            }
            outlined_line(surface, origin, end, style);
            cap(surface, origin, style);
            label_or_hole(surface, marking.label, origin, style);
            cap(surface, end, style);
            hole(surface, end, style);
        }
        MarkingShape::Measurement { endpoint } => {
            let distance = marking.origin.distance_to(endpoint);
            if distance < MIN_DRAWN_MEASUREMENT_PX {
                return;
            }
            let end = projection.apply(*endpoint);
            measurement(surface, origin, end, style.calibration.format_distance(distance), style);
        }
        MarkingShape::BoundingBox { endpoint } => {
            let end = projection.apply(*endpoint);
            bounding_box(surface, marking.label, origin, end, style);
        }
        MarkingShape::Polygon { points } | MarkingShape::Rectangle { points } => {
            let projected: Vec<Point> = points.iter().map(|p| projection.apply(*p)).collect();
            polygon(surface, marking.label, &projected, style);
        }
    }
}

fn halo(surface: &mut dyn DrawSurface, min: Point, max: Point, style: &PaintStyle<'_>) {
    let pad = style.size() + HALO_PADDING;
    surface.rect(
        Point::new(min.x - pad, min.y - pad),
        Point::new(max.x + pad, max.y + pad),
        Some(HALO),
        Some(LineStyle::new(style.text(), 1.0)),
    );
}

/// Filled circle with a thin outline.
fn cap(surface: &mut dyn DrawSurface, at: Point, style: &PaintStyle<'_>) {
    surface.circle(
        at,
        style.size(),
        Some(style.background()),
        Some(LineStyle::new(style.text(), SHADOW_WIDTH)),
    );
}

fn hole(surface: &mut dyn DrawSurface, at: Point, style: &PaintStyle<'_>) {
    let radius = style.size() - LINE_WIDTH - 1.0 - SHADOW_WIDTH;
    if radius > 0.0 {
        surface.circle(
            at,
            radius,
            None,
            Some(LineStyle::new(style.text(), SHADOW_WIDTH)),
        );
    }
}

fn label_or_hole(surface: &mut dyn DrawSurface, label: u32, at: Point, style: &PaintStyle<'_>) {
    if !style.show_labels {
        hole(surface, at, style);
        return;
    }
    let text = label.to_string();
    surface.text(
        &text,
        at,
        &TextStyle {
            size: label_font_size(&text, style.size()),
            color: style.text(),
            backdrop: Some(LABEL_BACKDROP.with_alpha(style.alpha)),
        },
    );
}

/// Background-coloured line over a slightly wider text-coloured one.
fn outlined_line(surface: &mut dyn DrawSurface, from: Point, to: Point, style: &PaintStyle<'_>) {
    surface.line(
        from,
        to,
        LineStyle::new(style.text(), LINE_WIDTH + 3.0 * SHADOW_WIDTH),
    );
    surface.line(from, to, LineStyle::new(style.background(), LINE_WIDTH));
}

fn measurement(
    surface: &mut dyn DrawSurface,
    from: Point,
    to: Point,
    text: String,
    style: &PaintStyle<'_>,
) {
    if style.emphasize {
        surface.line(
            from,
            to,
            LineStyle::new(MEASUREMENT_HALO, style.size() + 4.0),
        );
    }
    let line = LineStyle::new(style.text(), LINE_WIDTH);
    surface.line(from, to, line);

    let perp = (to.y - from.y).atan2(to.x - from.x) - std::f64::consts::FRAC_PI_2;
    let (px, py) = (perp.cos(), perp.sin());
    let half_tick = TICK_SIZE / 2.0;
    for c in [from, to] {
        surface.line(
            Point::new(c.x + px * half_tick, c.y + py * half_tick),
            Point::new(c.x - px * half_tick, c.y - py * half_tick),
            line,
        );
    }

    let mid = Point::new((from.x + to.x) / 2.0, (from.y + to.y) / 2.0);
    surface.text(
        &text,
        Point::new(
            mid.x + px * DISTANCE_TEXT_OFFSET,
            mid.y + py * DISTANCE_TEXT_OFFSET,
        ),
        &TextStyle {
            size: DISTANCE_TEXT_SIZE,
            color: WHITE,
            backdrop: Some(DISTANCE_BACKDROP),
        },
    );
}

fn bounding_box(
    surface: &mut dyn DrawSurface,
    label: u32,
    a: Point,
    b: Point,
    style: &PaintStyle<'_>,
) {
    let min = Point::new(a.x.min(b.x), a.y.min(b.y));
    let max = Point::new(a.x.max(b.x), a.y.max(b.y));
    if style.emphasize {
        halo(surface, min, max, style);
    }
    surface.rect(
        min,
        max,
        Some(style.background().with_alpha(FILL_ALPHA)),
        Some(LineStyle::new(style.text(), LINE_WIDTH)),
    );

    if style.show_labels {
        // Tab above the top-left corner.
        let text = label.to_string();
        let size = style.size() * 1.5;
        let (w, h) = text_extent(&text, size);
        let padding = 4.0;
        let tab_min = Point::new(min.x, min.y - h - padding);
        let tab_max = Point::new(min.x + w + padding * 2.0, min.y);
        surface.rect(tab_min, tab_max, Some(style.background()), None);
        surface.text(
            &text,
            Point::new((tab_min.x + tab_max.x) / 2.0, (tab_min.y + tab_max.y) / 2.0),
            &TextStyle {
                size,
                color: style.text(),
                backdrop: None,
            },
        );
    }
}

fn polygon(surface: &mut dyn DrawSurface, label: u32, points: &[Point], style: &PaintStyle<'_>) {
    let Some(first) = points.first().copied() else {
        return;
    };
    if style.emphasize {
        let min = points
            .iter()
            .fold(first, |m, p| Point::new(m.x.min(p.x), m.y.min(p.y)));
        let max = points
            .iter()
            .fold(first, |m, p| Point::new(m.x.max(p.x), m.y.max(p.y)));
        halo(surface, min, max, style);
    }

    let closed = points.len() > 2;
    surface.polyline(
        points,
        closed,
        LineStyle::new(style.background(), LINE_WIDTH),
    );
    if closed {
        surface.polygon(points, style.background().with_alpha(FILL_ALPHA));
    }
    cap(surface, first, style);
    label_or_hole(surface, label, first, style);
}
