//! Hit testing for the selection tool.

use crate::model::{distance_to_segment, Marking, MarkingShape, Point};

/// Label of the topmost marking within `tolerance` image pixels of `p`.
///
/// Later markings are drawn on top, so the list is searched back to front.
pub fn hit_test(markings: &[Marking], p: Point, tolerance: f64) -> Option<u32> {
    markings
        .iter()
        .rev()
        .find(|m| contains(m, p, tolerance))
        .map(|m| m.label)
}

fn contains(marking: &Marking, p: Point, tolerance: f64) -> bool {
    let origin = marking.origin;
    match &marking.shape {
        MarkingShape::Point | MarkingShape::Ray { .. } => origin.distance_to(&p) <= tolerance,
        MarkingShape::LineSegment { endpoint } | MarkingShape::Measurement { endpoint } => {
            distance_to_segment(p, origin, *endpoint) <= tolerance
        }
        MarkingShape::BoundingBox { endpoint } => {
            let (min_x, max_x) = (origin.x.min(endpoint.x), origin.x.max(endpoint.x));
            let (min_y, max_y) = (origin.y.min(endpoint.y), origin.y.max(endpoint.y));
            p.x >= min_x - tolerance
                && p.x <= max_x + tolerance
                && p.y >= min_y - tolerance
                && p.y <= max_y + tolerance
        }
        MarkingShape::Polygon { points } | MarkingShape::Rectangle { points } => {
            near_outline(points, p, tolerance) || (points.len() >= 3 && inside(points, p))
        }
    }
}

fn near_outline(points: &[Point], p: Point, tolerance: f64) -> bool {
    match points {
        [] => false,
        [only] => only.distance_to(&p) <= tolerance,
        _ => points
            .windows(2)
            .chain(std::iter::once(
                [points[points.len() - 1], points[0]].as_slice(),
            ))
            .any(|edge| distance_to_segment(p, edge[0], edge[1]) <= tolerance),
    }
}

/// Even-odd point-in-polygon test.
fn inside(points: &[Point], p: Point) -> bool {
    let mut inside = false;
    let mut j = points.len() - 1;
    for i in 0..points.len() {
        let (a, b) = (points[i], points[j]);
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}
