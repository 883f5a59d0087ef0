//! Raster surface backed by tiny-skia.
//!
//! Labels are rasterised with rusttype from the bundled monospace font and
//! blended into the pixmap by glyph coverage.

use anyhow::{Context, Result};
use image::{Rgb, RgbImage};
use std::path::Path;
use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, PremultipliedColorU8, Rect, Stroke, Transform};

use super::font::{default_font, layout_centered};
use super::surface::{text_extent, DrawSurface, LineStyle, TextStyle};
use crate::model::{Color, Point};

/// Source-over of `color` at `coverage` onto a premultiplied pixel.
fn blend(dst: PremultipliedColorU8, color: Color, coverage: f32) -> PremultipliedColorU8 {
    let sa = f32::from(color.a) / 255.0 * coverage.clamp(0.0, 1.0);
    let inv = 1.0 - sa;
    let mix = |s: u8, d: u8| f32::from(s) * sa + f32::from(d) * inv;
    let a = (255.0 * sa + f32::from(dst.alpha()) * inv).round().clamp(0.0, 255.0) as u8;
    let channel = |s: u8, d: u8| (mix(s, d).round().clamp(0.0, 255.0) as u8).min(a);
    PremultipliedColorU8::from_rgba(
        channel(color.r, dst.red()),
        channel(color.g, dst.green()),
        channel(color.b, dst.blue()),
        a,
    )
    .unwrap_or(dst)
}

fn paint_for(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, color.a);
    paint.anti_alias = true;
    paint
}

fn stroke_for(style: &LineStyle) -> Stroke {
    Stroke {
        width: style.width as f32,
        ..Default::default()
    }
}

fn rect_between(min: Point, max: Point) -> Option<Rect> {
    Rect::from_ltrb(
        min.x.min(max.x) as f32,
        min.y.min(max.y) as f32,
        min.x.max(max.x) as f32,
        min.y.max(max.y) as f32,
    )
}

pub struct PixmapSurface {
    pixmap: Pixmap,
    background: Color,
}

impl PixmapSurface {
    /// Returns `None` for a zero-sized surface.
    pub fn new(width: u32, height: u32, background: Color) -> Option<Self> {
        let mut pixmap = Pixmap::new(width, height)?;
        pixmap.fill(tiny_skia::Color::from_rgba8(
            background.r,
            background.g,
            background.b,
            background.a,
        ));
        Some(Self { pixmap, background })
    }

    /// Flattens the surface onto an opaque RGB image.
    pub fn to_rgb_image(&self) -> RgbImage {
        let (width, height) = (self.pixmap.width(), self.pixmap.height());
        let data = self.pixmap.data();
        RgbImage::from_fn(width, height, |x, y| {
            let idx = ((y * width + x) * 4) as usize;
            Rgb([data[idx], data[idx + 1], data[idx + 2]])
        })
    }

    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.to_rgb_image()
            .save(path)
            .with_context(|| format!("Failed to write image {}", path.display()))
    }

    fn fill_path(&mut self, pb: PathBuilder, color: Color) {
        if let Some(path) = pb.finish() {
            self.pixmap.fill_path(
                &path,
                &paint_for(color),
                FillRule::Winding,
                Transform::identity(),
                None,
            );
        }
    }

    fn stroke_path(&mut self, pb: PathBuilder, style: &LineStyle) {
        if let Some(path) = pb.finish() {
            self.pixmap.stroke_path(
                &path,
                &paint_for(style.color),
                &stroke_for(style),
                Transform::identity(),
                None,
            );
        }
    }

    fn draw_glyphs(&mut self, text: &str, at: Point, style: &TextStyle) {
        let Some(font) = default_font() else {
            tracing::debug!("No label font, skipping '{}'", text);
            return;
        };
        let (width, height) = (self.pixmap.width() as i32, self.pixmap.height() as i32);
        let pixels = self.pixmap.pixels_mut();
        for glyph in layout_centered(font, text, style.size, at) {
            let Some(bb) = glyph.pixel_bounding_box() else {
                continue;
            };
            glyph.draw(|gx, gy, v| {
                let x = bb.min.x + gx as i32;
                let y = bb.min.y + gy as i32;
                if x < 0 || y < 0 || x >= width || y >= height || v <= 0.0 {
                    return;
                }
                let idx = (y * width + x) as usize;
                pixels[idx] = blend(pixels[idx], style.color, v);
            });
        }
    }
}

impl DrawSurface for PixmapSurface {
    fn size(&self) -> (u32, u32) {
        (self.pixmap.width(), self.pixmap.height())
    }

    fn clear(&mut self) {
        let bg = self.background;
        self.pixmap
            .fill(tiny_skia::Color::from_rgba8(bg.r, bg.g, bg.b, bg.a));
    }

    fn circle(&mut self, center: Point, radius: f64, fill: Option<Color>, stroke: Option<LineStyle>) {
        if radius <= 0.0 {
            return;
        }
        let Some(path) = PathBuilder::from_circle(center.x as f32, center.y as f32, radius as f32)
        else {
            return;
        };
        if let Some(color) = fill {
            self.pixmap.fill_path(
                &path,
                &paint_for(color),
                FillRule::Winding,
                Transform::identity(),
                None,
            );
        }
        if let Some(style) = stroke {
            self.pixmap.stroke_path(
                &path,
                &paint_for(style.color),
                &stroke_for(&style),
                Transform::identity(),
                None,
            );
        }
    }

    fn line(&mut self, from: Point, to: Point, style: LineStyle) {
        let mut pb = PathBuilder::new();
        pb.move_to(from.x as f32, from.y as f32);
        pb.line_to(to.x as f32, to.y as f32);
        self.stroke_path(pb, &style);
    }

    fn rect(&mut self, min: Point, max: Point, fill: Option<Color>, stroke: Option<LineStyle>) {
        let Some(r) = rect_between(min, max) else {
            return;
        };
        if let Some(color) = fill {
            self.pixmap
                .fill_rect(r, &paint_for(color), Transform::identity(), None);
        }
        if let Some(style) = stroke {
            self.pixmap.stroke_path(
                &PathBuilder::from_rect(r),
                &paint_for(style.color),
                &stroke_for(&style),
                Transform::identity(),
                None,
            );
        }
    }

    fn polygon(&mut self, points: &[Point], fill: Color) {
        if points.len() < 3 {
            return;
        }
        let mut pb = PathBuilder::new();
        pb.move_to(points[0].x as f32, points[0].y as f32);
        for p in &points[1..] {
            pb.line_to(p.x as f32, p.y as f32);
        }
        pb.close();
        self.fill_path(pb, fill);
    }

    fn polyline(&mut self, points: &[Point], closed: bool, style: LineStyle) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        let mut pb = PathBuilder::new();
        pb.move_to(first.x as f32, first.y as f32);
        for p in rest {
            pb.line_to(p.x as f32, p.y as f32);
        }
        if closed {
            pb.close();
        }
        self.stroke_path(pb, &style);
    }

    fn text(&mut self, text: &str, at: Point, style: &TextStyle) {
        if let Some(backdrop) = style.backdrop {
            let (w, h) = text_extent(text, style.size);
            let pad = 2.0;
            self.rect(
                Point::new(at.x - w / 2.0 - pad, at.y - h / 2.0 - pad),
                Point::new(at.x + w / 2.0 + pad, at.y + h / 2.0 + pad),
                Some(backdrop),
                None,
            );
        }
        self.draw_glyphs(text, at, style);
    }
}
