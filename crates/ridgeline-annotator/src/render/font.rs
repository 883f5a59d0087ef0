//! Label font.

use rusttype::{point, Font, PositionedGlyph, Scale};
use std::sync::OnceLock;

use crate::model::Point;

/// Bundled DejaVu Sans Mono. Monospace keeps rasterised labels in line
/// with [`text_extent`](super::text_extent).
pub fn default_font() -> Option<&'static Font<'static>> {
    static FONT: OnceLock<Option<Font<'static>>> = OnceLock::new();
    FONT.get_or_init(|| {
        let font_data = include_bytes!("../../assets/fonts/DejaVuSansMono.ttf");
        let font = Font::try_from_bytes(font_data as &[u8]);
        if font.is_none() {
            tracing::error!("Bundled label font is invalid; labels will not be drawn");
        }
        font
    })
    .as_ref()
}

/// Glyphs of `text` at `size` pixels, centred on `center`.
pub fn layout_centered(
    font: &Font<'static>,
    text: &str,
    size: f64,
    center: Point,
) -> Vec<PositionedGlyph<'static>> {
    let scale = Scale::uniform(size as f32);
    let v_metrics = font.v_metrics(scale);
    let glyphs: Vec<_> = font
        .layout(text, scale, point(0.0, v_metrics.ascent))
        .collect();
    let width = glyphs
        .last()
        .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
        .unwrap_or(0.0);
    let height = v_metrics.ascent - v_metrics.descent;
    let dx = center.x as f32 - width / 2.0;
    let dy = center.y as f32 - height / 2.0;
    glyphs
        .into_iter()
        .map(|g| {
            let p = g.position();
            g.into_unpositioned().positioned(point(p.x + dx, p.y + dy))
        })
        .collect()
}
