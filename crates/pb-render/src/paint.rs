//! Stroke primitives → raster pixels.
//!
//! Strokes are rasterized without anti-aliasing: a pixel is painted when its
//! center lies inside the stroked shape. Segments carry round caps, so a
//! freehand polyline drawn segment by segment has round joins.

use crate::raster::Raster;
use font8x8::UnicodeFonts;
use kurbo::{Line, ParamCurveNearest, Point, Rect};
use pb_core::model::Color;

/// Pen state applied to every primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub color: Color,
    pub width: f64,
}

impl StrokeStyle {
    pub fn new(color: Color, width: f64) -> Self {
        Self { color, width }
    }

    fn half_width(&self) -> f64 {
        (self.width / 2.0).max(0.5)
    }
}

/// Integer pixel range covering `rect`, clipped to the raster.
fn pixel_span(raster: &Raster, rect: Rect) -> Option<(i64, i64, i64, i64)> {
    let x0 = rect.x0.floor().max(0.0) as i64;
    let y0 = rect.y0.floor().max(0.0) as i64;
    let x1 = (rect.x1.ceil() as i64).min(raster.width() as i64 - 1);
    let y1 = (rect.y1.ceil() as i64).min(raster.height() as i64 - 1);
    if x0 > x1 || y0 > y1 {
        return None;
    }
    Some((x0, y0, x1, y1))
}

fn center(x: i64, y: i64) -> Point {
    Point::new(x as f64 + 0.5, y as f64 + 0.5)
}

fn distance_sq_to_segment(line: &Line, p: Point) -> f64 {
    if line.p0 == line.p1 {
        return (p - line.p0).hypot2();
    }
    line.nearest(p, 1e-9).distance_sq
}

/// Stroke one straight segment with round caps.
pub fn stroke_segment(raster: &mut Raster, from: Point, to: Point, style: &StrokeStyle) {
    let half = style.half_width();
    let line = Line::new(from, to);
    let bounds = Rect::from_points(from, to).inflate(half, half);
    let Some((x0, y0, x1, y1)) = pixel_span(raster, bounds) else {
        return;
    };
    let limit = half * half;
    for y in y0..=y1 {
        for x in x0..=x1 {
            if distance_sq_to_segment(&line, center(x, y)) <= limit {
                raster.blend(x, y, style.color);
            }
        }
    }
}

/// Stroke a rectangle outline spanning two opposite corners.
pub fn stroke_rect(raster: &mut Raster, corner: Point, opposite: Point, style: &StrokeStyle) {
    let rect = Rect::from_points(corner, opposite);
    let half = style.half_width();
    let outer = rect.inflate(half, half);
    let Some((x0, y0, x1, y1)) = pixel_span(raster, outer) else {
        return;
    };
    let edges = [
        Line::new((rect.x0, rect.y0), (rect.x1, rect.y0)),
        Line::new((rect.x1, rect.y0), (rect.x1, rect.y1)),
        Line::new((rect.x1, rect.y1), (rect.x0, rect.y1)),
        Line::new((rect.x0, rect.y1), (rect.x0, rect.y0)),
    ];
    let limit = half * half;
    // One pass over the area so corner pixels are not blended twice.
    for y in y0..=y1 {
        for x in x0..=x1 {
            let p = center(x, y);
            if edges
                .iter()
                .any(|edge| distance_sq_to_segment(edge, p) <= limit)
            {
                raster.blend(x, y, style.color);
            }
        }
    }
}

/// Stroke a circle outline.
pub fn stroke_circle(raster: &mut Raster, middle: Point, radius: f64, style: &StrokeStyle) {
    let half = style.half_width();
    let reach = radius + half;
    let bounds = Rect::new(
        middle.x - reach,
        middle.y - reach,
        middle.x + reach,
        middle.y + reach,
    );
    let Some((x0, y0, x1, y1)) = pixel_span(raster, bounds) else {
        return;
    };
    for y in y0..=y1 {
        for x in x0..=x1 {
            let d = center(x, y).distance(middle);
            if (d - radius).abs() <= half {
                raster.blend(x, y, style.color);
            }
        }
    }
}

/// Fill an axis-aligned rectangle (pixel centers inside `[x0, x1) × [y0, y1)`).
pub fn fill_rect(raster: &mut Raster, rect: Rect, color: Color) {
    let Some((x0, y0, x1, y1)) = pixel_span(raster, rect) else {
        return;
    };
    for y in y0..=y1 {
        for x in x0..=x1 {
            let p = center(x, y);
            if p.x >= rect.x0 && p.x < rect.x1 && p.y >= rect.y0 && p.y < rect.y1 {
                raster.blend(x, y, color);
            }
        }
    }
}

fn glyph(c: char) -> Option<[u8; 8]> {
    font8x8::BASIC_FONTS
        .get(c)
        .or_else(|| font8x8::LATIN_FONTS.get(c))
}

/// Fill `text` with its alphabetic baseline at `origin`, `size` pixels tall.
///
/// Uses the 8×8 bitmap font scaled to `size`. Characters without a glyph
/// advance without painting. Returns the advance width.
pub fn fill_text(raster: &mut Raster, text: &str, origin: Point, size: f64, color: Color) -> f64 {
    let cell = size / 8.0;
    let top = origin.y - size;
    let mut pen_x = origin.x;
    for c in text.chars() {
        if let Some(rows) = glyph(c) {
            for (row, bits) in rows.iter().enumerate() {
                for col in 0..8 {
                    if bits & (1u8 << col) == 0 {
                        continue;
                    }
                    let x = pen_x + col as f64 * cell;
                    let y = top + row as f64 * cell;
                    fill_rect(raster, Rect::new(x, y, x + cell, y + cell), color);
                }
            }
        } else {
            log::trace!("no glyph for {c:?}");
        }
        pen_x += size;
    }
    pen_x - origin.x
}
