//! RGBA pixel buffer backing the whiteboard.
//!
//! Mirrors the semantics of an HTML canvas bitmap: starts fully
//! transparent, resizing discards the content, and images are drawn at the
//! top-left and clipped to the overlap.

use pb_core::model::Color;

#[derive(Clone, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl std::fmt::Debug for Raster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Raster({}x{})", self.width, self.height)
    }
}

impl Raster {
    /// A transparent raster. Zero dimensions are bumped to 1 pixel so the
    /// bitmap can always be encoded.
    pub fn new(width: u32, height: u32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            pixels: vec![Color::TRANSPARENT; (width as usize) * (height as usize)],
        }
    }

    /// Build from tightly packed RGBA8 bytes. `None` if the length does not
    /// match the dimensions.
    pub fn from_rgba(width: u32, height: u32, bytes: &[u8]) -> Option<Self> {
        if width == 0 || height == 0 || bytes.len() != (width as usize) * (height as usize) * 4 {
            return None;
        }
        let pixels = bytes
            .chunks_exact(4)
            .map(|p| Color::rgba(p[0], p[1], p[2], p[3]))
            .collect();
        Some(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn index(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    pub fn pixel(&self, x: i64, y: i64) -> Option<Color> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Overwrite one pixel. Out-of-bounds writes are clipped.
    pub fn put(&mut self, x: i64, y: i64, color: Color) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color;
        }
    }

    /// Source-over composite one pixel.
    pub fn blend(&mut self, x: i64, y: i64, color: Color) {
        let Some(i) = self.index(x, y) else {
            return;
        };
        if color.a == 255 {
            self.pixels[i] = color;
            return;
        }
        if color.a == 0 {
            return;
        }
        self.pixels[i] = source_over(color, self.pixels[i]);
    }

    /// Erase to transparent (`clearRect` over the whole canvas).
    pub fn clear(&mut self) {
        self.pixels.fill(Color::TRANSPARENT);
    }

    pub fn fill(&mut self, color: Color) {
        self.pixels.fill(color);
    }

    /// Change dimensions. Like a canvas, this discards the bitmap.
    pub fn resize(&mut self, width: u32, height: u32) {
        *self = Self::new(width, height);
    }

    /// Draw `src` at the top-left corner, clipped to the overlapping region.
    pub fn draw_image(&mut self, src: &Raster) {
        let w = self.width.min(src.width) as usize;
        let h = self.height.min(src.height) as usize;
        for y in 0..h {
            let dst_row = y * self.width as usize;
            let src_row = y * src.width as usize;
            for x in 0..w {
                let color = src.pixels[src_row + x];
                let dst = &mut self.pixels[dst_row + x];
                *dst = match color.a {
                    255 => color,
                    0 => *dst,
                    _ => source_over(color, *dst),
                };
            }
        }
    }

    /// Replace the content with `src` (clear, then draw at the origin).
    pub fn restore_from(&mut self, src: &Raster) {
        self.clear();
        self.draw_image(src);
    }

    /// Tightly packed RGBA8 bytes, row-major.
    pub fn to_rgba(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|c| [c.r, c.g, c.b, c.a])
            .collect()
    }

    /// Count pixels matching `pred`.
    pub fn count(&self, pred: impl Fn(Color) -> bool) -> usize {
        self.pixels.iter().filter(|c| pred(**c)).count()
    }

    pub fn is_blank(&self) -> bool {
        self.pixels.iter().all(|c| c.a == 0)
    }
}

fn source_over(src: Color, dst: Color) -> Color {
    let sa = src.a as u32;
    let da = dst.a as u32;
    let out_a = sa * 255 + da * (255 - sa);
    if out_a == 0 {
        return Color::TRANSPARENT;
    }
    let mix = |s: u8, d: u8| -> u8 {
        let num = s as u32 * sa * 255 + d as u32 * da * (255 - sa);
        ((num + out_a / 2) / out_a) as u8
    };
    Color::rgba(
        mix(src.r, dst.r),
        mix(src.g, dst.g),
        mix(src.b, dst.b),
        ((out_a + 127) / 255) as u8,
    )
}
