//! Software rendering backend.
//!
//! An RGBA8 pixel buffer implementing [`RenderSurface`], so the engine can run
//! (and be tested) without a browser. Drawing follows the 2D canvas model:
//! source-over compositing, clipping at the surface edges, nearest-neighbour
//! sampling for scaled copies.

mod bitmap;
mod glyphs;

pub use bitmap::RasterImage;

use image::{Rgba, RgbaImage};

use crate::error::{CanvasError, Result};
use crate::surface::{ChunkImage, PixelRect, RenderSurface};

pub const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);
pub const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Debug labels are drawn with each font pixel doubled.
const TEXT_SCALE: i64 = 2;

#[derive(Clone, Debug, PartialEq)]
pub struct RasterSurface {
    pixels: RgbaImage,
    stroke_color: Rgba<u8>,
    fill_color: Rgba<u8>,
}

impl RasterSurface {
    /// A fully transparent surface.
    pub fn new(width: u32, height: u32) -> Self {
        Self::from_pixels(RgbaImage::new(width, height))
    }

    pub fn from_pixels(pixels: RgbaImage) -> Self {
        Self {
            pixels,
            stroke_color: BLACK,
            fill_color: BLACK,
        }
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Direct pixel access for freehand edits.
    pub fn pixels_mut(&mut self) -> &mut RgbaImage {
        &mut self.pixels
    }

    /// Pixel at `(x, y)`, or `None` outside the surface.
    pub fn pixel(&self, x: i64, y: i64) -> Option<Rgba<u8>> {
        self.in_bounds(x, y)
            .then(|| *self.pixels.get_pixel(x as u32, y as u32))
    }

    pub fn set_stroke_color(&mut self, color: Rgba<u8>) {
        self.stroke_color = color;
    }

    pub fn set_fill_color(&mut self, color: Rgba<u8>) {
        self.fill_color = color;
    }

    /// Source-over fill of a rectangle, clipped to the surface.
    pub fn fill_rect(&mut self, rect: PixelRect, color: Rgba<u8>) {
        let Some(clipped) = rect.intersect(&self.bounds()) else {
            return;
        };
        for y in clipped.y..clipped.bottom() {
            for x in clipped.x..clipped.right() {
                self.blend(x, y, color);
            }
        }
    }

    fn bounds(&self) -> PixelRect {
        PixelRect::sized(self.pixels.width(), self.pixels.height())
    }

    fn in_bounds(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && x < self.pixels.width() as i64 && y < self.pixels.height() as i64
    }

    fn blend(&mut self, x: i64, y: i64, src: Rgba<u8>) {
        if self.in_bounds(x, y) {
            blend_over(self.pixels.get_pixel_mut(x as u32, y as u32), src);
        }
    }

    fn put(&mut self, x: i64, y: i64, color: Rgba<u8>) {
        if self.in_bounds(x, y) {
            self.pixels.put_pixel(x as u32, y as u32, color);
        }
    }

    fn blit(&mut self, source: &RgbaImage, x: i64, y: i64) {
        let target = PixelRect::new(x, y, source.width() as i64, source.height() as i64);
        let Some(clipped) = target.intersect(&self.bounds()) else {
            return;
        };
        for dy in clipped.y..clipped.bottom() {
            for dx in clipped.x..clipped.right() {
                let src = *source.get_pixel((dx - x) as u32, (dy - y) as u32);
                blend_over(self.pixels.get_pixel_mut(dx as u32, dy as u32), src);
            }
        }
    }
}

impl RenderSurface for RasterSurface {
    type Image = RasterImage;

    fn width(&self) -> u32 {
        self.pixels.width()
    }

    fn height(&self) -> u32 {
        self.pixels.height()
    }

    fn create_scratch(&self, width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(CanvasError::Surface(format!(
                "cannot allocate a {width}x{height} scratch surface"
            )));
        }
        let mut scratch = RasterSurface::new(width, height);
        scratch.stroke_color = self.stroke_color;
        scratch.fill_color = self.fill_color;
        Ok(scratch)
    }

    fn draw_image(&mut self, image: &RasterImage, x: i64, y: i64) -> Result<()> {
        if !image.is_ready() {
            return Err(CanvasError::ImageNotReady);
        }
        if let Some(pixels) = image.pixels() {
            self.blit(pixels, x, y);
        }
        Ok(())
    }

    fn draw_surface_region(
        &mut self,
        source: &RasterSurface,
        src: PixelRect,
        dst: PixelRect,
    ) -> Result<()> {
        if src.is_empty() || dst.is_empty() {
            return Ok(());
        }
        let Some(clipped) = dst.intersect(&self.bounds()) else {
            return Ok(());
        };
        for dy in clipped.y..clipped.bottom() {
            let sy = src.y + (dy - dst.y) * src.height / dst.height;
            for dx in clipped.x..clipped.right() {
                let sx = src.x + (dx - dst.x) * src.width / dst.width;
                if let Some(color) = source.pixel(sx, sy) {
                    blend_over(self.pixels.get_pixel_mut(dx as u32, dy as u32), color);
                }
            }
        }
        Ok(())
    }

    fn clear_rect(&mut self, rect: PixelRect) {
        let Some(clipped) = rect.intersect(&self.bounds()) else {
            return;
        };
        for y in clipped.y..clipped.bottom() {
            for x in clipped.x..clipped.right() {
                self.pixels.put_pixel(x as u32, y as u32, TRANSPARENT);
            }
        }
    }

    fn stroke_rect(&mut self, rect: PixelRect) {
        if rect.is_empty() {
            return;
        }
        let color = self.stroke_color;
        for x in rect.x..rect.right() {
            self.put(x, rect.y, color);
            self.put(x, rect.bottom() - 1, color);
        }
        for y in rect.y..rect.bottom() {
            self.put(rect.x, y, color);
            self.put(rect.right() - 1, y, color);
        }
    }

    fn fill_text(&mut self, text: &str, x: i64, y: i64) -> Result<()> {
        let color = self.fill_color;
        for (px, py) in glyphs::text_pixels(text, TEXT_SCALE) {
            self.blend(x + px, y + py, color);
        }
        Ok(())
    }

    fn encode(&self) -> Result<Vec<u8>> {
        bitmap::encode_png(&self.pixels)
    }
}

/// Source-over compositing of `src` onto `dst`.
///
/// Exact when either side is fully opaque or `dst` is fully transparent, so
/// copying onto a cleared surface reproduces the source bit for bit.
fn blend_over(dst: &mut Rgba<u8>, src: Rgba<u8>) {
    let sa = src[3] as u32;
    if sa == 0 {
        return;
    }
    let da = dst[3] as u32;
    if sa == 255 || da == 0 {
        *dst = src;
        return;
    }
    // alpha scaled by 255
    let out_a = sa * 255 + da * (255 - sa);
    for c in 0..3 {
        let num = src[c] as u32 * sa * 255 + dst[c] as u32 * da * (255 - sa);
        dst[c] = ((num + out_a / 2) / out_a) as u8;
    }
    dst[3] = ((out_a + 127) / 255) as u8;
}
