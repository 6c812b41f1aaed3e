//! Interfaces the engine needs from a rendering backend.
//!
//! The engine never touches pixels itself. It asks a [`RenderSurface`] to
//! blit chunk images, copy regions between surfaces and encode its contents,
//! and it stores whatever [`ChunkImage`] type the surface works with.

use crate::error::Result;

/// An axis-aligned pixel rectangle. Width and height may be zero or negative,
/// in which case the rectangle is empty.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PixelRect {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl PixelRect {
    pub fn new(x: i64, y: i64, width: i64, height: i64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle at the origin covering `width × height`.
    pub fn sized(width: u32, height: u32) -> Self {
        Self::new(0, 0, width as i64, height as i64)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    pub fn right(&self) -> i64 {
        self.x.saturating_add(self.width)
    }

    pub fn bottom(&self) -> i64 {
        self.y.saturating_add(self.height)
    }

    /// Overlap of two rectangles, if any.
    pub fn intersect(&self, other: &PixelRect) -> Option<PixelRect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let rect = PixelRect::new(
            x,
            y,
            self.right().min(other.right()).saturating_sub(x),
            self.bottom().min(other.bottom()).saturating_sub(y),
        );
        (!rect.is_empty()).then_some(rect)
    }
}

/// Per-chunk pixel storage handle.
pub trait ChunkImage: Sized {
    /// Encoded form produced by [`RenderSurface::encode`].
    type Encoded;

    /// An image with no content yet, sized to one chunk.
    fn blank(width: u32, height: u32) -> Self;

    /// Whether the image can be drawn right now. Images still decoding
    /// report `false` and fail to blit with [`CanvasError::ImageNotReady`].
    ///
    /// [`CanvasError::ImageNotReady`]: crate::CanvasError::ImageNotReady
    fn is_ready(&self) -> bool;

    /// Whether the image carries any pixels (blank images do not).
    fn has_content(&self) -> bool;

    /// Replace the image wholesale with an encoded source.
    fn replace_with(&mut self, encoded: Self::Encoded) -> Result<()>;
}

/// A drawable and readable pixel surface.
///
/// Used both for the live surface the user sees and for the chunk-sized
/// scratch surface the compositor blends in.
pub trait RenderSurface {
    type Image: ChunkImage;

    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Create another surface of the same backend, e.g. the compositor's scratch buffer.
    fn create_scratch(&self, width: u32, height: u32) -> Result<Self>
    where
        Self: Sized;

    /// Draw a whole image with its top-left corner at `(x, y)`.
    fn draw_image(&mut self, image: &Self::Image, x: i64, y: i64) -> Result<()>;

    /// Copy the `src` region of `source` onto `dst`, scaling if the sizes differ.
    fn draw_surface_region(&mut self, source: &Self, src: PixelRect, dst: PixelRect) -> Result<()>
    where
        Self: Sized;

    /// Make the rectangle fully transparent.
    fn clear_rect(&mut self, rect: PixelRect);

    fn clear(&mut self) {
        let rect = PixelRect::sized(self.width(), self.height());
        self.clear_rect(rect);
    }

    /// Outline the rectangle in the surface's stroke colour.
    fn stroke_rect(&mut self, rect: PixelRect);

    /// Draw text with its top-left corner at `(x, y)`.
    fn fill_text(&mut self, text: &str, x: i64, y: i64) -> Result<()>;

    /// Read the surface back in the encoded form its images are built from.
    fn encode(&self) -> Result<<Self::Image as ChunkImage>::Encoded>;
}
