use image::{ImageFormat, RgbaImage};
use std::io::Cursor;

use crate::error::{CanvasError, Result};
use crate::surface::ChunkImage;

#[derive(Clone, Debug, PartialEq)]
enum ImageState {
    /// Never drawn into
    Blank,
    /// Encoded bytes supplied but not decoded yet
    Loading(Vec<u8>),
    Ready { png: Vec<u8>, pixels: RgbaImage },
}

/// Chunk image of the software backend.
///
/// Stored as PNG bytes (the in-memory encoded form) alongside the decoded
/// pixels that blits read from.
#[derive(Clone, Debug, PartialEq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    state: ImageState,
}

impl RasterImage {
    /// Decode a PNG into a ready image.
    pub fn from_png(png: Vec<u8>) -> Result<Self> {
        let pixels = decode_png(&png)?;
        Ok(Self {
            width: pixels.width(),
            height: pixels.height(),
            state: ImageState::Ready { png, pixels },
        })
    }

    /// Encode raw pixels into a ready image.
    pub fn from_pixels(pixels: RgbaImage) -> Result<Self> {
        let png = encode_png(&pixels)?;
        Ok(Self {
            width: pixels.width(),
            height: pixels.height(),
            state: ImageState::Ready { png, pixels },
        })
    }

    /// An image whose PNG has been handed over but not decoded yet.
    ///
    /// Drawing it fails with [`CanvasError::ImageNotReady`] until
    /// [`finish_loading`](Self::finish_loading) is called.
    pub fn loading(png: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            state: ImageState::Loading(png),
        }
    }

    /// Decode a pending PNG. No-op for images that are not loading.
    pub fn finish_loading(&mut self) -> Result<()> {
        if let ImageState::Loading(png) = &mut self.state {
            let pixels = decode_png(png)?;
            let png = std::mem::take(png);
            self.width = pixels.width();
            self.height = pixels.height();
            self.state = ImageState::Ready { png, pixels };
        }
        Ok(())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Decoded pixels, if the image is ready and has content.
    pub fn pixels(&self) -> Option<&RgbaImage> {
        match &self.state {
            ImageState::Ready { pixels, .. } => Some(pixels),
            _ => None,
        }
    }

    /// Encoded bytes, if any were ever supplied.
    pub fn png(&self) -> Option<&[u8]> {
        match &self.state {
            ImageState::Blank => None,
            ImageState::Loading(png) | ImageState::Ready { png, .. } => Some(png),
        }
    }
}

impl ChunkImage for RasterImage {
    type Encoded = Vec<u8>;

    fn blank(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            state: ImageState::Blank,
        }
    }

    fn is_ready(&self) -> bool {
        !matches!(self.state, ImageState::Loading(_))
    }

    fn has_content(&self) -> bool {
        !matches!(self.state, ImageState::Blank)
    }

    fn replace_with(&mut self, encoded: Vec<u8>) -> Result<()> {
        *self = RasterImage::from_png(encoded)?;
        Ok(())
    }
}

pub(crate) fn encode_png(pixels: &RgbaImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    {
        let mut cursor = Cursor::new(&mut bytes);
        pixels
            .write_to(&mut cursor, ImageFormat::Png)
            .map_err(|e| CanvasError::Encode(e.to_string()))?;
    }
    Ok(bytes)
}

pub(crate) fn decode_png(png: &[u8]) -> Result<RgbaImage> {
    let decoded = image::load_from_memory_with_format(png, ImageFormat::Png)
        .map_err(|e| CanvasError::Decode(e.to_string()))?;
    Ok(decoded.to_rgba8())
}
