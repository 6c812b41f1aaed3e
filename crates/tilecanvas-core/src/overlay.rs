use crate::coords::{ChunkKey, Point};
use crate::error::Result;
use crate::surface::{PixelRect, RenderSurface};

/// Debug decoration drawn into every composited chunk: a border along the
/// chunk's full extent and its key as a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebugOverlay {
    chunk_width: u32,
    chunk_height: u32,
    label_offset: Point,
}

impl DebugOverlay {
    pub fn new(chunk_width: u32, chunk_height: u32) -> Self {
        Self {
            chunk_width,
            chunk_height,
            label_offset: Point::new(15, 15),
        }
    }

    pub fn decorate<S: RenderSurface>(&self, surface: &mut S, key: ChunkKey) -> Result<()> {
        surface.stroke_rect(PixelRect::sized(self.chunk_width, self.chunk_height));
        surface.fill_text(&key.to_string(), self.label_offset.x, self.label_offset.y)
    }
}
