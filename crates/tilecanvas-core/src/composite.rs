//! Flushing edits on the live surface back into chunk storage.
//!
//! Freehand drawing happens on the shared live surface, but content outlives
//! a pan only once it has been copied into the chunks underneath. For every
//! chunk in the viewport the compositor:
//!
//! 1. works out which part of the chunk is on screen ([`plan_copy`]),
//! 2. starts a chunk-sized scratch surface from the chunk's stored content,
//! 3. replaces the on-screen part with the live surface's pixels,
//! 4. optionally decorates it ([`DebugOverlay`]),
//! 5. encodes the scratch surface back into the chunk.

use crate::chunk::ChunkStore;
use crate::config::CanvasConfig;
use crate::coords::{ChunkGrid, ChunkKey, Point};
use crate::error::Result;
use crate::overlay::DebugOverlay;
use crate::surface::{ChunkImage, PixelRect, RenderSurface};

/// How one chunk overlaps the live surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopyPlan {
    pub key: ChunkKey,
    /// Region of the live surface covered by the chunk.
    pub source: PixelRect,
    /// Where `source` lands inside the chunk's own bitmap.
    pub put: Point,
}

impl CopyPlan {
    /// Region of the chunk bitmap receiving `source`.
    pub fn destination(&self) -> PixelRect {
        PixelRect::new(self.put.x, self.put.y, self.source.width, self.source.height)
    }
}

/// Compute the overlap between a chunk and the viewport.
///
/// Returns `None` when the chunk has no on-screen pixels.
///
/// The placement inside the chunk defaults to the bottom-right corner and
/// snaps to 0 on any axis where the chunk starts at or after the camera, so
/// that chunks straddling either viewport edge receive the right slice.
pub fn plan_copy(
    grid: &ChunkGrid,
    key: ChunkKey,
    camera: Point,
    viewport_width: u32,
    viewport_height: u32,
) -> Option<CopyPlan> {
    let coord = key.coord();
    let render = grid.chunk_to_render(coord, camera);
    let world = grid.chunk_to_world(coord);

    let src_x = render.x.max(0);
    let src_y = render.y.max(0);
    let width = render
        .x
        .saturating_add(grid.chunk_width())
        .min(viewport_width as i64)
        .saturating_sub(src_x);
    let height = render
        .y
        .saturating_add(grid.chunk_height())
        .min(viewport_height as i64)
        .saturating_sub(src_y);

    if width <= 0 || height <= 0 {
        return None;
    }

    let mut put = Point::new(grid.chunk_width() - width, grid.chunk_height() - height);
    if world.x >= camera.x {
        put.x = 0;
    }
    if world.y >= camera.y {
        put.y = 0;
    }

    Some(CopyPlan {
        key,
        source: PixelRect::new(src_x, src_y, width, height),
        put,
    })
}

/// Outcome counters of a render or composite pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassStats {
    /// Chunks drawn or written back
    pub processed: usize,
    /// Chunks without on-screen pixels
    pub offscreen: usize,
    /// Chunks skipped because their image was still loading
    pub not_ready: usize,
}

/// The incremental chunk writer. Owns the scratch surface reused for every
/// chunk of every pass.
pub struct Compositor<S> {
    scratch: S,
    overlay: Option<DebugOverlay>,
}

impl<S: RenderSurface> Compositor<S> {
    /// Allocate the scratch surface next to `live`, sized to one chunk.
    pub fn new(live: &S, config: &CanvasConfig) -> Result<Self> {
        let scratch = live.create_scratch(config.chunk_width, config.chunk_height)?;
        let overlay = config
            .debug_mode
            .then(|| DebugOverlay::new(config.chunk_width, config.chunk_height));
        Ok(Self { scratch, overlay })
    }

    pub fn scratch(&self) -> &S {
        &self.scratch
    }

    /// Write the on-screen part of every chunk in `keys` back into `store`.
    ///
    /// A chunk whose stored image is still loading is left untouched for this
    /// pass; any other failure aborts the pass.
    pub fn composite(
        &mut self,
        live: &S,
        store: &mut ChunkStore<S::Image>,
        grid: &ChunkGrid,
        camera: Point,
        keys: &[ChunkKey],
    ) -> Result<PassStats> {
        let mut stats = PassStats::default();
        let (viewport_width, viewport_height) = (live.width(), live.height());

        for &key in keys {
            let Some(plan) = plan_copy(grid, key, camera, viewport_width, viewport_height) else {
                stats.offscreen += 1;
                continue;
            };
            let image = store.get(key);
            match self.write_chunk(live, image, &plan) {
                Ok(()) => stats.processed += 1,
                Err(e) if e.is_transient() => {
                    tracing::trace!(%key, "chunk image not ready, skipping composite");
                    stats.not_ready += 1;
                }
                Err(e) => return Err(e),
            }
        }

        tracing::debug!(
            composited = stats.processed,
            offscreen = stats.offscreen,
            not_ready = stats.not_ready,
            "composite pass finished"
        );
        Ok(stats)
    }

    fn write_chunk(&mut self, live: &S, image: &mut S::Image, plan: &CopyPlan) -> Result<()> {
        let result = self.blend_into_scratch(live, image, plan);
        let result = result.and_then(|()| {
            let encoded = self.scratch.encode()?;
            image.replace_with(encoded)
        });
        // never leak one chunk's pixels into the next
        self.scratch.clear();
        result
    }

    fn blend_into_scratch(&mut self, live: &S, image: &S::Image, plan: &CopyPlan) -> Result<()> {
        if image.has_content() {
            self.scratch.draw_image(image, 0, 0)?;
        }
        let destination = plan.destination();
        self.scratch.clear_rect(destination);
        self.scratch
            .draw_surface_region(live, plan.source, destination)?;

        if let Some(overlay) = &self.overlay {
            overlay.decorate(&mut self.scratch, plan.key)?;
        }
        Ok(())
    }
}
