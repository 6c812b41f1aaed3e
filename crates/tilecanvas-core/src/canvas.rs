use std::collections::{BTreeMap, HashMap};

use crate::camera::Camera;
use crate::chunk::{ChunkStore, RetentionPolicy};
use crate::composite::{plan_copy, Compositor, PassStats};
use crate::config::CanvasConfig;
use crate::coords::{ChunkGrid, ChunkKey, Point};
use crate::error::Result;
use crate::surface::RenderSurface;
use crate::viewport::{self, ChunkRange};

/// An unbounded drawing surface backed by lazily created chunks.
///
/// Owns the live surface the user sees, the chunk store, the camera and the
/// compositor. Panning redraws the live surface from the chunks; edits made
/// on the live surface are persisted into the chunks by
/// [`update_chunks`](Self::update_chunks).
///
/// # Examples
///
/// ```
/// use tilecanvas_core::{CanvasConfig, InfiniteCanvas, RasterSurface};
///
/// let surface = RasterSurface::new(1000, 1000);
/// let mut canvas = InfiniteCanvas::new(surface, CanvasConfig::default()).unwrap();
/// canvas.move_by(250, 0, true).unwrap();
/// assert_eq!(canvas.chunks_in_viewport().len(), 6);
/// ```
pub struct InfiniteCanvas<S: RenderSurface> {
    config: CanvasConfig,
    grid: ChunkGrid,
    camera: Camera,
    chunks: ChunkStore<S::Image>,
    surface: S,
    compositor: Compositor<S>,
}

impl<S: RenderSurface> InfiniteCanvas<S> {
    /// Create a canvas drawing onto `surface`, with the camera at the origin.
    pub fn new(surface: S, config: CanvasConfig) -> Result<Self> {
        config.validate()?;
        let compositor = Compositor::new(&surface, &config)?;
        tracing::debug!(
            chunk_width = config.chunk_width,
            chunk_height = config.chunk_height,
            debug_mode = config.debug_mode,
            "created infinite canvas"
        );
        Ok(Self {
            grid: ChunkGrid::from_config(&config),
            camera: Camera::new(),
            chunks: ChunkStore::new(config.chunk_width, config.chunk_height),
            config,
            surface,
            compositor,
        })
    }

    /// Replace the policy deciding which off-screen chunks are dropped.
    pub fn with_retention(mut self, policy: Box<dyn RetentionPolicy>) -> Self {
        self.chunks.set_retention(policy);
        self
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    pub fn grid(&self) -> &ChunkGrid {
        &self.grid
    }

    pub fn position(&self) -> Point {
        self.camera.position()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// The live surface, for freehand edits between passes.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Chunk range currently covered by the live surface.
    ///
    /// The surface size is read on every call, so resizes are picked up by
    /// the next pan or refresh.
    pub fn visible_range(&self) -> ChunkRange {
        viewport::resolve(
            &self.grid,
            self.camera.position(),
            self.surface.width(),
            self.surface.height(),
        )
    }

    /// Every chunk materialized so far.
    pub fn all_chunks(&self) -> &HashMap<ChunkKey, S::Image> {
        self.chunks.all()
    }

    /// Chunks covered by the viewport, creating any that don't exist yet.
    pub fn chunks_in_viewport(&mut self) -> BTreeMap<ChunkKey, &S::Image> {
        let keys = self.materialize_viewport();
        keys.into_iter()
            .filter_map(|key| self.chunks.peek(&key).map(|image| (key, image)))
            .collect()
    }

    /// Set the camera position, redrawing the live surface if `render` is set.
    pub fn move_to(&mut self, x: i64, y: i64, render: bool) -> Result<()> {
        self.camera.move_to(x, y);
        if render {
            self.render_viewport()?;
        }
        Ok(())
    }

    /// Pan the camera, redrawing the live surface if `render` is set.
    pub fn move_by(&mut self, dx: i64, dy: i64, render: bool) -> Result<()> {
        self.camera.move_by(dx, dy);
        if render {
            self.render_viewport()?;
        }
        Ok(())
    }

    /// Clear the live surface and redraw it from the chunks without moving.
    pub fn refresh(&mut self) -> Result<()> {
        self.surface.clear();
        self.move_by(0, 0, true)
    }

    /// Persist the visible content of the live surface into the chunks.
    pub fn update_chunks(&mut self) -> Result<PassStats> {
        let keys = self.materialize_viewport();
        self.compositor.composite(
            &self.surface,
            &mut self.chunks,
            &self.grid,
            self.camera.position(),
            &keys,
        )
    }

    /// Replace a chunk's image, e.g. to seed initial imagery, then refresh.
    pub fn load_chunk(&mut self, key: ChunkKey, image: S::Image) -> Result<()> {
        self.chunks.load(key, image);
        self.refresh()
    }

    /// [`load_chunk`](Self::load_chunk) addressed by the textual key form `"x, y"`.
    pub fn load_chunk_by_id(&mut self, id: &str, image: S::Image) -> Result<()> {
        let key: ChunkKey = id.parse()?;
        self.load_chunk(key, image)
    }

    /// Blit every visible chunk onto the live surface at its render position.
    fn render_viewport(&mut self) -> Result<PassStats> {
        let keys = self.materialize_viewport();
        let camera = self.camera.position();
        let (viewport_width, viewport_height) = (self.surface.width(), self.surface.height());
        let mut stats = PassStats::default();

        for key in keys {
            if plan_copy(&self.grid, key, camera, viewport_width, viewport_height).is_none() {
                stats.offscreen += 1;
                continue;
            }
            let Some(image) = self.chunks.peek(&key) else {
                continue;
            };
            let render = self.grid.chunk_to_render(key.coord(), camera);
            match self.surface.draw_image(image, render.x, render.y) {
                Ok(()) => stats.processed += 1,
                // fixes itself on the next pan or refresh
                Err(e) if e.is_transient() => {
                    tracing::trace!(%key, "chunk image not ready, skipping frame");
                    stats.not_ready += 1;
                }
                Err(e) => return Err(e),
            }
        }

        tracing::debug!(
            x = camera.x,
            y = camera.y,
            drawn = stats.processed,
            not_ready = stats.not_ready,
            "rendered viewport"
        );
        Ok(stats)
    }

    fn materialize_viewport(&mut self) -> Vec<ChunkKey> {
        let keys: Vec<ChunkKey> = self.visible_range().keys().collect();
        for &key in &keys {
            self.chunks.get(key);
        }
        self.chunks.apply_retention(&keys);
        keys
    }
}
