pub mod camera;
pub mod canvas;
pub mod chunk;
pub mod composite;
pub mod config;
pub mod coords;
pub mod error;
pub mod overlay;
pub mod raster;
pub mod surface;
pub mod viewport;

pub use camera::Camera;
pub use canvas::InfiniteCanvas;
pub use chunk::{ChunkStore, KeepAll, RetentionPolicy};
pub use composite::{plan_copy, Compositor, CopyPlan, PassStats};
pub use config::{CanvasConfig, DEFAULT_CHUNK_SIZE};
pub use coords::{construct_key, parse_key, ChunkCoord, ChunkGrid, ChunkKey, Point};
pub use error::{CanvasError, KeyParseError, Result};
pub use overlay::DebugOverlay;
pub use raster::{RasterImage, RasterSurface};
pub use surface::{ChunkImage, PixelRect, RenderSurface};
pub use viewport::{resolve as resolve_viewport, ChunkRange};
