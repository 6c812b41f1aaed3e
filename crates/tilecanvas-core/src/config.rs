use serde::{Deserialize, Serialize};

use crate::error::{CanvasError, Result};

/// Default chunk edge length in pixels.
pub const DEFAULT_CHUNK_SIZE: u32 = 500;

/// Chunk edges below this size cost noticeably more per pan than they save.
pub const SMALL_CHUNK_WARNING: u32 = 64;

/// Engine configuration, fixed for the lifetime of an [`InfiniteCanvas`].
///
/// Really small chunk sizes have a very negative impact on performance since
/// every pan touches many more chunks. They are allowed, but logged.
///
/// [`InfiniteCanvas`]: crate::InfiniteCanvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CanvasConfig {
    pub chunk_width: u32,
    pub chunk_height: u32,
    /// Draw a border and the chunk key into every composited chunk
    pub debug_mode: bool,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            chunk_width: DEFAULT_CHUNK_SIZE,
            chunk_height: DEFAULT_CHUNK_SIZE,
            debug_mode: false,
        }
    }
}

impl CanvasConfig {
    pub fn new(chunk_width: u32, chunk_height: u32, debug_mode: bool) -> Self {
        Self {
            chunk_width,
            chunk_height,
            debug_mode,
        }
    }

    /// Parse a configuration from JSON, e.g. `{"chunkWidth": 256, "debugMode": true}`.
    /// Missing fields take their default values.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: CanvasConfig = serde_json::from_str(json)
            .map_err(|e| CanvasError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject sizes the chunk grid cannot be built from.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_width == 0 || self.chunk_height == 0 {
            return Err(CanvasError::InvalidConfig(format!(
                "chunk size must be non-zero, got {}x{}",
                self.chunk_width, self.chunk_height
            )));
        }
        if self.chunk_width < SMALL_CHUNK_WARNING || self.chunk_height < SMALL_CHUNK_WARNING {
            tracing::warn!(
                chunk_width = self.chunk_width,
                chunk_height = self.chunk_height,
                "small chunk sizes degrade panning performance"
            );
        }
        Ok(())
    }
}
