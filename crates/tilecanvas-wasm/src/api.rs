use std::collections::HashMap;

use serde::Serialize;
use tilecanvas_core::{
    CanvasConfig, CanvasError, ChunkKey, InfiniteCanvas as Engine, Point, DEFAULT_CHUNK_SIZE,
};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

use crate::surface::{CanvasImage, CanvasSurface};

/// Infinite chunked canvas exposed to JavaScript
#[wasm_bindgen(js_name = InfiniteCanvas)]
pub struct InfiniteCanvasHandle {
    engine: Engine<CanvasSurface>,
    pan: SubpixelPosition,
}

/// Structured error object for JavaScript
#[derive(Serialize)]
pub struct JsCanvasError {
    code: String,
    message: String,
}

impl From<CanvasError> for JsCanvasError {
    fn from(err: CanvasError) -> Self {
        Self {
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }
}

fn to_js_error(err: CanvasError) -> JsValue {
    let js_error = JsCanvasError::from(err);
    serde_wasm_bindgen::to_value(&js_error).unwrap_or(JsValue::NULL)
}

/// Camera position as JS sees it.
///
/// Pointer deltas are fractional on zoomed or high-DPI pages. They accumulate
/// here at full precision and the engine camera follows the rounded sum.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct SubpixelPosition {
    x: f64,
    y: f64,
}

impl SubpixelPosition {
    fn move_by(&mut self, dx: f64, dy: f64) -> Point {
        self.x += dx;
        self.y += dy;
        self.pixel()
    }

    fn move_to(&mut self, x: f64, y: f64) -> Point {
        self.x = x;
        self.y = y;
        self.pixel()
    }

    /// Whole-pixel camera position; saturates outside the `i64` range.
    fn pixel(&self) -> Point {
        Point::new(self.x.round() as i64, self.y.round() as i64)
    }
}

/// JS object mapping `"x, y"` keys to `<img>` elements.
///
/// Chunks never drawn into get an empty element of chunk size.
fn chunk_object<'a>(
    chunks: impl Iterator<Item = (&'a ChunkKey, &'a CanvasImage)>,
) -> Result<js_sys::Object, JsValue> {
    let object = js_sys::Object::new();
    for (key, image) in chunks {
        let element = match image.element() {
            Some(element) => element.clone(),
            None => HtmlImageElement::new_with_width_and_height(image.width(), image.height())?,
        };
        js_sys::Reflect::set(&object, &JsValue::from_str(&key.to_string()), &element)?;
    }
    Ok(object)
}

fn chunk_map(chunks: &HashMap<ChunkKey, CanvasImage>) -> Result<js_sys::Object, JsValue> {
    chunk_object(chunks.iter())
}

#[wasm_bindgen(js_class = InfiniteCanvas)]
impl InfiniteCanvasHandle {
    /// Create a canvas drawing onto `ctx`.
    ///
    /// Chunk sizes default to 500×500 and debug mode to off.
    #[wasm_bindgen(constructor)]
    pub fn new(
        ctx: CanvasRenderingContext2d,
        debug: Option<bool>,
        chunk_width: Option<u32>,
        chunk_height: Option<u32>,
    ) -> Result<InfiniteCanvasHandle, JsValue> {
        let config = CanvasConfig::new(
            chunk_width.unwrap_or(DEFAULT_CHUNK_SIZE),
            chunk_height.unwrap_or(DEFAULT_CHUNK_SIZE),
            debug.unwrap_or(false),
        );
        Self::build(ctx, config)
    }

    /// Create a canvas from a JSON configuration, e.g. `{"chunkWidth": 256}`
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(
        ctx: CanvasRenderingContext2d,
        json: &str,
    ) -> Result<InfiniteCanvasHandle, JsValue> {
        let config = CanvasConfig::from_json(json).map_err(to_js_error)?;
        Self::build(ctx, config)
    }

    fn build(
        ctx: CanvasRenderingContext2d,
        config: CanvasConfig,
    ) -> Result<InfiniteCanvasHandle, JsValue> {
        #[cfg(all(debug_assertions, target_arch = "wasm32"))]
        web_sys::console::log_1(
            &format!(
                "[InfiniteCanvas] chunks {}x{}, debug {}",
                config.chunk_width, config.chunk_height, config.debug_mode
            )
            .into(),
        );

        let engine = Engine::new(CanvasSurface::new(ctx), config).map_err(to_js_error)?;
        Ok(Self {
            engine,
            pan: SubpixelPosition::default(),
        })
    }

    /// Pan the camera; renders unless `render` is `false`
    #[wasm_bindgen(js_name = moveBy)]
    pub fn move_by(&mut self, dx: f64, dy: f64, render: Option<bool>) -> Result<(), JsValue> {
        let target = self.pan.move_by(dx, dy);
        self.engine
            .move_to(target.x, target.y, render.unwrap_or(true))
            .map_err(to_js_error)
    }

    /// Jump the camera; renders unless `render` is `false`
    #[wasm_bindgen(js_name = moveTo)]
    pub fn move_to(&mut self, x: f64, y: f64, render: Option<bool>) -> Result<(), JsValue> {
        let target = self.pan.move_to(x, y);
        self.engine
            .move_to(target.x, target.y, render.unwrap_or(true))
            .map_err(to_js_error)
    }

    pub fn refresh(&mut self) -> Result<(), JsValue> {
        self.engine.refresh().map_err(to_js_error)
    }

    /// Persist what is currently drawn on the canvas into the chunks
    #[wasm_bindgen(js_name = updateChunks)]
    pub fn update_chunks(&mut self) -> Result<(), JsValue> {
        let _stats = self.engine.update_chunks().map_err(to_js_error)?;

        #[cfg(all(debug_assertions, target_arch = "wasm32"))]
        if _stats.not_ready > 0 {
            web_sys::console::log_1(
                &format!("[InfiniteCanvas] {} chunk(s) still loading", _stats.not_ready).into(),
            );
        }
        Ok(())
    }

    /// Every chunk created so far, keyed `"x, y"`
    #[wasm_bindgen(js_name = getAllChunks)]
    pub fn get_all_chunks(&self) -> Result<js_sys::Object, JsValue> {
        chunk_map(self.engine.all_chunks())
    }

    /// Chunks covered by the viewport, keyed `"x, y"`
    #[wasm_bindgen(js_name = getChunksInViewport)]
    pub fn get_chunks_in_viewport(&mut self) -> Result<js_sys::Object, JsValue> {
        let visible = self.engine.chunks_in_viewport();
        chunk_object(visible.iter().map(|(key, image)| (key, *image)))
    }

    /// Replace chunk `id` (`"x, y"`) with `image` and refresh
    #[wasm_bindgen(js_name = loadChunk)]
    pub fn load_chunk(&mut self, id: &str, image: HtmlImageElement) -> Result<(), JsValue> {
        self.engine
            .load_chunk_by_id(id, CanvasImage::from_element(image))
            .map_err(to_js_error)
    }

    /// Camera position as `{x, y}`
    pub fn position(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.engine.position()).unwrap_or(JsValue::NULL)
    }

    /// Key of the `index`th image when tiling seed images `per_row` to a row
    #[wasm_bindgen(js_name = seedKey)]
    pub fn seed_key(index: u32, per_row: u32) -> String {
        ChunkKey::seed_layout(index as usize, per_row as usize).to_string()
    }
}
