mod api;
mod surface;

pub use api::InfiniteCanvasHandle;
pub use surface::{CanvasImage, CanvasSurface};

use wasm_bindgen::prelude::*;

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}
