//! Browser backend: chunks as `<img>` elements, surfaces as 2D canvases.

use tilecanvas_core::{CanvasError, ChunkImage, PixelRect, RenderSurface, Result};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, DomException, HtmlCanvasElement, HtmlImageElement};

/// Firefox throws this when drawing an `<img>` that hasn't decoded yet.
const NOT_AVAILABLE: &str = "NS_ERROR_NOT_AVAILABLE";

/// A chunk held as an image element whose `src` is a PNG data URL. Blank
/// chunks hold no element yet.
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasImage {
    element: Option<HtmlImageElement>,
    width: u32,
    height: u32,
}

impl CanvasImage {
    /// Wrap an image supplied by the host, e.g. seed imagery.
    pub fn from_element(element: HtmlImageElement) -> Self {
        let (width, height) = (element.natural_width(), element.natural_height());
        Self {
            element: Some(element),
            width,
            height,
        }
    }

    pub fn element(&self) -> Option<&HtmlImageElement> {
        self.element.as_ref()
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

impl ChunkImage for CanvasImage {
    type Encoded = String;

    /// The `<img>` element is created on first write, where DOM failures can
    /// be reported.
    fn blank(width: u32, height: u32) -> Self {
        Self {
            element: None,
            width,
            height,
        }
    }

    fn is_ready(&self) -> bool {
        self.element.as_ref().map_or(true, |element| element.complete())
    }

    fn has_content(&self) -> bool {
        self.element
            .as_ref()
            .is_some_and(|element| !element.src().is_empty())
    }

    fn replace_with(&mut self, data_url: String) -> Result<()> {
        let element = match self.element.take() {
            Some(element) => element,
            None => HtmlImageElement::new_with_width_and_height(self.width, self.height)
                .map_err(|e| CanvasError::Decode(js_message(&e)))?,
        };
        // decoding is async; the image reports not ready until it finishes
        element.set_src(&data_url);
        self.element = Some(element);
        Ok(())
    }
}

/// A 2D canvas context usable as the live or scratch surface.
#[derive(Debug, Clone)]
pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &CanvasRenderingContext2d {
        &self.ctx
    }

    fn canvas(&self) -> Result<HtmlCanvasElement> {
        self.ctx
            .canvas()
            .ok_or_else(|| CanvasError::Surface("context is not attached to a canvas".into()))
    }
}

impl RenderSurface for CanvasSurface {
    type Image = CanvasImage;

    fn width(&self) -> u32 {
        self.ctx.canvas().map_or(0, |canvas| canvas.width())
    }

    fn height(&self) -> u32 {
        self.ctx.canvas().map_or(0, |canvas| canvas.height())
    }

    fn create_scratch(&self, width: u32, height: u32) -> Result<Self> {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| CanvasError::Surface("no document to create a canvas in".into()))?;
        let canvas: HtmlCanvasElement = document
            .create_element("canvas")
            .map_err(surface_error)?
            .dyn_into()
            .map_err(|_| CanvasError::Surface("created element is not a canvas".into()))?;
        canvas.set_width(width);
        canvas.set_height(height);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .map_err(surface_error)?
            .ok_or_else(|| CanvasError::Surface("2d context unavailable".into()))?
            .dyn_into()
            .map_err(|_| CanvasError::Surface("context is not a 2d context".into()))?;
        Ok(Self { ctx })
    }

    fn draw_image(&mut self, image: &CanvasImage, x: i64, y: i64) -> Result<()> {
        if !image.has_content() {
            return Ok(());
        }
        if !image.is_ready() {
            return Err(CanvasError::ImageNotReady);
        }
        let Some(element) = image.element() else {
            return Ok(());
        };
        self.ctx
            .draw_image_with_html_image_element(element, x as f64, y as f64)
            .map_err(draw_error)
    }

    fn draw_surface_region(
        &mut self,
        source: &CanvasSurface,
        src: PixelRect,
        dst: PixelRect,
    ) -> Result<()> {
        if src.is_empty() || dst.is_empty() {
            return Ok(());
        }
        let canvas = source.canvas()?;
        self.ctx
            .draw_image_with_html_canvas_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                &canvas,
                src.x as f64,
                src.y as f64,
                src.width as f64,
                src.height as f64,
                dst.x as f64,
                dst.y as f64,
                dst.width as f64,
                dst.height as f64,
            )
            .map_err(draw_error)
    }

    fn clear_rect(&mut self, rect: PixelRect) {
        self.ctx.clear_rect(
            rect.x as f64,
            rect.y as f64,
            rect.width as f64,
            rect.height as f64,
        );
    }

    fn stroke_rect(&mut self, rect: PixelRect) {
        self.ctx.stroke_rect(
            rect.x as f64,
            rect.y as f64,
            rect.width as f64,
            rect.height as f64,
        );
    }

    fn fill_text(&mut self, text: &str, x: i64, y: i64) -> Result<()> {
        self.ctx
            .fill_text(text, x as f64, y as f64)
            .map_err(surface_error)
    }

    fn encode(&self) -> Result<String> {
        self.canvas()?
            .to_data_url()
            .map_err(|e| CanvasError::Encode(js_message(&e)))
    }
}

/// Name of a thrown JS exception, e.g. `"InvalidStateError"`.
pub(crate) fn js_error_name(err: &JsValue) -> Option<String> {
    if let Some(dom) = err.dyn_ref::<DomException>() {
        return Some(dom.name());
    }
    js_sys::Reflect::get(err, &JsValue::from_str("name"))
        .ok()?
        .as_string()
}

pub(crate) fn js_message(err: &JsValue) -> String {
    if let Some(error) = err.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    if let Some(dom) = err.dyn_ref::<DomException>() {
        return dom.message();
    }
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}

fn draw_error(err: JsValue) -> CanvasError {
    if js_error_name(&err).as_deref() == Some(NOT_AVAILABLE) {
        CanvasError::ImageNotReady
    } else {
        surface_error(err)
    }
}

fn surface_error(err: JsValue) -> CanvasError {
    CanvasError::Surface(js_message(&err))
}
