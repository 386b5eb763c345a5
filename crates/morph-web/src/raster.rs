use morph_core::{GlyphBitmap, GlyphRaster, GLYPH_BITMAP_HEIGHT, GLYPH_BITMAP_WIDTH, GLYPH_FONT};
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

/// Draws text with the browser's font stack on a detached 2D canvas.
pub struct CanvasGlyphRaster {
    document: web::Document,
    pub width: u32,
    pub height: u32,
    pub font: &'static str,
}

impl CanvasGlyphRaster {
    pub fn new(document: web::Document) -> Self {
        Self {
            document,
            width: GLYPH_BITMAP_WIDTH,
            height: GLYPH_BITMAP_HEIGHT,
            font: GLYPH_FONT,
        }
    }

    fn draw(&self, text: &str) -> Result<GlyphBitmap, JsValue> {
        let canvas: web::HtmlCanvasElement = self.document.create_element("canvas")?.dyn_into()?;
        canvas.set_width(self.width);
        canvas.set_height(self.height);
        let ctx: web::CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into()?;
        let (w, h) = (self.width as f64, self.height as f64);
        #[allow(deprecated)]
        ctx.set_fill_style(&JsValue::from_str("#000"));
        ctx.fill_rect(0.0, 0.0, w, h);
        ctx.set_font(self.font);
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");
        #[allow(deprecated)]
        ctx.set_fill_style(&JsValue::from_str("#fff"));
        ctx.fill_text(text, w / 2.0, h / 2.0)?;
        let image = ctx.get_image_data(0.0, 0.0, w, h)?;
        Ok(GlyphBitmap::from_rgba(self.width, self.height, &image.data().0))
    }
}

impl GlyphRaster for CanvasGlyphRaster {
    fn rasterize(&self, text: &str) -> Option<GlyphBitmap> {
        match self.draw(text) {
            Ok(bitmap) => Some(bitmap),
            Err(e) => {
                log::warn!("[raster] canvas text unavailable: {:?}", e);
                None
            }
        }
    }
}
