use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

#[inline]
pub fn add_click_listener(
    document: &web::Document,
    element_id: &str,
    mut handler: impl FnMut() + 'static,
) {
    match document.get_element_by_id(element_id) {
        Some(el) => {
            let closure = Closure::wrap(Box::new(move || handler()) as Box<dyn FnMut()>);
            let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        None => log::warn!("[dom] missing #{}", element_id),
    }
}

/// Calls `handler` with the element's new value on every `input` event.
pub fn add_input_listener(
    document: &web::Document,
    element_id: &str,
    mut handler: impl FnMut(String) + 'static,
) {
    let Some(input) = document
        .get_element_by_id(element_id)
        .and_then(|el| el.dyn_into::<web::HtmlInputElement>().ok())
    else {
        log::warn!("[dom] missing input #{}", element_id);
        return;
    };
    let target = input.clone();
    let closure = Closure::wrap(Box::new(move || handler(target.value())) as Box<dyn FnMut()>);
    let _ = input.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref());
    closure.forget();
}

pub fn set_text(document: &web::Document, element_id: &str, text: &str) {
    if let Some(el) = document.get_element_by_id(element_id) {
        el.set_text_content(Some(text));
    }
}

pub fn set_input_value(document: &web::Document, element_id: &str, value: &str) {
    if let Some(input) = document
        .get_element_by_id(element_id)
        .and_then(|el| el.dyn_into::<web::HtmlInputElement>().ok())
    {
        input.set_value(value);
    }
}

pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement) {
    if let Some(w) = web::window() {
        let dpr = w.device_pixel_ratio();
        let rect = canvas.get_bounding_client_rect();
        let w_px = (rect.width() * dpr) as u32;
        let h_px = (rect.height() * dpr) as u32;
        canvas.set_width(w_px.max(1));
        canvas.set_height(h_px.max(1));
    }
}

/// Keep the canvas backing store at CSS size * devicePixelRatio.
pub fn track_canvas_size(canvas: &web::HtmlCanvasElement) {
    sync_canvas_backing_size(canvas);
    let Some(window) = web::window() else {
        return;
    };
    let canvas = canvas.clone();
    let closure = Closure::wrap(Box::new(move || sync_canvas_backing_size(&canvas)) as Box<dyn FnMut()>);
    let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
    closure.forget();
}

const OVERLAY_ID: &str = "start-overlay";

fn overlay(document: &web::Document) -> Option<web::HtmlElement> {
    document
        .get_element_by_id(OVERLAY_ID)
        .and_then(|el| el.dyn_into::<web::HtmlElement>().ok())
}

pub fn set_overlay_visible(document: &web::Document, visible: bool) {
    if let Some(el) = overlay(document) {
        el.set_hidden(!visible);
    }
}

pub fn toggle_overlay(document: &web::Document) {
    if let Some(el) = overlay(document) {
        el.set_hidden(!el.hidden());
    }
}
