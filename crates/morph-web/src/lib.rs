#![cfg(target_arch = "wasm32")]
use instant::Instant;
use morph_core::{Camera, Experience, ExperienceConfig};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod audio;
mod bridge;
mod dom;
mod events;
mod frame;
mod input;
mod raster;
mod render;

pub use bridge::{attach_hand_detector, shutdown};

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("morph-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    let document = dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;
    let canvas: web::HtmlCanvasElement = document
        .get_element_by_id("app-canvas")
        .ok_or_else(|| anyhow::anyhow!("missing #app-canvas"))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;
    dom::track_canvas_size(&canvas);

    let raster = raster::CanvasGlyphRaster::new(document.clone());
    let experience = Rc::new(RefCell::new(Experience::new(
        ExperienceConfig::default(),
        &raster,
    )?));
    let particle_count = experience.borrow().particle_count();
    let audio = Rc::new(RefCell::new(None));

    events::wire_controls(events::ControlWiring {
        document: document.clone(),
        experience: experience.clone(),
        audio: audio.clone(),
    });
    frame::publish_stage(&document, &experience.borrow());

    // Without a GPU the loop still runs the controller; the animator idles.
    let gpu = frame::init_gpu(&canvas, particle_count).await;
    let frame_ctx = frame::FrameContext {
        experience,
        audio,
        gpu,
        document,
        canvas,
        camera: Camera::default(),
        positions: vec![0.0; particle_count * 3],
        last_instant: Instant::now(),
        elapsed: 0.0,
    };
    frame::start_loop(Rc::new(RefCell::new(frame_ctx)));
    Ok(())
}
