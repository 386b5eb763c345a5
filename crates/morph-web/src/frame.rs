use crate::audio::CueBus;
use crate::bridge;
use crate::dom;
use crate::input;
use crate::render;
use instant::Instant;
use morph_core::{Camera, Experience, PointUniforms};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct FrameContext<'a> {
    pub experience: Rc<RefCell<Experience>>,
    pub audio: Rc<RefCell<Option<CueBus>>>,
    pub gpu: Option<render::GpuState<'a>>,

    pub document: web::Document,
    pub canvas: web::HtmlCanvasElement,
    pub camera: Camera,
    /// Flat xyz buffer the animator writes into; only attached while a GPU exists.
    pub positions: Vec<f32>,

    pub last_instant: Instant,
    pub elapsed: f32,
}

impl<'a> FrameContext<'a> {
    pub fn frame(&mut self) {
        let now = Instant::now();
        let dt_sec = (now - self.last_instant).as_secs_f32();
        self.last_instant = now;
        self.elapsed += dt_sec;

        let mut exp = self.experience.borrow_mut();
        if let Some(g) = bridge::take_gesture() {
            exp.set_gesture(g);
        }
        let buffer = if self.gpu.is_some() {
            Some(self.positions.as_mut_slice())
        } else {
            None
        };
        let out = exp.frame(dt_sec, buffer);

        if let Some(stage) = out.stage_changed {
            log::info!("[stage] {:?}", stage);
            publish_stage(&self.document, &exp);
        }
        if let Some(bus) = self.audio.borrow().as_ref() {
            for cue in &out.cues {
                bus.play(*cue);
            }
        }

        if out.report.is_none() {
            return;
        }
        if let Some(g) = &mut self.gpu {
            let w = self.canvas.width();
            let h = self.canvas.height();
            self.camera.set_viewport(w, h);
            g.resize_if_needed(w, h);
            let uniforms = PointUniforms::new(
                &self.camera,
                exp.rotation(),
                exp.color().to_vec4(1.0),
                exp.point_size(),
                self.elapsed,
            );
            if let Err(e) = g.render(&self.positions, &uniforms) {
                log::error!("render error: {:?}", e);
            }
        }
    }
}

/// Reflect the current stage in `#stage-label` and `#color-picker`.
pub fn publish_stage(document: &web::Document, exp: &Experience) {
    dom::set_text(document, "stage-label", &input::stage_caption(exp.stage()));
    dom::set_input_value(document, "color-picker", &exp.color().to_string());
}

pub async fn init_gpu(canvas: &web::HtmlCanvasElement, particle_count: usize) -> Option<render::GpuState<'static>> {
    // leak a canvas clone to satisfy 'static lifetime for surface
    let leaked_canvas = Box::leak(Box::new(canvas.clone()));
    match render::GpuState::new(leaked_canvas, particle_count).await {
        Ok(g) => Some(g),
        Err(e) => {
            log::error!("WebGPU init error: {:?}", e);
            None
        }
    }
}

/// requestAnimationFrame loop; stops rescheduling once the bridge is shut down.
pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext<'static>>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        if !bridge::is_running() {
            log::info!("[frame] loop stopped");
            return;
        }
        frame_ctx.borrow_mut().frame();
        request_frame(&tick_clone);
    }) as Box<dyn FnMut()>));
    request_frame(&tick);
}

fn request_frame(tick: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>) {
    if let (Some(w), Some(cb)) = (web::window(), tick.borrow().as_ref()) {
        let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
