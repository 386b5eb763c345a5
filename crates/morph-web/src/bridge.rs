//! JS <-> Rust bridge for the hand-landmark model and teardown.
//!
//! The page owns the camera and the inference model. It hands us a `detect`
//! callback returning 21 landmarks as a flat `[x, y(, z)]` array (or `null`
//! when no hand is visible) and a `close` callback that releases the model.
//! Gestures from every source land in one last-write-wins slot that the frame
//! loop drains.

use morph_core::{ClassifierParams, Gesture, GesturePipeline, HandLandmarks, LandmarkDetector};
use std::cell::{Cell, RefCell};
use std::sync::atomic::{AtomicBool, Ordering};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys as web;

const POLL_INTERVAL_MS: i32 = 33;

static RUNNING: AtomicBool = AtomicBool::new(true);

thread_local! {
    static LATEST_GESTURE: Cell<Option<Gesture>> = const { Cell::new(None) };
    static DETECTOR: RefCell<Option<DetectorLoop>> = const { RefCell::new(None) };
}

struct DetectorLoop {
    pipeline: GesturePipeline<JsHandDetector>,
    interval_id: i32,
    _tick: Closure<dyn FnMut()>,
}

/// `LandmarkDetector` backed by page-provided JS callbacks.
pub struct JsHandDetector {
    detect: js_sys::Function,
    close: js_sys::Function,
}

impl LandmarkDetector for JsHandDetector {
    type Frame = web::HtmlVideoElement;

    fn detect(&mut self, video: &web::HtmlVideoElement) -> Option<HandLandmarks> {
        let out = match self.detect.call1(&JsValue::NULL, video) {
            Ok(v) => v,
            Err(e) => {
                log::warn!("[hand] detect threw: {:?}", e);
                return None;
            }
        };
        if out.is_null() || out.is_undefined() {
            return None;
        }
        let flat = js_sys::Float32Array::new(&out).to_vec();
        match HandLandmarks::from_flat(&flat) {
            Ok(hand) => Some(hand),
            Err(e) => {
                log::warn!("[hand] {}", e);
                None
            }
        }
    }

    fn close(&mut self) {
        if let Err(e) = self.close.call0(&JsValue::NULL) {
            log::warn!("[hand] close threw: {:?}", e);
        }
    }
}

pub fn push_gesture(gesture: Gesture) {
    LATEST_GESTURE.with(|slot| slot.set(Some(gesture)));
}

pub fn take_gesture() -> Option<Gesture> {
    LATEST_GESTURE.with(|slot| slot.take())
}

pub fn is_running() -> bool {
    RUNNING.load(Ordering::SeqCst)
}

/// Start polling `detect(video)` on a timer, independent of the render loop.
/// Replaces any previously attached detector.
#[wasm_bindgen]
pub fn attach_hand_detector(
    detect: js_sys::Function,
    close: js_sys::Function,
    video: web::HtmlVideoElement,
) -> Result<(), JsValue> {
    if !is_running() {
        return Err(JsValue::from_str("experience has been shut down"));
    }
    release_detector();
    let window = web::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let pipeline = GesturePipeline::new(JsHandDetector { detect, close }, ClassifierParams::default());

    let tick = Closure::wrap(Box::new(move || {
        DETECTOR.with(|d| {
            if let Some(active) = d.borrow_mut().as_mut() {
                if let Some(g) = active.pipeline.poll(&video) {
                    push_gesture(g);
                }
            }
        });
    }) as Box<dyn FnMut()>);
    let interval_id = window.set_interval_with_callback_and_timeout_and_arguments_0(
        tick.as_ref().unchecked_ref(),
        POLL_INTERVAL_MS,
    )?;
    DETECTOR.with(|d| {
        *d.borrow_mut() = Some(DetectorLoop {
            pipeline,
            interval_id,
            _tick: tick,
        })
    });
    log::info!("[hand] detector attached, polling every {} ms", POLL_INTERVAL_MS);
    Ok(())
}

/// Stop the frame loop and the gesture poll, and close the landmark model.
#[wasm_bindgen]
pub fn shutdown() {
    if RUNNING.swap(false, Ordering::SeqCst) {
        release_detector();
        log::info!("[bridge] shut down");
    }
}

fn release_detector() {
    let Some(mut active) = DETECTOR.with(|d| d.borrow_mut().take()) else {
        return;
    };
    if let Some(w) = web::window() {
        w.clear_interval_with_handle(active.interval_id);
    }
    active.pipeline.close();
}
