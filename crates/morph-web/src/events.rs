use crate::audio::CueBus;
use crate::bridge;
use crate::dom;
use crate::frame;
use crate::input::{self, KeyAction};
use morph_core::{Experience, Gesture};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct ControlWiring {
    pub document: web::Document,
    pub experience: Rc<RefCell<Experience>>,
    pub audio: Rc<RefCell<Option<CueBus>>>,
}

/// Buttons, colour picker and keyboard shortcuts.
pub fn wire_controls(w: ControlWiring) {
    // Start: dismiss the overlay and unlock audio (needs a user gesture)
    {
        let doc = w.document.clone();
        let audio = w.audio.clone();
        dom::add_click_listener(&w.document, "btn-start", move || {
            dom::set_overlay_visible(&doc, false);
            ensure_audio(&audio);
        });
    }
    dom::add_click_listener(&w.document, "btn-open", || bridge::push_gesture(Gesture::Open));
    dom::add_click_listener(&w.document, "btn-close", || bridge::push_gesture(Gesture::Closed));
    {
        let experience = w.experience.clone();
        dom::add_input_listener(&w.document, "color-picker", move |value| {
            if let Some(c) = input::parse_color_input(&value) {
                experience.borrow_mut().set_color(c);
            }
        });
    }
    wire_keydown(w);
}

fn wire_keydown(w: ControlWiring) {
    let Some(window) = web::window() else {
        return;
    };
    let closure = Closure::wrap(Box::new(move |ev: web::KeyboardEvent| {
        let Some(action) = input::key_action(&ev.key()) else {
            return;
        };
        match action {
            KeyAction::Gesture(g) => bridge::push_gesture(g),
            KeyAction::Start => {
                ensure_audio(&w.audio);
                let mut exp = w.experience.borrow_mut();
                if exp.start().is_some() {
                    dom::set_overlay_visible(&w.document, false);
                    frame::publish_stage(&w.document, &exp);
                }
            }
            KeyAction::ToggleOverlay => dom::toggle_overlay(&w.document),
        }
        ev.prevent_default();
    }) as Box<dyn FnMut(_)>);
    let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
    closure.forget();
}

fn ensure_audio(slot: &Rc<RefCell<Option<CueBus>>>) {
    let mut slot = slot.borrow_mut();
    if slot.is_none() {
        match web::AudioContext::new()
            .map_err(|e| anyhow::anyhow!("AudioContext error: {:?}", e))
            .and_then(CueBus::new)
        {
            Ok(bus) => *slot = Some(bus),
            Err(e) => {
                log::error!("[audio] {:?}; continuing silently", e);
                return;
            }
        }
    }
    if let Some(bus) = slot.as_ref() {
        bus.resume();
    }
}
