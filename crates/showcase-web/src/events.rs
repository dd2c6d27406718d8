use crate::audio;
use crate::constants::*;
use crate::dom;
use showcase_core::{
    nudge_for_key, Calibrator, CameraGlide, CameraView, DecorConfig, RoadScroll, SceneContents,
    ShowcaseState, PAINTS,
};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct ButtonWiring {
    pub document: web::Document,
    pub state: Rc<RefCell<ShowcaseState>>,
    pub glide: Rc<RefCell<CameraGlide>>,
    pub road: Rc<RefCell<RoadScroll>>,
    pub scene: Rc<RefCell<SceneContents>>,
    pub decor: DecorConfig,
}

pub fn wire_showcase_buttons(w: ButtonWiring) {
    // Warp drive
    {
        let state = w.state.clone();
        let glide = w.glide.clone();
        let road = w.road.clone();
        let doc = w.document.clone();
        dom::add_click_listener(&w.document, WARP_BTN_ID, move || {
            let warping = state.borrow_mut().toggle_warp();
            if warping {
                glide.borrow_mut().cancel();
            } else {
                road.borrow_mut().reset();
            }
            dom::set_status(&doc, state.borrow().status());
            dom::set_body_class(&doc, WARPING_BODY_CLASS, warping);
            if let Some(btn) = doc.get_element_by_id(WARP_BTN_ID) {
                dom::toggle_active(&btn, warping);
            }
        });
    }

    // X-ray
    {
        let state = w.state.clone();
        let scene = w.scene.clone();
        let doc = w.document.clone();
        dom::add_click_listener(&w.document, XRAY_BTN_ID, move || {
            if scene.borrow().car.is_none() {
                return;
            }
            let xray = state.borrow_mut().toggle_xray();
            if let Some(btn) = doc.get_element_by_id(XRAY_BTN_ID) {
                dom::toggle_active(&btn, xray);
            }
        });
    }

    // Paint swatches
    {
        let state = w.state.clone();
        let doc = w.document.clone();
        dom::add_click_listener_all(&w.document, PAINT_BTN_SELECTOR, move |i, el| {
            if !state.borrow_mut().select_paint(i) {
                return;
            }
            dom::set_active_exclusive(&doc, PAINT_BTN_SELECTOR, &el);
            if let Some(paint) = PAINTS.get(i) {
                dom::set_text_by_selector(&doc, PAINT_LABEL_SELECTOR, paint.name);
            }
        });
    }

    // Camera presets
    {
        let state = w.state.clone();
        let glide = w.glide.clone();
        let road = w.road.clone();
        let doc = w.document.clone();
        dom::add_click_listener_all(&w.document, CAM_BTN_SELECTOR, move |_i, el| {
            let Some(view) = el
                .get_attribute("data-view")
                .and_then(|v| CameraView::from_name(&v))
            else {
                return;
            };
            let goal = state.borrow_mut().select_view(view);
            match goal {
                Some(goal) => glide.borrow_mut().begin(goal),
                None => glide.borrow_mut().cancel(),
            }
            // Leaving warp via a preset also clears its page styling.
            road.borrow_mut().reset();
            dom::set_status(&doc, state.borrow().status());
            dom::set_body_class(&doc, WARPING_BODY_CLASS, false);
            if let Some(btn) = doc.get_element_by_id(WARP_BTN_ID) {
                dom::toggle_active(&btn, false);
            }
            dom::set_active_exclusive(&doc, CAM_BTN_SELECTOR, &el);
        });
    }

    // Engine start
    {
        let src = w.decor.assets.startup_audio;
        dom::add_click_listener(&w.document, ENGINE_BTN_ID, move || {
            audio::play_engine_start(src);
        });
    }
}

/// Global keydown for the transform-calibration tool. Every nudge is logged
/// so the accumulated placement can be pasted into a decor preset.
pub fn wire_calibration_keys(calibrator: Rc<RefCell<Calibrator>>) {
    if let Some(window) = web::window() {
        let closure =
            wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::KeyboardEvent| {
                if let Some(nudge) = nudge_for_key(&ev.key()) {
                    let mut cal = calibrator.borrow_mut();
                    cal.apply(nudge);
                    log::info!("{}", cal.report());
                }
            }) as Box<dyn FnMut(_)>);
        let _ =
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}
