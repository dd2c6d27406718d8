use crate::constants::*;
use showcase_core::{DecorKind, SystemStatus};
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
    if let Some(el) = document.get_element_by_id(element_id) {
        let closure =
            wasm_bindgen::closure::Closure::wrap(Box::new(move || handler()) as Box<dyn FnMut()>);
        let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

/// Wire a click handler to every element matching `selector`, passing the
/// element's index within the selection.
pub fn add_click_listener_all(
    document: &web::Document,
    selector: &str,
    handler: impl Fn(usize, web::Element) + Clone + 'static,
) {
    let Ok(list) = document.query_selector_all(selector) else {
        return;
    };
    for i in 0..list.length() {
        let Some(node) = list.item(i) else { continue };
        let Ok(el) = node.dyn_into::<web::Element>() else {
            continue;
        };
        let handler = handler.clone();
        let el_for_handler = el.clone();
        let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move || {
            handler(i as usize, el_for_handler.clone())
        }) as Box<dyn FnMut()>);
        let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

/// Mark one element of a selection as active, clearing the rest.
pub fn set_active_exclusive(document: &web::Document, selector: &str, active: &web::Element) {
    if let Ok(list) = document.query_selector_all(selector) {
        for i in 0..list.length() {
            if let Some(el) = list.item(i).and_then(|n| n.dyn_into::<web::Element>().ok()) {
                let _ = el.class_list().remove_1(ACTIVE_CLASS);
            }
        }
    }
    let _ = active.class_list().add_1(ACTIVE_CLASS);
}

#[inline]
pub fn toggle_active(el: &web::Element, on: bool) {
    if on {
        let _ = el.class_list().add_1(ACTIVE_CLASS);
    } else {
        let _ = el.class_list().remove_1(ACTIVE_CLASS);
    }
}

pub fn set_text_by_selector(document: &web::Document, selector: &str, text: &str) {
    if let Ok(Some(el)) = document.query_selector(selector) {
        el.set_text_content(Some(text));
    }
}

/// Update the status line text and color.
pub fn set_status(document: &web::Document, status: SystemStatus) {
    if let Some(el) = document.get_element_by_id(STATUS_ID) {
        el.set_text_content(Some(status.label()));
        if let Some(html) = el.dyn_ref::<web::HtmlElement>() {
            let _ = html.style().set_property("color", status.color());
        }
    }
}

pub fn set_body_class(document: &web::Document, class: &str, on: bool) {
    if let Some(body) = document.body() {
        if on {
            let _ = body.class_list().add_1(class);
        } else {
            let _ = body.class_list().remove_1(class);
        }
    }
}

pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement) {
    if let Some(w) = web::window() {
        let dpr = w.device_pixel_ratio().min(2.0);
        let rect = canvas.get_bounding_client_rect();
        let w_px = (rect.width() * dpr) as u32;
        let h_px = (rect.height() * dpr) as u32;
        canvas.set_width(w_px.max(1));
        canvas.set_height(h_px.max(1));
    }
}

/// Decor selection from the page query string (`?decor=snow`), defaulting to
/// the road.
pub fn decor_from_location(window: &web::Window) -> DecorKind {
    let search = window.location().search().unwrap_or_default();
    search
        .trim_start_matches('?')
        .split('&')
        .find_map(|pair| {
            let (key, value) = pair.split_once('=')?;
            (key == "decor").then(|| DecorKind::from_name(value)).flatten()
        })
        .unwrap_or(DecorKind::Road)
}

pub fn alert(message: &str) {
    if let Some(w) = web::window() {
        let _ = w.alert_with_message(message);
    }
}
