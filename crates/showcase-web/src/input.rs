use showcase_core::OrbitRig;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys as web;

#[derive(Default, Clone, Copy)]
pub struct PointerState {
    pub down: bool,
    pub last_x: f32,
    pub last_y: f32,
}

/// Drag-to-orbit and wheel-to-zoom on the canvas. Panning is disabled by
/// construction: drags only move yaw/pitch.
pub fn wire_pointer_orbit(canvas: &web::HtmlCanvasElement, rig: Rc<RefCell<OrbitRig>>) {
    let pointer = Rc::new(RefCell::new(PointerState::default()));

    // pointerdown
    {
        let pointer_down = pointer.clone();
        let canvas_target = canvas.clone();
        let closure =
            wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::PointerEvent| {
                let mut p = pointer_down.borrow_mut();
                p.down = true;
                p.last_x = ev.client_x() as f32;
                p.last_y = ev.client_y() as f32;
                let _ = canvas_target.set_pointer_capture(ev.pointer_id());
                ev.prevent_default();
            }) as Box<dyn FnMut(_)>);
        let _ = canvas.add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    // pointermove
    {
        let pointer_move = pointer.clone();
        let rig_move = rig.clone();
        let closure =
            wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::PointerEvent| {
                let mut p = pointer_move.borrow_mut();
                if !p.down {
                    return;
                }
                let x = ev.client_x() as f32;
                let y = ev.client_y() as f32;
                let dx = x - p.last_x;
                let dy = y - p.last_y;
                p.last_x = x;
                p.last_y = y;
                rig_move.borrow_mut().drag(dx, dy);
            }) as Box<dyn FnMut(_)>);
        if let Some(wnd) = web::window() {
            let _ =
                wnd.add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
        }
        closure.forget();
    }

    // pointerup
    {
        let pointer_up = pointer.clone();
        let closure =
            wasm_bindgen::closure::Closure::wrap(Box::new(move |_ev: web::PointerEvent| {
                pointer_up.borrow_mut().down = false;
            }) as Box<dyn FnMut(_)>);
        if let Some(wnd) = web::window() {
            let _ =
                wnd.add_event_listener_with_callback("pointerup", closure.as_ref().unchecked_ref());
        }
        closure.forget();
    }

    // wheel zoom
    {
        let rig_wheel = rig.clone();
        let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::WheelEvent| {
            rig_wheel.borrow_mut().zoom(ev.delta_y() as f32);
            ev.prevent_default();
        }) as Box<dyn FnMut(_)>);
        let _ = canvas.add_event_listener_with_callback("wheel", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}
