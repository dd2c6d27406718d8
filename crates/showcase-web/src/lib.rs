#![cfg(target_arch = "wasm32")]

use instant::Instant;
use showcase_core::asset;
use showcase_core::{Calibrator, CameraGlide, DecorConfig, RoadScroll, SceneContents, ShowcaseState};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod audio;
mod constants;
mod dom;
mod events;
mod fetch;
mod frame;
mod input;
mod overlay;
mod render;

use constants::CANVAS_ID;

fn wire_canvas_resize(canvas: &web::HtmlCanvasElement) {
    dom::sync_canvas_backing_size(canvas);
    let canvas_resize = canvas.clone();
    let resize_closure = Closure::wrap(Box::new(move || {
        dom::sync_canvas_backing_size(&canvas_resize);
    }) as Box<dyn FnMut()>);
    if let Some(window) = web::window() {
        _ = window
            .add_event_listener_with_callback("resize", resize_closure.as_ref().unchecked_ref());
    }
    resize_closure.forget();
}

/// Kick off the three independent asset loads. Each one pushes its result
/// into a queue the frame tick drains; failures are resolved there too.
fn spawn_asset_loads(decor: DecorConfig, queues: &frame::AssetQueues) {
    {
        let queue = queues.model.clone();
        spawn_local(async move {
            let result = match fetch::fetch_bytes(decor.assets.model).await {
                Ok(bytes) => asset::parse_model(&bytes),
                Err(e) => Err(asset::AssetError::Gltf(e.to_string())),
            };
            *queue.borrow_mut() = Some(result);
        });
    }
    {
        let queue = queues.environment.clone();
        spawn_local(async move {
            match fetch::fetch_bytes(decor.assets.environment).await {
                Ok(bytes) => match asset::decode_environment(&bytes) {
                    Ok(env) => *queue.borrow_mut() = Some(env),
                    Err(e) => log::error!("environment decode failed: {e}"),
                },
                Err(e) => log::error!("environment fetch failed: {e}"),
            }
        });
    }
    {
        let queue = queues.ground.clone();
        spawn_local(async move {
            match fetch::fetch_bytes(decor.assets.ground_color).await {
                Ok(bytes) => match asset::decode_texture(&bytes) {
                    Ok(tex) => *queue.borrow_mut() = Some(tex),
                    Err(e) => log::error!("ground texture decode failed: {e}"),
                },
                Err(e) => log::error!("ground texture fetch failed: {e}"),
            }
        });
    }
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("showcase-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let canvas_el = document
        .get_element_by_id(CANVAS_ID)
        .ok_or_else(|| anyhow::anyhow!("missing #{CANVAS_ID}"))?;
    let canvas: web::HtmlCanvasElement = canvas_el
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;

    // Maintain canvas internal pixel size to match CSS size * devicePixelRatio
    wire_canvas_resize(&canvas);

    let decor = DecorConfig::preset(dom::decor_from_location(&window));
    log::info!("decor: {}", decor.name);

    // Shared mutable showcase state, teacher-style: one Rc<RefCell<..>> per
    // concern, cloned into whichever closure needs it.
    let state = Rc::new(RefCell::new(ShowcaseState::new()));
    let glide = Rc::new(RefCell::new(CameraGlide::new()));
    let road = Rc::new(RefCell::new(RoadScroll::new()));
    let scene = Rc::new(RefCell::new(SceneContents::new()));
    let calibrator = Rc::new(RefCell::new(Calibrator::from_placement(
        decor.car_offset,
        decor.car_rotation_y,
    )));
    let (pose, rig) = frame::initial_pose();
    let rig = Rc::new(RefCell::new(rig));

    events::wire_showcase_buttons(events::ButtonWiring {
        document: document.clone(),
        state: state.clone(),
        glide: glide.clone(),
        road: road.clone(),
        scene: scene.clone(),
        decor,
    });
    events::wire_calibration_keys(calibrator.clone());
    input::wire_pointer_orbit(&canvas, rig.clone());

    let gpu = frame::init_gpu(&canvas, decor).await;

    let queues = frame::AssetQueues::new();
    spawn_asset_loads(decor, &queues);

    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext {
        state,
        glide,
        rig,
        road,
        scene,
        calibrator,
        queues,
        canvas,
        decor,
        pose,
        particles: frame::build_particles(&decor),
        ticker: frame::initial_ticker(),
        gpu,
        fit: None,
        last_instant: Instant::now(),
        revealed: false,
    }));
    frame::start_loop(frame_ctx);

    Ok(())
}
