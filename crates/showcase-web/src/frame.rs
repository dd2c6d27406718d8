use crate::constants::*;
use crate::dom;
use crate::overlay;
use crate::render;
use instant::Instant;
use showcase_core::asset::{AssetError, CarModel, EnvironmentMap, TextureData};
use showcase_core::{
    car_transform, fit_to_length, Calibrator, CameraGlide, CameraPose, DecorConfig, FitTransform,
    OrbitRig, ParticleField, RoadScroll, SceneContents, ShowcaseState, Ticker, CAR_TARGET_LENGTH,
    PAINTS,
};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Results of the fire-and-forget asset loads, queued for the frame tick to
/// apply whenever they land. No ordering between them is assumed.
pub struct AssetQueues {
    pub model: Rc<RefCell<Option<Result<CarModel, AssetError>>>>,
    pub environment: Rc<RefCell<Option<EnvironmentMap>>>,
    pub ground: Rc<RefCell<Option<TextureData>>>,
}

impl AssetQueues {
    pub fn new() -> Self {
        Self {
            model: Rc::new(RefCell::new(None)),
            environment: Rc::new(RefCell::new(None)),
            ground: Rc::new(RefCell::new(None)),
        }
    }
}

impl Default for AssetQueues {
    fn default() -> Self {
        Self::new()
    }
}

pub struct FrameContext {
    pub state: Rc<RefCell<ShowcaseState>>,
    pub glide: Rc<RefCell<CameraGlide>>,
    pub rig: Rc<RefCell<OrbitRig>>,
    pub road: Rc<RefCell<RoadScroll>>,
    pub scene: Rc<RefCell<SceneContents>>,
    pub calibrator: Rc<RefCell<Calibrator>>,
    pub queues: AssetQueues,

    pub canvas: web::HtmlCanvasElement,
    pub decor: DecorConfig,
    pub pose: CameraPose,
    pub particles: ParticleField,
    pub ticker: Ticker,
    pub gpu: Option<render::GpuState<'static>>,
    pub fit: Option<FitTransform>,
    pub last_instant: Instant,
    pub revealed: bool,
}

impl FrameContext {
    pub fn frame(&mut self) {
        let now = Instant::now();
        let dt = (now - self.last_instant).as_secs_f32().min(0.1);
        self.last_instant = now;

        self.drain_asset_queues();

        let state = *self.state.borrow();
        let out = {
            let mut rig = self.rig.borrow_mut();
            let mut glide = self.glide.borrow_mut();
            let mut road = self.road.borrow_mut();
            self.ticker.advance(
                dt,
                &state,
                &mut self.pose,
                &mut rig,
                &mut glide,
                &mut self.particles,
                &mut road,
            )
        };

        let cal = *self.calibrator.borrow();
        let car = match self.fit {
            Some(fit) => car_transform(fit, cal.position, cal.rotation),
            None => glam::Mat4::IDENTITY,
        };
        let paint = PAINTS
            .get(state.paint_index)
            .map(|p| p.rgb)
            .unwrap_or([1.0, 1.0, 1.0]);

        if let Some(gpu) = &mut self.gpu {
            let w = self.canvas.width();
            let h = self.canvas.height();
            gpu.resize_if_needed(w, h);
            let params = render::FrameParams {
                eye: self.pose.eye + out.eye_jitter,
                target: self.pose.target,
                particle_positions: self.particles.positions(),
                car_transform: car,
                ground_offset_z: self.road.borrow().offset(),
                paint_rgb: paint,
                xray: state.xray,
                chroma_amount: out.chroma_amount,
                dt_sec: dt,
            };
            if let Err(e) = gpu.render(&params) {
                log::error!("render error: {:?}", e);
            }
        }
    }

    /// Apply whichever asset loads completed since the last frame.
    fn drain_asset_queues(&mut self) {
        if let Some(result) = self.queues.model.borrow_mut().take() {
            let mut scene = self.scene.borrow_mut();
            scene.attach_model(result, &self.decor);
            if let Some(model) = &scene.car {
                self.fit = fit_to_length(model.aabb, CAR_TARGET_LENGTH, 0.0);
                if self.fit.is_none() {
                    log::warn!("model bounding box is degenerate; leaving it unscaled");
                    self.fit = Some(FitTransform::IDENTITY);
                }
                if let Some(gpu) = &mut self.gpu {
                    gpu.upload_model(model);
                }
            }
            if let Some(plane) = &scene.fallback_ground {
                if let Some(gpu) = &mut self.gpu {
                    gpu.upload_fallback(plane);
                }
            }
            if let Some(message) = scene.alert.take() {
                dom::alert(&message);
            }
            if scene.has_model_fixture() && !self.revealed {
                self.revealed = true;
                if let Some(doc) = dom::window_document() {
                    overlay::hide_loader(&doc);
                    overlay::reveal_ui(&doc);
                }
            }
        }
        if let Some(env) = self.queues.environment.borrow_mut().take() {
            if let Some(gpu) = &mut self.gpu {
                gpu.set_environment(&env);
            }
        }
        if let Some(tex) = self.queues.ground.borrow_mut().take() {
            if let Some(gpu) = &mut self.gpu {
                gpu.set_ground_texture(&tex);
            }
        }
    }
}

pub async fn init_gpu(
    canvas: &web::HtmlCanvasElement,
    decor: DecorConfig,
) -> Option<render::GpuState<'static>> {
    // leak a canvas clone to satisfy 'static lifetime for surface
    let leaked_canvas = Box::leak(Box::new(canvas.clone()));
    match render::GpuState::new(leaked_canvas, decor).await {
        Ok(g) => Some(g),
        Err(e) => {
            log::error!("WebGPU init error: {:?}", e);
            None
        }
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    let frame_ctx_tick = frame_ctx.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame_ctx_tick.borrow_mut().frame();
        if let Some(w) = web::window() {
            let _ = w.request_animation_frame(
                tick_clone
                    .borrow()
                    .as_ref()
                    .unwrap()
                    .as_ref()
                    .unchecked_ref(),
            );
        }
    }) as Box<dyn FnMut()>));
    if let Some(w) = web::window() {
        let _ = w.request_animation_frame(tick.borrow().as_ref().unwrap().as_ref().unchecked_ref());
    }
}

/// Seeded particle field sized for the decor.
pub fn build_particles(decor: &DecorConfig) -> ParticleField {
    ParticleField::new(
        decor.particle_count,
        showcase_core::PARTICLE_FIELD_EXTENT,
        PARTICLE_SEED,
    )
}

/// The camera pose both the rig and the glide share at startup.
pub fn initial_pose() -> (CameraPose, OrbitRig) {
    let pose = CameraPose::showcase_default();
    let rig = OrbitRig::new(pose.eye, pose.target);
    (pose, rig)
}

pub fn initial_ticker() -> Ticker {
    Ticker::new(TICKER_SEED)
}
