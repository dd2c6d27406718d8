//! The per-frame showcase step shared by both frontends.
//!
//! Everything here is pure arithmetic over the showcase state: warp scroll,
//! particle drift, camera shake, chromatic-shift easing, preset glides and
//! the damped orbit. The frontends only add rendering and event wiring.

use crate::camera::{CameraGlide, CameraPose, OrbitRig};
use crate::constants::*;
use crate::motion::{ParticleField, RoadScroll};
use crate::state::ShowcaseState;
use glam::Vec3;
use rand::prelude::*;

/// Per-frame outputs the renderer consumes.
#[derive(Clone, Copy, Debug)]
pub struct TickOutput {
    /// Chromatic-shift amount for the composite pass.
    pub chroma_amount: f32,
    /// Warp camera shake, applied as an eye offset this frame only.
    pub eye_jitter: Vec3,
    /// Whether the camera is still gliding toward a preset.
    pub gliding: bool,
}

/// Owns the frame-rate-independent pieces of the per-frame step.
pub struct Ticker {
    chroma_amount: f32,
    rng: StdRng,
}

impl Ticker {
    pub fn new(seed: u64) -> Self {
        Self {
            chroma_amount: 0.0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn chroma_amount(&self) -> f32 {
        self.chroma_amount
    }

    /// Advance the showcase by `dt_sec`. Speeds are expressed per reference
    /// frame in the decor constants and scaled by dt here.
    #[allow(clippy::too_many_arguments)]
    pub fn advance(
        &mut self,
        dt_sec: f32,
        state: &ShowcaseState,
        pose: &mut CameraPose,
        rig: &mut OrbitRig,
        glide: &mut CameraGlide,
        particles: &mut ParticleField,
        road: &mut RoadScroll,
    ) -> TickOutput {
        let frames = dt_sec * REFERENCE_FRAME_RATE;
        let speed = if state.warping {
            WARP_SCROLL_PER_FRAME
        } else {
            IDLE_DRIFT_PER_FRAME
        } * frames;

        if state.warping {
            road.advance(speed);
        }
        particles.step(speed);

        let eye_jitter = if state.warping {
            self.chroma_amount = CHROMA_WARP_BASE + self.rng.gen::<f32>() * CHROMA_WARP_JITTER;
            Vec3::new(
                (self.rng.gen::<f32>() - 0.5) * WARP_SHAKE_AMPLITUDE,
                (self.rng.gen::<f32>() - 0.5) * WARP_SHAKE_AMPLITUDE,
                0.0,
            )
        } else {
            self.chroma_amount += (0.0 - self.chroma_amount) * CHROMA_DECAY_ALPHA;
            Vec3::ZERO
        };

        let gliding = glide.tick(&mut pose.eye, &mut pose.target);
        if gliding {
            if !glide.is_active() {
                // Arrived this frame: hand the eye back to the orbit rig.
                rig.set_from_eye(pose.eye);
            }
        } else {
            if state.auto_rotate && !state.warping {
                rig.auto_rotate(dt_sec);
            }
            rig.update();
            pose.eye = rig.eye();
            pose.target = rig.target;
        }

        TickOutput {
            chroma_amount: self.chroma_amount,
            eye_jitter,
            gliding,
        }
    }
}
