//! Camera types shared by the web and native frontends.
//!
//! These types intentionally avoid referencing platform-specific APIs. The
//! frontends consume them to build view/projection matrices and to drive the
//! damped orbit and the eased preset glides.

use crate::constants::*;
use glam::{Mat4, Vec3};

/// Simple right-handed camera description with perspective projection.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    pub fn showcase_default(aspect: f32) -> Self {
        Self {
            eye: Vec3::from(CAMERA_START_EYE),
            target: Vec3::from(ORBIT_TARGET),
            up: Vec3::Y,
            aspect,
            fovy_radians: CAMERA_FOVY_RADIANS,
            znear: CAMERA_NEAR,
            zfar: CAMERA_FAR,
        }
    }

    /// Compute the clip-space projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }

    /// Compute the view matrix that transforms world to view space.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

/// Camera preset buttons.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CameraView {
    Front,
    Side,
    Back,
    Auto,
}

impl CameraView {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "front" => Some(CameraView::Front),
            "side" => Some(CameraView::Side),
            "back" => Some(CameraView::Back),
            "auto" => Some(CameraView::Auto),
            _ => None,
        }
    }

    /// Eye goal for the preset; `None` for Auto (resume orbiting).
    pub fn goal(self) -> Option<Vec3> {
        match self {
            CameraView::Front => Some(Vec3::new(0.0, 1.2, 8.5)),
            CameraView::Side => Some(Vec3::new(9.5, 1.2, 0.0)),
            CameraView::Back => Some(Vec3::new(0.0, 1.8, -8.5)),
            CameraView::Auto => None,
        }
    }
}

/// Eased motion toward a preset eye position.
///
/// Each tick moves the eye a fixed fraction of the remaining distance toward
/// the goal and eases the look-target toward the preset focus point. Once the
/// eye is within `CAMERA_ARRIVE_EPSILON` of the goal the goal reference is
/// cleared and further ticks are no-ops.
#[derive(Clone, Copy, Debug, Default)]
pub struct CameraGlide {
    goal: Option<Vec3>,
}

impl CameraGlide {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, goal: Vec3) {
        self.goal = Some(goal);
    }

    pub fn cancel(&mut self) {
        self.goal = None;
    }

    pub fn is_active(&self) -> bool {
        self.goal.is_some()
    }

    /// Advance one frame. Returns true while a glide is in progress.
    pub fn tick(&mut self, eye: &mut Vec3, target: &mut Vec3) -> bool {
        let Some(goal) = self.goal else {
            return false;
        };
        *target = target.lerp(Vec3::from(GLIDE_FOCUS), TARGET_EASE_ALPHA);
        *eye = eye.lerp(goal, CAMERA_EASE_ALPHA);
        if eye.distance(goal) < CAMERA_ARRIVE_EPSILON {
            self.goal = None;
        }
        true
    }
}

/// Damped orbit around a fixed target: yaw/pitch/distance with drag goals
/// blended in each frame, auto-rotate sweep, wheel zoom, pan disabled.
#[derive(Clone, Debug)]
pub struct OrbitRig {
    pub target: Vec3,
    yaw: f32,
    pitch: f32,
    distance: f32,
    goal_yaw: f32,
    goal_pitch: f32,
    goal_distance: f32,
}

impl OrbitRig {
    pub fn new(eye: Vec3, target: Vec3) -> Self {
        let (yaw, pitch, distance) = spherical_from_eye(eye, target);
        Self {
            target,
            yaw,
            pitch,
            distance,
            goal_yaw: yaw,
            goal_pitch: pitch,
            goal_distance: distance,
        }
    }

    pub fn eye(&self) -> Vec3 {
        let horizontal = self.distance * self.pitch.cos();
        self.target
            + Vec3::new(
                horizontal * self.yaw.sin(),
                self.distance * self.pitch.sin(),
                horizontal * self.yaw.cos(),
            )
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Pointer drag in pixels.
    pub fn drag(&mut self, dx: f32, dy: f32) {
        self.goal_yaw -= dx * ORBIT_DRAG_SENSITIVITY;
        self.goal_pitch = (self.goal_pitch + dy * ORBIT_DRAG_SENSITIVITY)
            .clamp(ORBIT_PITCH_MIN, ORBIT_PITCH_MAX);
    }

    /// Wheel delta; positive moves the eye away.
    pub fn zoom(&mut self, delta: f32) {
        self.goal_distance = (self.goal_distance + delta * ORBIT_ZOOM_SENSITIVITY)
            .clamp(ORBIT_MIN_DISTANCE, ORBIT_MAX_DISTANCE);
    }

    pub fn auto_rotate(&mut self, dt_sec: f32) {
        self.goal_yaw += AUTO_ROTATE_RADIANS_PER_SEC * dt_sec;
    }

    /// Blend the current orbit parameters toward their goals.
    pub fn update(&mut self) {
        self.yaw += (self.goal_yaw - self.yaw) * ORBIT_DAMPING;
        self.pitch += (self.goal_pitch - self.pitch) * ORBIT_DAMPING;
        self.distance += (self.goal_distance - self.distance) * ORBIT_DAMPING;
        self.pitch = self.pitch.clamp(ORBIT_PITCH_MIN, ORBIT_PITCH_MAX);
        self.distance = self.distance.clamp(ORBIT_MIN_DISTANCE, ORBIT_MAX_DISTANCE);
    }

    /// Re-derive orbit parameters from an externally driven eye (after a
    /// glide ends) so resuming the orbit does not snap.
    pub fn set_from_eye(&mut self, eye: Vec3) {
        let (yaw, pitch, distance) = spherical_from_eye(eye, self.target);
        self.yaw = yaw;
        self.pitch = pitch;
        self.distance = distance;
        self.goal_yaw = yaw;
        self.goal_pitch = pitch;
        self.goal_distance = distance;
    }
}

fn spherical_from_eye(eye: Vec3, target: Vec3) -> (f32, f32, f32) {
    let offset = eye - target;
    let distance = offset
        .length()
        .clamp(ORBIT_MIN_DISTANCE, ORBIT_MAX_DISTANCE);
    let yaw = offset.x.atan2(offset.z);
    let horizontal = (offset.x * offset.x + offset.z * offset.z).sqrt();
    let pitch = offset
        .y
        .atan2(horizontal)
        .clamp(ORBIT_PITCH_MIN, ORBIT_PITCH_MAX);
    (yaw, pitch, distance)
}

/// The eye/target pair actually fed to the renderer each frame.
#[derive(Clone, Copy, Debug)]
pub struct CameraPose {
    pub eye: Vec3,
    pub target: Vec3,
}

impl CameraPose {
    pub fn showcase_default() -> Self {
        Self {
            eye: Vec3::from(CAMERA_START_EYE),
            target: Vec3::from(ORBIT_TARGET),
        }
    }
}
