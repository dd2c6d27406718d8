// Shared showcase tuning constants used by both the web and native frontends.

// Car fit: largest bounding-box dimension after auto-scale.
pub const CAR_TARGET_LENGTH: f32 = 4.8;

// Camera projection
pub const CAMERA_FOVY_RADIANS: f32 = std::f32::consts::FRAC_PI_4;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 500.0;

// Camera rig
pub const CAMERA_START_EYE: [f32; 3] = [-8.0, 2.0, 10.0];
pub const ORBIT_TARGET: [f32; 3] = [0.0, 0.8, 0.0];
pub const ORBIT_MIN_DISTANCE: f32 = 4.0;
pub const ORBIT_MAX_DISTANCE: f32 = 20.0;
// Elevation clamp keeps the eye just above the ground plane and off the pole.
pub const ORBIT_PITCH_MIN: f32 = 0.02;
pub const ORBIT_PITCH_MAX: f32 = std::f32::consts::FRAC_PI_2 - 0.05;
pub const ORBIT_DAMPING: f32 = 0.05; // per-frame blend toward drag goal
pub const ORBIT_DRAG_SENSITIVITY: f32 = 0.005; // radians per pixel
pub const ORBIT_ZOOM_SENSITIVITY: f32 = 0.01; // distance units per wheel tick
pub const AUTO_ROTATE_RADIANS_PER_SEC: f32 = 0.35;

// Camera preset easing
pub const GLIDE_FOCUS: [f32; 3] = [0.0, 0.5, 0.0];
pub const CAMERA_EASE_ALPHA: f32 = 0.05; // eye moves this fraction per frame
pub const TARGET_EASE_ALPHA: f32 = 0.1;
pub const CAMERA_ARRIVE_EPSILON: f32 = 0.2;

// Warp mode. Scroll speeds are expressed per reference frame and scaled by
// dt so variable refresh rates keep the same apparent speed.
pub const REFERENCE_FRAME_RATE: f32 = 60.0;
pub const WARP_SCROLL_PER_FRAME: f32 = 5.0;
pub const IDLE_DRIFT_PER_FRAME: f32 = 0.02;
pub const ROAD_LOOP_LENGTH: f32 = 20.0;
pub const WARP_SHAKE_AMPLITUDE: f32 = 0.03;
pub const CHROMA_WARP_BASE: f32 = 0.005;
pub const CHROMA_WARP_JITTER: f32 = 0.003;
pub const CHROMA_DECAY_ALPHA: f32 = 0.1;

// Particle field
pub const PARTICLE_RESPAWN_CEILING: f32 = 50.0;
pub const PARTICLE_RESPAWN_FLOOR: f32 = -100.0;
pub const PARTICLE_FIELD_EXTENT: f32 = 100.0;
pub const PARTICLE_SIZE: f32 = 0.05;

// Transform calibration steps (per keypress)
pub const CALIBRATE_POSITION_STEP: f32 = 0.1;
pub const CALIBRATE_ROTATION_STEP: f32 = 0.05;

// Body paint finish applied to primitives classified as bodywork.
pub const BODY_METALLIC: f32 = 1.0;
pub const BODY_ROUGHNESS: f32 = 0.15;
pub const BODY_ENV_BOOST: f32 = 2.0;

// X-ray material override
pub const XRAY_COLOR: [f32; 3] = [0.0, 0.953, 1.0];
pub const XRAY_OPACITY: f32 = 0.3;

// Engine-start sample volume
pub const ENGINE_AUDIO_VOLUME: f64 = 0.6;
