//! Decor presets.
//!
//! Every per-variant parameter the original showcase family mutated by hand
//! (exposure, bloom shape, sun placement, ground tiling, car offsets,
//! particle tint, asset paths) lives here as data, so both frontends build
//! one parameterized scene instead of near-duplicate scripts.

use glam::Vec3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecorKind {
    Road,
    SnowMountain,
    Garage,
    Showroom,
}

impl DecorKind {
    pub const ALL: [DecorKind; 4] = [
        DecorKind::Road,
        DecorKind::SnowMountain,
        DecorKind::Garage,
        DecorKind::Showroom,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "road" => Some(DecorKind::Road),
            "snow" | "snow-mountain" => Some(DecorKind::SnowMountain),
            "garage" => Some(DecorKind::Garage),
            "showroom" => Some(DecorKind::Showroom),
            _ => None,
        }
    }
}

/// What to do when the car model fails to load.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModelFailurePolicy {
    /// Log the error and leave the scene without a car.
    LogOnly,
    /// Substitute a flat ground plane so the decor is not empty.
    FallbackPlane,
    /// Log and raise a user-facing dialog about the missing file.
    Alert,
}

#[derive(Clone, Copy, Debug)]
pub struct BloomConfig {
    pub threshold: f32,
    pub strength: f32,
    pub radius: f32,
}

#[derive(Clone, Copy, Debug)]
pub struct SunConfig {
    /// Direction the light travels, normalized (world position negated).
    pub direction: Vec3,
    pub intensity: f32,
    pub color: [f32; 3],
}

impl SunConfig {
    fn from_position(position: Vec3, intensity: f32, color: [f32; 3]) -> Self {
        Self {
            direction: (-position).normalize(),
            intensity,
            color,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct GroundConfig {
    pub half_extent: f32,
    pub texture_repeat: f32,
    pub roughness: f32,
    pub metalness: f32,
    pub y_offset: f32,
}

#[derive(Clone, Copy, Debug)]
pub struct AssetPaths {
    pub model: &'static str,
    pub environment: &'static str,
    pub ground_color: &'static str,
    pub startup_audio: &'static str,
}

#[derive(Clone, Copy, Debug)]
pub struct DecorConfig {
    pub kind: DecorKind,
    pub name: &'static str,
    pub exposure: f32,
    pub background_intensity: f32,
    pub environment_intensity: f32,
    pub bloom: BloomConfig,
    pub sun: SunConfig,
    pub ground: GroundConfig,
    pub car_offset: Vec3,
    pub car_rotation_y: f32,
    pub particle_color: [f32; 3],
    pub particle_opacity: f32,
    pub particle_count: usize,
    pub clear_color: [f32; 3],
    pub model_failure: ModelFailurePolicy,
    pub assets: AssetPaths,
}

impl DecorConfig {
    pub fn preset(kind: DecorKind) -> Self {
        match kind {
            DecorKind::Road => Self {
                kind,
                name: "Coastal Road",
                exposure: 1.0,
                background_intensity: 1.0,
                environment_intensity: 1.2,
                bloom: BloomConfig {
                    threshold: 0.8,
                    strength: 0.3,
                    radius: 0.5,
                },
                sun: SunConfig::from_position(Vec3::new(-10.0, 20.0, 30.0), 3.0, [1.0, 1.0, 1.0]),
                ground: GroundConfig {
                    half_extent: 200.0,
                    texture_repeat: 20.0,
                    roughness: 0.8,
                    metalness: 0.1,
                    y_offset: -0.05,
                },
                car_offset: Vec3::ZERO,
                car_rotation_y: 0.0,
                particle_color: [1.0, 0.867, 0.667],
                particle_opacity: 0.4,
                particle_count: 1500,
                clear_color: [0.02, 0.03, 0.05],
                model_failure: ModelFailurePolicy::FallbackPlane,
                assets: AssetPaths {
                    model: "assets/cla45.glb",
                    environment: "assets/road/decor.hdr",
                    ground_color: "assets/road/road_color.jpg",
                    startup_audio: "assets/startup.mp3",
                },
            },
            DecorKind::SnowMountain => Self {
                kind,
                name: "Snow Mountain",
                exposure: 0.85,
                background_intensity: 1.1,
                environment_intensity: 1.5,
                bloom: BloomConfig {
                    threshold: 0.7,
                    strength: 0.45,
                    radius: 0.6,
                },
                sun: SunConfig::from_position(Vec3::new(15.0, 25.0, -20.0), 2.4, [0.92, 0.96, 1.0]),
                ground: GroundConfig {
                    half_extent: 200.0,
                    texture_repeat: 14.0,
                    roughness: 0.55,
                    metalness: 0.0,
                    y_offset: -0.02,
                },
                car_offset: Vec3::new(0.0, 0.0, -1.2),
                car_rotation_y: 0.35,
                particle_color: [0.95, 0.97, 1.0],
                particle_opacity: 0.6,
                particle_count: 2200,
                clear_color: [0.04, 0.05, 0.07],
                model_failure: ModelFailurePolicy::FallbackPlane,
                assets: AssetPaths {
                    model: "assets/cla45.glb",
                    environment: "assets/snow/decor.hdr",
                    ground_color: "assets/snow/snow_color.jpg",
                    startup_audio: "assets/startup.mp3",
                },
            },
            DecorKind::Garage => Self {
                kind,
                name: "Night Garage",
                exposure: 1.25,
                background_intensity: 0.6,
                environment_intensity: 0.8,
                bloom: BloomConfig {
                    threshold: 0.6,
                    strength: 0.5,
                    radius: 0.4,
                },
                sun: SunConfig::from_position(Vec3::new(0.0, 12.0, 6.0), 1.6, [1.0, 0.93, 0.82]),
                ground: GroundConfig {
                    half_extent: 30.0,
                    texture_repeat: 6.0,
                    roughness: 0.35,
                    metalness: 0.2,
                    y_offset: -0.04,
                },
                car_offset: Vec3::ZERO,
                car_rotation_y: -0.6,
                particle_color: [0.8, 0.8, 0.85],
                particle_opacity: 0.15,
                particle_count: 600,
                clear_color: [0.015, 0.015, 0.02],
                model_failure: ModelFailurePolicy::LogOnly,
                assets: AssetPaths {
                    model: "assets/cla45.glb",
                    environment: "assets/garage/decor.hdr",
                    ground_color: "assets/garage/concrete_color.jpg",
                    startup_audio: "assets/startup.mp3",
                },
            },
            DecorKind::Showroom => Self {
                kind,
                name: "Showroom",
                exposure: 1.1,
                background_intensity: 0.9,
                environment_intensity: 2.0,
                bloom: BloomConfig {
                    threshold: 0.85,
                    strength: 0.25,
                    radius: 0.5,
                },
                sun: SunConfig::from_position(Vec3::new(4.0, 18.0, 10.0), 2.0, [1.0, 1.0, 1.0]),
                ground: GroundConfig {
                    half_extent: 60.0,
                    texture_repeat: 10.0,
                    roughness: 0.15,
                    metalness: 0.3,
                    y_offset: -0.03,
                },
                car_offset: Vec3::ZERO,
                car_rotation_y: 0.8,
                particle_color: [1.0, 1.0, 1.0],
                particle_opacity: 0.1,
                particle_count: 400,
                clear_color: [0.03, 0.03, 0.035],
                model_failure: ModelFailurePolicy::Alert,
                assets: AssetPaths {
                    model: "assets/cla45.glb",
                    environment: "assets/showroom/decor.hdr",
                    ground_color: "assets/showroom/floor_color.jpg",
                    startup_audio: "assets/startup.mp3",
                },
            },
        }
    }

    /// All numeric fields must be finite (spec: values are "numeric and finite").
    pub fn is_finite(&self) -> bool {
        let scalars = [
            self.exposure,
            self.background_intensity,
            self.environment_intensity,
            self.bloom.threshold,
            self.bloom.strength,
            self.bloom.radius,
            self.sun.intensity,
            self.ground.half_extent,
            self.ground.texture_repeat,
            self.ground.roughness,
            self.ground.metalness,
            self.ground.y_offset,
            self.car_rotation_y,
            self.particle_opacity,
        ];
        scalars.iter().all(|v| v.is_finite())
            && self.sun.direction.is_finite()
            && self.car_offset.is_finite()
            && self.particle_color.iter().all(|v| v.is_finite())
            && self.clear_color.iter().all(|v| v.is_finite())
    }
}

/// A selectable body paint.
#[derive(Clone, Copy, Debug)]
pub struct Paint {
    pub name: &'static str,
    pub rgb: [f32; 3],
}

pub const PAINTS: &[Paint] = &[
    Paint {
        name: "Cosmos Black",
        rgb: [0.066, 0.066, 0.066],
    },
    Paint {
        name: "Polar White",
        rgb: [0.91, 0.92, 0.93],
    },
    Paint {
        name: "Inferno Red",
        rgb: [0.72, 0.05, 0.07],
    },
    Paint {
        name: "Abyss Blue",
        rgb: [0.05, 0.12, 0.35],
    },
    Paint {
        name: "Lunar Silver",
        rgb: [0.62, 0.64, 0.67],
    },
];
