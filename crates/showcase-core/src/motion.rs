//! Warp-mode motion: the streaming particle field and the looping road.

use crate::constants::*;
use glam::Vec3;
use rand::prelude::*;

/// A field of drifting dust/snow points scattered in a cube around the car.
///
/// Points rise by the current scroll speed each step; anything crossing the
/// ceiling respawns at the floor so the stream never thins out.
pub struct ParticleField {
    positions: Vec<Vec3>,
    extent: f32,
}

impl ParticleField {
    pub fn new(count: usize, extent: f32, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let half = extent * 0.5;
        let positions = (0..count)
            .map(|_| {
                Vec3::new(
                    rng.gen_range(-half..=half),
                    rng.gen_range(-half..=half),
                    rng.gen_range(-half..=half),
                )
            })
            .collect();
        Self { positions, extent }
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn extent(&self) -> f32 {
        self.extent
    }

    /// Advance every point vertically by `dy` world units, respawning at the
    /// floor past the ceiling.
    pub fn step(&mut self, dy: f32) {
        for p in &mut self.positions {
            p.y += dy;
            if p.y > PARTICLE_RESPAWN_CEILING {
                p.y = PARTICLE_RESPAWN_FLOOR;
            }
        }
    }
}

/// Accumulated ground scroll while warping, wrapped at the loop length.
#[derive(Clone, Copy, Debug, Default)]
pub struct RoadScroll {
    offset: f32,
}

impl RoadScroll {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn advance(&mut self, dz: f32) {
        self.offset += dz;
        if self.offset > ROAD_LOOP_LENGTH {
            self.offset = 0.0;
        }
    }

    pub fn reset(&mut self) {
        self.offset = 0.0;
    }
}
