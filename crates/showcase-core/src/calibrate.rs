//! Keyboard transform-calibration tool.
//!
//! Each keypress adds a fixed step to one position or rotation component of
//! the car placement. The accumulated values are logged as a single line for
//! copy-paste into a decor preset.

use crate::constants::{CALIBRATE_POSITION_STEP, CALIBRATE_ROTATION_STEP};
use glam::Vec3;

/// One calibration keypress: which component moves, and in which direction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Nudge {
    PosX(f32),
    PosY(f32),
    PosZ(f32),
    RotX(f32),
    RotY(f32),
    RotZ(f32),
}

/// Fixed key map: position on WASD/QE, rotation on IJKL/UO.
#[inline]
pub fn nudge_for_key(key: &str) -> Option<Nudge> {
    match key {
        "w" | "W" => Some(Nudge::PosZ(-1.0)),
        "s" | "S" => Some(Nudge::PosZ(1.0)),
        "a" | "A" => Some(Nudge::PosX(-1.0)),
        "d" | "D" => Some(Nudge::PosX(1.0)),
        "q" | "Q" => Some(Nudge::PosY(1.0)),
        "e" | "E" => Some(Nudge::PosY(-1.0)),
        "i" | "I" => Some(Nudge::RotX(-1.0)),
        "k" | "K" => Some(Nudge::RotX(1.0)),
        "j" | "J" => Some(Nudge::RotY(-1.0)),
        "l" | "L" => Some(Nudge::RotY(1.0)),
        "u" | "U" => Some(Nudge::RotZ(-1.0)),
        "o" | "O" => Some(Nudge::RotZ(1.0)),
        _ => None,
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Calibrator {
    pub position: Vec3,
    pub rotation: Vec3,
    pub position_step: f32,
    pub rotation_step: f32,
}

impl Default for Calibrator {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            position_step: CALIBRATE_POSITION_STEP,
            rotation_step: CALIBRATE_ROTATION_STEP,
        }
    }
}

impl Calibrator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from the current decor placement so the reported values can be
    /// pasted straight back into the preset.
    pub fn from_placement(position: Vec3, rotation_y: f32) -> Self {
        Self {
            position,
            rotation: Vec3::new(0.0, rotation_y, 0.0),
            ..Self::default()
        }
    }

    pub fn apply(&mut self, nudge: Nudge) {
        match nudge {
            Nudge::PosX(s) => self.position.x += s * self.position_step,
            Nudge::PosY(s) => self.position.y += s * self.position_step,
            Nudge::PosZ(s) => self.position.z += s * self.position_step,
            Nudge::RotX(s) => self.rotation.x += s * self.rotation_step,
            Nudge::RotY(s) => self.rotation.y += s * self.rotation_step,
            Nudge::RotZ(s) => self.rotation.z += s * self.rotation_step,
        }
    }

    /// One line suitable for the console and for pasting into a decor preset.
    pub fn report(&self) -> String {
        format!(
            "car placement: offset = ({:.2}, {:.2}, {:.2}), rotation = ({:.3}, {:.3}, {:.3})",
            self.position.x,
            self.position.y,
            self.position.z,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z
        )
    }
}
