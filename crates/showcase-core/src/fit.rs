//! Bounding-box auto-scale-and-center for loaded models.

use glam::{EulerRot, Mat4, Vec3};

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Vec3>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut aabb = Aabb {
            min: first,
            max: first,
        };
        for p in iter {
            aabb.min = aabb.min.min(p);
            aabb.max = aabb.max.max(p);
        }
        Some(aabb)
    }

    pub fn union(self, other: Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn largest_dimension(&self) -> f32 {
        self.size().max_element()
    }

    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }

    /// The box after a uniform scale followed by a translation.
    pub fn transformed(&self, scale: f32, translation: Vec3) -> Aabb {
        Aabb {
            min: self.min * scale + translation,
            max: self.max * scale + translation,
        }
    }
}

/// Uniform scale plus translation placing a model in the decor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FitTransform {
    pub scale: f32,
    pub translation: Vec3,
}

impl FitTransform {
    pub const IDENTITY: FitTransform = FitTransform {
        scale: 1.0,
        translation: Vec3::ZERO,
    };

    pub fn apply(&self, p: Vec3) -> Vec3 {
        p * self.scale + self.translation
    }
}

/// World transform for a fitted car: placement offset and rotation applied
/// around the centered, scaled model.
pub fn car_transform(fit: FitTransform, offset: Vec3, rotation: Vec3) -> Mat4 {
    Mat4::from_translation(offset)
        * Mat4::from_euler(EulerRot::XYZ, rotation.x, rotation.y, rotation.z)
        * Mat4::from_translation(fit.translation)
        * Mat4::from_scale(Vec3::splat(fit.scale))
}

/// Scale uniformly so the largest dimension of `aabb` equals `target_len`,
/// then translate so the scaled box is centered on the origin in X and Z.
/// The Y component of the translation is forced to `rest_y` (the model is
/// dropped onto the decor ground reference rather than vertically centered).
///
/// Returns `None` for degenerate or non-finite boxes or targets.
pub fn fit_to_length(aabb: Aabb, target_len: f32, rest_y: f32) -> Option<FitTransform> {
    if !aabb.is_finite() || !target_len.is_finite() || !rest_y.is_finite() {
        return None;
    }
    let max_dim = aabb.largest_dimension();
    if !(max_dim > 0.0) || target_len <= 0.0 {
        return None;
    }
    let scale = target_len / max_dim;
    let center = aabb.center() * scale;
    Some(FitTransform {
        scale,
        translation: Vec3::new(-center.x, rest_y, -center.z),
    })
}
