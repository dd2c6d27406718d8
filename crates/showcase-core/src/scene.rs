//! Scene contents and the model-failure policy.

use crate::asset::{fallback_ground_plane, AssetError, CarModel, MeshPrimitive};
use crate::decor::{DecorConfig, ModelFailurePolicy};

/// What the asset loads have attached so far. Each load mutates this
/// opportunistically on completion; there is no ordering between them.
#[derive(Default)]
pub struct SceneContents {
    pub car: Option<CarModel>,
    pub fallback_ground: Option<MeshPrimitive>,
    /// Message for a user-facing dialog, set once by the Alert policy.
    pub alert: Option<String>,
}

impl SceneContents {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once either the car or its fallback is in the scene, i.e. the
    /// loading overlay can come down.
    pub fn has_model_fixture(&self) -> bool {
        self.car.is_some() || self.fallback_ground.is_some()
    }

    /// Apply the outcome of the model load. On failure the decor's policy
    /// decides between logging only, substituting a flat ground plane, and
    /// raising an alert.
    pub fn attach_model(&mut self, result: Result<CarModel, AssetError>, decor: &DecorConfig) {
        match result {
            Ok(model) => {
                log::info!(
                    "model attached: {} primitives ({} bodywork)",
                    model.primitives.len(),
                    model.body_primitive_count()
                );
                self.car = Some(model);
            }
            Err(err) => {
                log::error!("model load failed: {err}");
                match decor.model_failure {
                    ModelFailurePolicy::LogOnly => {}
                    ModelFailurePolicy::FallbackPlane => {
                        self.fallback_ground =
                            Some(fallback_ground_plane(decor.ground.half_extent));
                    }
                    ModelFailurePolicy::Alert => {
                        self.alert = Some(format!(
                            "Model file '{}' is missing or unreadable.",
                            decor.assets.model
                        ));
                    }
                }
            }
        }
    }
}
