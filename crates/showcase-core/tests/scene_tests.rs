use showcase_core::asset::{AssetError, CarModel, MeshPrimitive};
use showcase_core::decor::{DecorConfig, DecorKind, ModelFailurePolicy};
use showcase_core::fit::Aabb;
use showcase_core::scene::SceneContents;

fn tiny_model() -> CarModel {
    let prim = MeshPrimitive {
        name: "body_shell".into(),
        material_name: "paint".into(),
        positions: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
        normals: vec![[0.0, 0.0, 1.0]; 3],
        uvs: vec![[0.0, 0.0]; 3],
        indices: vec![0, 1, 2],
        base_color: [1.0, 1.0, 1.0, 1.0],
        metallic: 1.0,
        roughness: 0.2,
        is_body: true,
    };
    let aabb = Aabb::from_points(prim.positions.iter().map(|p| glam::Vec3::from(*p))).unwrap();
    CarModel {
        primitives: vec![prim],
        aabb,
    }
}

fn decor_with_policy(policy: ModelFailurePolicy) -> DecorConfig {
    let mut decor = DecorConfig::preset(DecorKind::Road);
    decor.model_failure = policy;
    decor
}

#[test]
fn successful_load_attaches_the_car() {
    let mut scene = SceneContents::new();
    assert!(!scene.has_model_fixture());
    scene.attach_model(Ok(tiny_model()), &decor_with_policy(ModelFailurePolicy::LogOnly));
    assert!(scene.car.is_some());
    assert!(scene.fallback_ground.is_none());
    assert!(scene.has_model_fixture());
}

#[test]
fn failed_load_substitutes_fallback_only_when_configured() {
    // Property: the fallback fixture is present exactly when the decor's
    // policy asks for it.
    let mut with_fallback = SceneContents::new();
    with_fallback.attach_model(
        Err(AssetError::EmptyModel),
        &decor_with_policy(ModelFailurePolicy::FallbackPlane),
    );
    assert!(with_fallback.car.is_none());
    assert!(with_fallback.fallback_ground.is_some());
    assert!(with_fallback.has_model_fixture());

    let mut without = SceneContents::new();
    without.attach_model(
        Err(AssetError::EmptyModel),
        &decor_with_policy(ModelFailurePolicy::LogOnly),
    );
    assert!(without.car.is_none());
    assert!(without.fallback_ground.is_none());
    assert!(!without.has_model_fixture());
}

#[test]
fn alert_policy_records_a_dialog_message() {
    let mut scene = SceneContents::new();
    let decor = decor_with_policy(ModelFailurePolicy::Alert);
    scene.attach_model(Err(AssetError::EmptyModel), &decor);
    assert!(scene.fallback_ground.is_none());
    let alert = scene.alert.as_deref().expect("alert must be recorded");
    assert!(alert.contains(decor.assets.model), "{alert}");
}

#[test]
fn fallback_plane_spans_the_decor_ground() {
    let decor = decor_with_policy(ModelFailurePolicy::FallbackPlane);
    let mut scene = SceneContents::new();
    scene.attach_model(Err(AssetError::EmptyModel), &decor);
    let plane = scene.fallback_ground.unwrap();
    assert_eq!(plane.indices.len(), 6);
    assert!(!plane.is_body);
    assert!(plane.normals.iter().all(|n| n[1] > 0.99));
    let max_x = plane
        .positions
        .iter()
        .map(|p| p[0].abs())
        .fold(0.0_f32, f32::max);
    assert_eq!(max_x, decor.ground.half_extent);
}
