use showcase_core::decor::{DecorConfig, DecorKind, ModelFailurePolicy, PAINTS};

#[test]
fn every_preset_is_finite() {
    for kind in DecorKind::ALL {
        let decor = DecorConfig::preset(kind);
        assert!(decor.is_finite(), "{:?} has non-finite fields", kind);
        assert!(decor.particle_count > 0);
        assert!(decor.ground.half_extent > 0.0);
        assert!(decor.bloom.threshold >= 0.0 && decor.bloom.threshold <= 1.0);
        assert!(
            (decor.sun.direction.length() - 1.0).abs() < 1e-4,
            "sun direction must be normalized"
        );
    }
}

#[test]
fn decor_names_resolve() {
    assert_eq!(DecorKind::from_name("road"), Some(DecorKind::Road));
    assert_eq!(DecorKind::from_name("snow"), Some(DecorKind::SnowMountain));
    assert_eq!(
        DecorKind::from_name("snow-mountain"),
        Some(DecorKind::SnowMountain)
    );
    assert_eq!(DecorKind::from_name("garage"), Some(DecorKind::Garage));
    assert_eq!(DecorKind::from_name("showroom"), Some(DecorKind::Showroom));
    assert_eq!(DecorKind::from_name("moon"), None);
}

#[test]
fn failure_policies_follow_the_variant_family() {
    assert_eq!(
        DecorConfig::preset(DecorKind::Road).model_failure,
        ModelFailurePolicy::FallbackPlane
    );
    assert_eq!(
        DecorConfig::preset(DecorKind::SnowMountain).model_failure,
        ModelFailurePolicy::FallbackPlane
    );
    assert_eq!(
        DecorConfig::preset(DecorKind::Garage).model_failure,
        ModelFailurePolicy::LogOnly
    );
    assert_eq!(
        DecorConfig::preset(DecorKind::Showroom).model_failure,
        ModelFailurePolicy::Alert
    );
}

#[test]
fn paint_palette_is_usable() {
    assert!(PAINTS.len() >= 4);
    assert_eq!(PAINTS[0].name, "Cosmos Black");
    for paint in PAINTS {
        assert!(paint.rgb.iter().all(|c| (0.0..=1.0).contains(c)));
        assert!(!paint.name.is_empty());
    }
}
