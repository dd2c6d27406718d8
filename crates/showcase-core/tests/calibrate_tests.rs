use glam::Vec3;
use showcase_core::calibrate::{nudge_for_key, Calibrator, Nudge};
use showcase_core::constants::{CALIBRATE_POSITION_STEP, CALIBRATE_ROTATION_STEP};

#[test]
fn key_map_covers_position_and_rotation() {
    assert_eq!(nudge_for_key("w"), Some(Nudge::PosZ(-1.0)));
    assert_eq!(nudge_for_key("S"), Some(Nudge::PosZ(1.0)));
    assert_eq!(nudge_for_key("a"), Some(Nudge::PosX(-1.0)));
    assert_eq!(nudge_for_key("d"), Some(Nudge::PosX(1.0)));
    assert_eq!(nudge_for_key("q"), Some(Nudge::PosY(1.0)));
    assert_eq!(nudge_for_key("e"), Some(Nudge::PosY(-1.0)));
    assert_eq!(nudge_for_key("j"), Some(Nudge::RotY(-1.0)));
    assert_eq!(nudge_for_key("L"), Some(Nudge::RotY(1.0)));
    assert_eq!(nudge_for_key("i"), Some(Nudge::RotX(-1.0)));
    assert_eq!(nudge_for_key("k"), Some(Nudge::RotX(1.0)));
    assert_eq!(nudge_for_key("u"), Some(Nudge::RotZ(-1.0)));
    assert_eq!(nudge_for_key("o"), Some(Nudge::RotZ(1.0)));
}

#[test]
fn unmapped_keys_are_ignored() {
    for key in ["z", "Z", "1", " ", "Enter", "ArrowUp", ""] {
        assert_eq!(nudge_for_key(key), None, "key {key:?} should not nudge");
    }
}

#[test]
fn nudges_accumulate_by_fixed_steps() {
    let mut cal = Calibrator::new();
    for _ in 0..3 {
        cal.apply(Nudge::PosX(1.0));
    }
    cal.apply(Nudge::PosX(-1.0));
    cal.apply(Nudge::RotY(1.0));
    cal.apply(Nudge::RotY(1.0));

    assert!((cal.position.x - 2.0 * CALIBRATE_POSITION_STEP).abs() < 1e-6);
    assert_eq!(cal.position.y, 0.0);
    assert!((cal.rotation.y - 2.0 * CALIBRATE_ROTATION_STEP).abs() < 1e-6);
}

#[test]
fn calibrator_starts_from_decor_placement() {
    let cal = Calibrator::from_placement(Vec3::new(0.0, 0.0, -1.2), 0.35);
    assert_eq!(cal.position.z, -1.2);
    assert_eq!(cal.rotation.y, 0.35);
}

#[test]
fn report_is_copy_pasteable() {
    let mut cal = Calibrator::new();
    cal.apply(Nudge::PosZ(1.0));
    cal.apply(Nudge::PosZ(1.0));
    cal.apply(Nudge::RotY(-1.0));
    let line = cal.report();
    assert!(line.contains("offset = (0.00, 0.00, 0.20)"), "{line}");
    assert!(line.contains("rotation = (0.000, -0.050, 0.000)"), "{line}");
}
