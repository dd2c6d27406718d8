use glam::Vec3;
use showcase_core::camera::{Camera, CameraGlide, CameraView, OrbitRig};
use showcase_core::constants::*;

#[test]
fn glide_terminates_and_clears_goal() {
    // Property: the easing loop terminates once the eye is within epsilon of
    // the goal, after which ticks are no-ops.
    let goal = CameraView::Front.goal().unwrap();
    let mut glide = CameraGlide::new();
    glide.begin(goal);

    let mut eye = Vec3::from(CAMERA_START_EYE);
    let mut target = Vec3::from(ORBIT_TARGET);
    let mut ticks = 0;
    while glide.is_active() {
        assert!(glide.tick(&mut eye, &mut target));
        ticks += 1;
        assert!(ticks < 10_000, "glide never arrived");
    }
    assert!(eye.distance(goal) < CAMERA_ARRIVE_EPSILON);

    let frozen = eye;
    assert!(!glide.tick(&mut eye, &mut target));
    assert_eq!(eye, frozen);
}

#[test]
fn glide_distance_is_non_increasing() {
    let goal = CameraView::Back.goal().unwrap();
    let mut glide = CameraGlide::new();
    glide.begin(goal);
    let mut eye = Vec3::from(CAMERA_START_EYE);
    let mut target = Vec3::from(ORBIT_TARGET);
    let mut prev = eye.distance(goal);
    for _ in 0..500 {
        if !glide.tick(&mut eye, &mut target) {
            break;
        }
        let d = eye.distance(goal);
        assert!(d <= prev + 1e-5, "distance increased from {prev} to {d}");
        prev = d;
    }
}

#[test]
fn view_presets_match_showcase_positions() {
    assert_eq!(CameraView::Front.goal(), Some(Vec3::new(0.0, 1.2, 8.5)));
    assert_eq!(CameraView::Side.goal(), Some(Vec3::new(9.5, 1.2, 0.0)));
    assert_eq!(CameraView::Back.goal(), Some(Vec3::new(0.0, 1.8, -8.5)));
    assert_eq!(CameraView::Auto.goal(), None);
    assert_eq!(CameraView::from_name("front"), Some(CameraView::Front));
    assert_eq!(CameraView::from_name("orbit"), None);
}

#[test]
fn orbit_zoom_and_pitch_stay_clamped() {
    let mut rig = OrbitRig::new(Vec3::from(CAMERA_START_EYE), Vec3::from(ORBIT_TARGET));
    rig.zoom(1_000_000.0);
    for _ in 0..500 {
        rig.update();
    }
    assert!(rig.distance() <= ORBIT_MAX_DISTANCE + 1e-3);

    rig.zoom(-1_000_000.0);
    for _ in 0..500 {
        rig.update();
    }
    assert!(rig.distance() >= ORBIT_MIN_DISTANCE - 1e-3);

    // Drag hard toward the pole and under the ground plane.
    rig.drag(0.0, 1_000_000.0);
    for _ in 0..500 {
        rig.update();
    }
    assert!(rig.pitch() <= ORBIT_PITCH_MAX + 1e-4);
    rig.drag(0.0, -2_000_000.0);
    for _ in 0..500 {
        rig.update();
    }
    assert!(rig.pitch() >= ORBIT_PITCH_MIN - 1e-4);
}

#[test]
fn orbit_auto_rotate_sweeps_yaw() {
    let mut rig = OrbitRig::new(Vec3::from(CAMERA_START_EYE), Vec3::from(ORBIT_TARGET));
    let before = rig.yaw();
    for _ in 0..120 {
        rig.auto_rotate(1.0 / 60.0);
        rig.update();
    }
    assert!((rig.yaw() - before).abs() > 0.1, "yaw did not advance");
}

#[test]
fn orbit_set_from_eye_round_trips() {
    let target = Vec3::from(ORBIT_TARGET);
    let mut rig = OrbitRig::new(Vec3::from(CAMERA_START_EYE), target);
    let eye = Vec3::new(3.0, 2.5, 6.0);
    rig.set_from_eye(eye);
    let back = rig.eye();
    assert!(
        back.distance(eye) < 1e-3,
        "eye round-trip drifted: {back:?} vs {eye:?}"
    );
}

#[test]
fn camera_matrices_are_finite() {
    let cam = Camera::showcase_default(16.0 / 9.0);
    let vp = cam.view_proj();
    assert!(vp.to_cols_array().iter().all(|v| v.is_finite()));
}
