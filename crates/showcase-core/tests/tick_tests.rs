use glam::Vec3;
use showcase_core::camera::{CameraGlide, CameraPose, CameraView, OrbitRig};
use showcase_core::constants::*;
use showcase_core::motion::{ParticleField, RoadScroll};
use showcase_core::state::ShowcaseState;
use showcase_core::tick::Ticker;

struct Rig {
    state: ShowcaseState,
    pose: CameraPose,
    rig: OrbitRig,
    glide: CameraGlide,
    particles: ParticleField,
    road: RoadScroll,
    ticker: Ticker,
}

fn make_rig() -> Rig {
    let pose = CameraPose::showcase_default();
    Rig {
        state: ShowcaseState::new(),
        rig: OrbitRig::new(pose.eye, pose.target),
        pose,
        glide: CameraGlide::new(),
        particles: ParticleField::new(100, PARTICLE_FIELD_EXTENT, 11),
        road: RoadScroll::new(),
        ticker: Ticker::new(11),
    }
}

fn advance(r: &mut Rig, dt: f32) -> showcase_core::tick::TickOutput {
    r.ticker.advance(
        dt,
        &r.state,
        &mut r.pose,
        &mut r.rig,
        &mut r.glide,
        &mut r.particles,
        &mut r.road,
    )
}

const DT: f32 = 1.0 / 60.0;

#[test]
fn idle_frames_do_not_scroll_the_road() {
    let mut r = make_rig();
    for _ in 0..60 {
        let out = advance(&mut r, DT);
        assert_eq!(out.eye_jitter, Vec3::ZERO);
        assert!(!out.gliding);
    }
    assert_eq!(r.road.offset(), 0.0);
}

#[test]
fn warp_scrolls_road_and_shakes_camera() {
    let mut r = make_rig();
    r.state.toggle_warp();
    let mut saw_shake = false;
    let mut saw_scroll = false;
    for _ in 0..30 {
        let out = advance(&mut r, DT);
        if out.eye_jitter.length() > 0.0 {
            saw_shake = true;
        }
        assert!(out.eye_jitter.x.abs() <= WARP_SHAKE_AMPLITUDE * 0.5 + 1e-6);
        assert!(
            out.chroma_amount >= CHROMA_WARP_BASE - 1e-6
                && out.chroma_amount <= CHROMA_WARP_BASE + CHROMA_WARP_JITTER + 1e-6
        );
        if r.road.offset() > 0.0 {
            saw_scroll = true;
        }
    }
    assert!(saw_shake);
    assert!(saw_scroll);
}

#[test]
fn chroma_decays_after_warp_disengages() {
    let mut r = make_rig();
    r.state.toggle_warp();
    for _ in 0..10 {
        advance(&mut r, DT);
    }
    r.state.toggle_warp();
    r.road.reset();
    let mut last = f32::MAX;
    for _ in 0..120 {
        let out = advance(&mut r, DT);
        assert!(out.chroma_amount <= last + 1e-6);
        last = out.chroma_amount;
    }
    assert!(last < 1e-3, "chromatic shift should settle near zero: {last}");
}

#[test]
fn glide_drives_the_pose_then_returns_to_orbit() {
    let mut r = make_rig();
    let goal = r.state.select_view(CameraView::Front).unwrap();
    r.glide.begin(goal);

    let mut frames = 0;
    while r.glide.is_active() {
        let out = advance(&mut r, DT);
        assert!(out.gliding);
        frames += 1;
        assert!(frames < 10_000, "glide never arrived");
    }
    assert!(r.pose.eye.distance(goal) < CAMERA_ARRIVE_EPSILON);

    // After arrival the orbit rig owns the pose again without snapping.
    let before = r.pose.eye;
    let out = advance(&mut r, DT);
    assert!(!out.gliding);
    assert!(r.pose.eye.distance(before) < 0.5);
}

#[test]
fn auto_rotate_orbits_the_idle_camera() {
    let mut r = make_rig();
    let before = r.pose.eye;
    for _ in 0..240 {
        advance(&mut r, DT);
    }
    assert!(
        r.pose.eye.distance(before) > 0.2,
        "auto-rotate should move the eye"
    );
}
