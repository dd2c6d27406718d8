use showcase_core::constants::*;
use showcase_core::motion::{ParticleField, RoadScroll};

#[test]
fn particles_spawn_inside_the_field_extent() {
    let field = ParticleField::new(500, PARTICLE_FIELD_EXTENT, 42);
    assert_eq!(field.len(), 500);
    let half = PARTICLE_FIELD_EXTENT * 0.5;
    for p in field.positions() {
        assert!(p.x.abs() <= half && p.y.abs() <= half && p.z.abs() <= half);
    }
}

#[test]
fn particles_stay_within_respawn_bounds_under_warp() {
    let mut field = ParticleField::new(300, PARTICLE_FIELD_EXTENT, 9);
    for _ in 0..1000 {
        field.step(WARP_SCROLL_PER_FRAME);
        for p in field.positions() {
            assert!(
                p.y >= PARTICLE_RESPAWN_FLOOR && p.y <= PARTICLE_RESPAWN_CEILING,
                "particle escaped: y = {}",
                p.y
            );
        }
    }
}

#[test]
fn particles_drift_upward_at_idle() {
    let mut field = ParticleField::new(10, PARTICLE_FIELD_EXTENT, 3);
    let before: Vec<f32> = field.positions().iter().map(|p| p.y).collect();
    field.step(IDLE_DRIFT_PER_FRAME);
    for (p, b) in field.positions().iter().zip(before) {
        assert!(p.y > b);
    }
}

#[test]
fn same_seed_reproduces_the_same_field() {
    let a = ParticleField::new(64, PARTICLE_FIELD_EXTENT, 1234);
    let b = ParticleField::new(64, PARTICLE_FIELD_EXTENT, 1234);
    assert_eq!(a.positions(), b.positions());
}

#[test]
fn road_scroll_wraps_at_loop_length() {
    let mut road = RoadScroll::new();
    for _ in 0..100 {
        road.advance(WARP_SCROLL_PER_FRAME);
        assert!(
            road.offset() >= 0.0 && road.offset() <= ROAD_LOOP_LENGTH,
            "offset escaped the loop: {}",
            road.offset()
        );
    }
}

#[test]
fn road_scroll_resets_on_warp_disengage() {
    let mut road = RoadScroll::new();
    road.advance(7.5);
    assert!(road.offset() > 0.0);
    road.reset();
    assert_eq!(road.offset(), 0.0);
}
