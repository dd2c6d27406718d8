use glam::Vec3;
use rand::prelude::*;
use showcase_core::fit::{fit_to_length, Aabb};

#[test]
fn fitted_largest_dimension_equals_target() {
    // Property: for any positive input dimensions, the largest dimension of
    // the transformed box equals the target length.
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..200 {
        let min = Vec3::new(
            rng.gen_range(-50.0..50.0),
            rng.gen_range(-50.0..50.0),
            rng.gen_range(-50.0..50.0),
        );
        let size = Vec3::new(
            rng.gen_range(0.01..100.0),
            rng.gen_range(0.01..100.0),
            rng.gen_range(0.01..100.0),
        );
        let aabb = Aabb {
            min,
            max: min + size,
        };
        let target = rng.gen_range(0.5..20.0);
        let fit = fit_to_length(aabb, target, 0.0).expect("positive dims must fit");
        let out = aabb.transformed(fit.scale, fit.translation);
        let err = (out.largest_dimension() - target).abs();
        assert!(
            err < 1e-3,
            "largest dim {} != target {} for {aabb:?}",
            out.largest_dimension(),
            target
        );
    }
}

#[test]
fn fitted_box_is_centered_in_x_and_z() {
    let aabb = Aabb {
        min: Vec3::new(10.0, 3.0, -7.0),
        max: Vec3::new(14.0, 5.0, 1.0),
    };
    let fit = fit_to_length(aabb, 4.8, 0.0).unwrap();
    let out = aabb.transformed(fit.scale, fit.translation);
    let center = out.center();
    assert!(center.x.abs() < 1e-4);
    assert!(center.z.abs() < 1e-4);
}

#[test]
fn fit_forces_y_translation_to_rest() {
    // The model is dropped onto the ground reference, not vertically centered.
    let aabb = Aabb {
        min: Vec3::new(-1.0, 2.0, -1.0),
        max: Vec3::new(1.0, 6.0, 1.0),
    };
    let fit = fit_to_length(aabb, 4.0, 0.0).unwrap();
    assert_eq!(fit.translation.y, 0.0);

    let raised = fit_to_length(aabb, 4.0, 0.25).unwrap();
    assert_eq!(raised.translation.y, 0.25);
}

#[test]
fn degenerate_boxes_do_not_fit() {
    let flat = Aabb {
        min: Vec3::ZERO,
        max: Vec3::ZERO,
    };
    assert!(fit_to_length(flat, 4.8, 0.0).is_none());

    let nan = Aabb {
        min: Vec3::new(f32::NAN, 0.0, 0.0),
        max: Vec3::ONE,
    };
    assert!(fit_to_length(nan, 4.8, 0.0).is_none());

    let ok = Aabb {
        min: Vec3::ZERO,
        max: Vec3::ONE,
    };
    assert!(fit_to_length(ok, 0.0, 0.0).is_none());
    assert!(fit_to_length(ok, f32::INFINITY, 0.0).is_none());
}

#[test]
fn aabb_from_points_and_union() {
    let a = Aabb::from_points([Vec3::ZERO, Vec3::new(1.0, 2.0, 3.0)]).unwrap();
    assert_eq!(a.size(), Vec3::new(1.0, 2.0, 3.0));
    assert_eq!(a.largest_dimension(), 3.0);

    let b = Aabb::from_points([Vec3::new(-5.0, 0.0, 0.0)]).unwrap();
    let u = a.union(b);
    assert_eq!(u.min.x, -5.0);
    assert_eq!(u.max, Vec3::new(1.0, 2.0, 3.0));

    assert!(Aabb::from_points(std::iter::empty()).is_none());
}
