mod support;

use eggdevice::float_types::Real;
use eggdevice::profile::{Profile, ProfileResolution};

use crate::support::approx_eq;

fn knob_grid() -> Vec<(Real, Real)> {
    let mut grid = Vec::new();
    for girth in [0.001, 0.25, 0.8, 1.3, 2.0] {
        for apex in [0.0, 0.15, 0.6, 1.0, 2.0] {
            grid.push((girth, apex));
        }
    }
    grid
}

#[test]
fn point_count_is_independent_of_knobs() {
    for resolution in [ProfileResolution::STANDARD, ProfileResolution::HIGH_DETAIL] {
        let expected = resolution.sample_count();
        for (girth, apex) in knob_grid() {
            assert_eq!(Profile::egg(girth, apex, resolution).len(), expected);
        }
    }
}

#[test]
fn endpoints_sit_on_the_axis() {
    for (girth, apex) in knob_grid() {
        let profile = Profile::egg(girth, apex, ProfileResolution::STANDARD);
        let first = profile.points[0];
        let last = profile.points[profile.len() - 1];
        assert_eq!(first.x, 0.0);
        assert_eq!(last.x, 0.0);
        assert_eq!(first.y, -1.0);
        assert_eq!(last.y, 1.0);
    }
}

#[test]
fn silhouette_is_not_mirror_symmetric() {
    let profile = Profile::egg(0.8, 0.15, ProfileResolution::STANDARD);
    // 30° and 150°: same sin, opposite cos
    let low = profile.at_degrees(30.0).unwrap();
    let high = profile.at_degrees(150.0).unwrap();
    assert!(low.x > high.x);
    assert!(approx_eq(low.y, -high.y, 1e-12));
}

#[test]
fn end_to_end_reference_values() {
    let profile = Profile::egg(0.8, 0.15, ProfileResolution::STANDARD);
    assert_eq!(profile.len(), 31);

    let equator = profile.at_degrees(90.0).unwrap();
    assert!(approx_eq(equator.x, 0.8, 1e-12));
    assert!(approx_eq(equator.y, 0.0, 1e-12));

    for (deg, point) in (0..=180).step_by(6).zip(&profile.points) {
        let rad = (deg as Real).to_radians();
        let x = (0.15 * rad.cos() + 0.8) * rad.sin();
        assert!(approx_eq(point.x, x, 1e-12), "x at {deg}°");
        assert!(approx_eq(point.y, -rad.cos(), 1e-12), "y at {deg}°");
    }
}

#[test]
fn degenerate_knobs_still_produce_points() {
    let profile = Profile::egg(0.0, 0.0, ProfileResolution::STANDARD);
    assert_eq!(profile.len(), 31);
    assert!(profile.points.iter().all(|p| p.x == 0.0));
    assert_eq!(profile.max_radius(), 0.0);
}

#[test]
fn high_detail_is_denser() {
    let coarse = Profile::egg(0.8, 0.15, ProfileResolution::STANDARD);
    let fine = Profile::egg(0.8, 0.15, ProfileResolution::HIGH_DETAIL);
    assert_eq!(fine.len(), 91);
    // every coarse sample is also a fine sample
    for deg in (0..=180).step_by(6) {
        let a = coarse.at_degrees(deg as Real).unwrap();
        let b = fine.at_degrees(deg as Real).unwrap();
        assert!((a - b).norm() < 1e-12);
    }
}
