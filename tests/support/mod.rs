//! Test support library
//! Provides various helper functions & utilities for tests.
#![allow(dead_code)]

use eggdevice::{
    float_types::Real,
    mesh::{Mesh, polygon::Polygon},
    traits::CSG,
};

/// Returns the approximate bounding box `[min_x, min_y, min_z, max_x, max_y, max_z]`
/// for a set of polygons.
pub fn bounding_box<S: Clone>(polygons: &[Polygon<S>]) -> [Real; 6] {
    let mut bb = [
        Real::MAX,
        Real::MAX,
        Real::MAX,
        Real::MIN,
        Real::MIN,
        Real::MIN,
    ];
    for v in polygons.iter().flat_map(|poly| &poly.vertices) {
        let p = v.pos;
        bb[0] = bb[0].min(p.x);
        bb[1] = bb[1].min(p.y);
        bb[2] = bb[2].min(p.z);
        bb[3] = bb[3].max(p.x);
        bb[4] = bb[4].max(p.y);
        bb[5] = bb[5].max(p.z);
    }
    bb
}

/// Quick helper to compare floating-point results with an acceptable tolerance.
pub fn approx_eq(a: Real, b: Real, eps: Real) -> bool {
    (a - b).abs() < eps
}

/// Axis aligned cube of edge `size` centred on `center`
pub fn cube_at(size: Real, center: [Real; 3]) -> Mesh<()> {
    Mesh::cuboid(size, size, size, None).translate(center[0], center[1], center[2])
}

/// Path of a file under `demos/`
pub fn demo_path(name: &str) -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("demos")
        .join(name)
}
