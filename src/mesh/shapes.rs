//! 3D primitives as `Mesh`es.
//!
//! Conventions follow the usual scene-graph primitives: revolved and cylindrical shapes
//! use +Y as their axis and put angle φ at `(sin φ, 0, cos φ)`; everything is centred on
//! the origin except lathes, which sit wherever their profile puts them.

use crate::errors::ValidationError;
use crate::float_types::{EPSILON, PI, Real, TAU};
use crate::mesh::Mesh;
use crate::mesh::plane::Plane;
use crate::mesh::polygon::Polygon;
use crate::mesh::vertex::Vertex;
use nalgebra::{Point2, Point3, Vector3};
use std::fmt::Debug;

/// Vertex normals for revolved surfaces
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Shading {
    /// Normal from the profile tangent (central difference), for curved outlines
    Smooth,
    /// Face normal, for outlines with hard corners
    Flat,
}

impl<S: Clone + Debug + Send + Sync> Mesh<S> {
    /// Revolve a 2D profile `(radius, height)` a full turn around the +Y axis.
    ///
    /// Ring `i` of `segments` puts profile point `(x, y)` at `(x·sin φ, y, x·cos φ)` with
    /// `φ = 2π·i/segments`. Profile points on the axis collapse to a single pole vertex, so
    /// a profile that starts and ends on the axis gives a closed solid. Faces point outward
    /// when the profile runs from bottom to top.
    pub fn lathe(profile: &[Point2<Real>], segments: usize, metadata: Option<S>) -> Mesh<S> {
        Self::revolve_profile(profile, segments, Shading::Smooth, metadata)
    }

    fn revolve_profile(
        profile: &[Point2<Real>],
        segments: usize,
        shading: Shading,
        metadata: Option<S>,
    ) -> Mesh<S> {
        let segments = segments.max(3);
        if profile.len() < 2 {
            return Mesh::from_polygons(&[], metadata);
        }

        let on_axis = |p: &Point2<Real>| p.x.abs() < EPSILON;

        // 2D outward normals of the profile, (t.y, -t.x) for tangent t
        let profile_normals: Vec<Vector3<Real>> = (0..profile.len())
            .map(|j| {
                let prev = profile[j.saturating_sub(1)];
                let next = profile[(j + 1).min(profile.len() - 1)];
                let t = next - prev;
                Vector3::new(t.y, -t.x, 0.0)
            })
            .collect();

        let ring_point = |p: &Point2<Real>, n: &Vector3<Real>, phi: Real| {
            let (sin, cos) = phi.sin_cos();
            let normal = Vector3::new(n.x * sin, n.y, n.x * cos);
            let normal = if normal.norm_squared() > EPSILON * EPSILON {
                normal.normalize()
            } else {
                normal
            };
            Vertex::new(Point3::new(p.x * sin, p.y, p.x * cos), normal)
        };

        let mut polygons = Vec::with_capacity((profile.len() - 1) * segments);
        for j in 0..profile.len() - 1 {
            let (p0, p1) = (profile[j], profile[j + 1]);
            if (p1 - p0).norm_squared() < EPSILON * EPSILON {
                continue;
            }
            if on_axis(&p0) && on_axis(&p1) {
                continue;
            }
            let (n0, n1) = (profile_normals[j], profile_normals[j + 1]);

            for i in 0..segments {
                let phi0 = TAU * i as Real / segments as Real;
                let phi1 = TAU * ((i + 1) % segments) as Real / segments as Real;

                let a = ring_point(&p0, &n0, phi0);
                let b = ring_point(&p0, &n0, phi1);
                let c = ring_point(&p1, &n1, phi1);
                let d = ring_point(&p1, &n1, phi0);

                let vertices = if on_axis(&p0) {
                    vec![a, c, d]
                } else if on_axis(&p1) {
                    vec![a, b, c]
                } else {
                    vec![a, b, c, d]
                };

                let mut polygon = Polygon::new(vertices, metadata.clone());
                if shading == Shading::Flat {
                    let normal = polygon.plane.normal();
                    for v in &mut polygon.vertices {
                        v.normal = normal;
                    }
                }
                polygons.push(polygon);
            }
        }

        Mesh::from_polygons(&polygons, metadata)
    }

    /// Tapered cylinder along +Y centred at the origin: `radius_bottom` at `-height/2`,
    /// `radius_top` at `+height/2`. With `radial_segments = 4` the cross-section is a
    /// diamond with corners on the X and Z axes.
    pub fn frustum(
        radius_top: Real,
        radius_bottom: Real,
        height: Real,
        radial_segments: usize,
        metadata: Option<S>,
    ) -> Mesh<S> {
        let half = height * 0.5;
        let profile = [
            Point2::new(0.0, -half),
            Point2::new(radius_bottom, -half),
            Point2::new(radius_top, half),
            Point2::new(0.0, half),
        ];
        Self::revolve_profile(&profile, radial_segments, Shading::Flat, metadata)
    }

    /// Straight cylinder along +Y centred at the origin
    pub fn cylinder(radius: Real, height: Real, segments: usize, metadata: Option<S>) -> Mesh<S> {
        Self::frustum(radius, radius, height, segments, metadata)
    }

    /// UV sphere centred at the origin: `width_segments` around Y, `height_segments` from
    /// pole to pole.
    pub fn sphere(
        radius: Real,
        width_segments: usize,
        height_segments: usize,
        metadata: Option<S>,
    ) -> Mesh<S> {
        let height_segments = height_segments.max(2);
        let profile: Vec<Point2<Real>> = (0..=height_segments)
            .map(|j| {
                let theta = PI * j as Real / height_segments as Real;
                if j == height_segments {
                    Point2::new(0.0, radius)
                } else {
                    Point2::new(radius * theta.sin(), -radius * theta.cos())
                }
            })
            .collect();

        let mut sphere = Self::revolve_profile(&profile, width_segments, Shading::Smooth, metadata);
        for poly in &mut sphere.polygons {
            for v in &mut poly.vertices {
                if v.pos.coords.norm_squared() > EPSILON * EPSILON {
                    v.normal = v.pos.coords.normalize();
                }
            }
        }
        sphere
    }

    /// Torus in the XY plane (its axis is Z), centred at the origin.
    ///
    /// * `radius` – distance from the centre to the middle of the tube
    /// * `tube` – tube radius
    /// * `radial_segments` – segments around the tube cross-section
    /// * `tubular_segments` – segments around the ring
    pub fn torus(
        radius: Real,
        tube: Real,
        radial_segments: usize,
        tubular_segments: usize,
        metadata: Option<S>,
    ) -> Mesh<S> {
        let radial_segments = radial_segments.max(3);
        let tubular_segments = tubular_segments.max(3);

        let point = |i: usize, j: usize| {
            let u = TAU * i as Real / tubular_segments as Real;
            let v = TAU * j as Real / radial_segments as Real;
            let (sin_u, cos_u) = u.sin_cos();
            let (sin_v, cos_v) = v.sin_cos();
            let ring = radius + tube * cos_v;
            let pos = Point3::new(ring * cos_u, ring * sin_u, tube * sin_v);
            let centre = Point3::new(radius * cos_u, radius * sin_u, 0.0);
            let normal = pos - centre;
            let normal = if normal.norm_squared() > EPSILON * EPSILON {
                normal.normalize()
            } else {
                Vector3::z()
            };
            Vertex::new(pos, normal)
        };

        let mut polygons = Vec::with_capacity(radial_segments * tubular_segments);
        for j in 0..radial_segments {
            for i in 0..tubular_segments {
                let (i1, j1) = ((i + 1) % tubular_segments, (j + 1) % radial_segments);
                let vertices = vec![point(i, j), point(i1, j), point(i1, j1), point(i, j1)];
                polygons.push(Polygon::new(vertices, metadata.clone()));
            }
        }

        Mesh::from_polygons(&polygons, metadata)
    }

    /// Axis aligned box centred at the origin
    pub fn cuboid(width: Real, height: Real, depth: Real, metadata: Option<S>) -> Mesh<S> {
        let (hx, hy, hz) = (width * 0.5, height * 0.5, depth * 0.5);
        let corner = |x: Real, y: Real, z: Real| Point3::new(x * hx, y * hy, z * hz);

        // (corners CCW seen from outside, outward normal)
        let faces: [([Point3<Real>; 4], Vector3<Real>); 6] = [
            (
                [
                    corner(1.0, -1.0, -1.0),
                    corner(1.0, 1.0, -1.0),
                    corner(1.0, 1.0, 1.0),
                    corner(1.0, -1.0, 1.0),
                ],
                Vector3::x(),
            ),
            (
                [
                    corner(-1.0, -1.0, -1.0),
                    corner(-1.0, -1.0, 1.0),
                    corner(-1.0, 1.0, 1.0),
                    corner(-1.0, 1.0, -1.0),
                ],
                -Vector3::x(),
            ),
            (
                [
                    corner(-1.0, 1.0, -1.0),
                    corner(-1.0, 1.0, 1.0),
                    corner(1.0, 1.0, 1.0),
                    corner(1.0, 1.0, -1.0),
                ],
                Vector3::y(),
            ),
            (
                [
                    corner(-1.0, -1.0, -1.0),
                    corner(1.0, -1.0, -1.0),
                    corner(1.0, -1.0, 1.0),
                    corner(-1.0, -1.0, 1.0),
                ],
                -Vector3::y(),
            ),
            (
                [
                    corner(-1.0, -1.0, 1.0),
                    corner(1.0, -1.0, 1.0),
                    corner(1.0, 1.0, 1.0),
                    corner(-1.0, 1.0, 1.0),
                ],
                Vector3::z(),
            ),
            (
                [
                    corner(-1.0, -1.0, -1.0),
                    corner(-1.0, 1.0, -1.0),
                    corner(1.0, 1.0, -1.0),
                    corner(1.0, -1.0, -1.0),
                ],
                -Vector3::z(),
            ),
        ];

        let polygons: Vec<Polygon<S>> = faces
            .iter()
            .map(|(corners, normal)| {
                let vertices = corners.iter().map(|&p| Vertex::new(p, *normal)).collect();
                Polygon::with_plane(
                    vertices,
                    Plane::from_normal(*normal, normal.dot(&corners[0].coords)),
                    metadata.clone(),
                )
            })
            .collect();

        Mesh::from_polygons(&polygons, metadata)
    }

    /// Creates a Mesh polyhedron from raw vertex data and face indices.
    ///
    /// Faces list their corners counter-clockwise as seen from outside.
    pub fn polyhedron(
        points: &[[Real; 3]],
        faces: &[&[usize]],
        metadata: Option<S>,
    ) -> Result<Mesh<S>, ValidationError> {
        let mut polygons = Vec::with_capacity(faces.len());

        for face in faces {
            if let Some(&index) = face.iter().find(|&&idx| idx >= points.len()) {
                return Err(ValidationError::IndexOutOfRange {
                    index,
                    len: points.len(),
                });
            }
            if face.len() < 3 {
                let [x, y, z] = face.first().map(|&i| points[i]).unwrap_or([0.0; 3]);
                return Err(ValidationError::TooFewPoints(Point3::new(x, y, z)));
            }

            let mut vertices = Vec::with_capacity(face.len());
            for &idx in face.iter() {
                let [x, y, z] = points[idx];
                let pos = Point3::new(x, y, z);
                if !(x.is_finite() && y.is_finite() && z.is_finite()) {
                    return Err(ValidationError::InvalidCoordinate(pos));
                }
                vertices.push(Vertex::new(pos, Vector3::zeros()));
            }

            let mut poly = Polygon::new(vertices, metadata.clone());
            let normal = poly.plane.normal();
            for v in &mut poly.vertices {
                v.normal = normal;
            }
            polygons.push(poly);
        }

        Ok(Mesh::from_polygons(&polygons, metadata))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::CSG;

    #[test]
    fn cuboid_volume_and_box() {
        let cube: Mesh<()> = Mesh::cuboid(2.0, 4.0, 6.0, None);
        assert_eq!(cube.polygons.len(), 6);
        assert!((cube.volume() - 48.0).abs() < 1e-9);
        let bb = cube.bounding_box();
        assert_eq!(bb.mins, Point3::new(-1.0, -2.0, -3.0));
        assert_eq!(bb.maxs, Point3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn cuboid_faces_point_outward() {
        let cube: Mesh<()> = Mesh::cuboid(1.0, 1.0, 1.0, None);
        for poly in &cube.polygons {
            let winding = Plane::from_vertices(&poly.vertices);
            assert!((winding.normal - poly.plane.normal).norm() < 1e-12);
            let centroid = poly.vertices.iter().map(|v| v.pos.coords).sum::<Vector3<Real>>() / 4.0;
            assert!(centroid.dot(&poly.plane.normal) > 0.0);
        }
    }

    #[test]
    fn four_sided_frustum_is_a_diamond() {
        let frustum: Mesh<()> = Mesh::frustum(1.0, 0.5, 0.5, 4, None);
        let bb = frustum.bounding_box();
        assert!((bb.maxs.x - 1.0).abs() < 1e-9);
        assert!((bb.maxs.z - 1.0).abs() < 1e-9);
        assert!((bb.mins.y + 0.25).abs() < 1e-9);
        assert!((bb.maxs.y - 0.25).abs() < 1e-9);
        // bottom cap, sides, top cap
        assert_eq!(frustum.polygons.len(), 12);
        // square frustum: h/3 * (A1 + A2 + sqrt(A1*A2)), diamond area = 2r²
        let (a1, a2): (Real, Real) = (2.0 * 0.25, 2.0 * 1.0);
        let expected = 0.5 / 3.0 * (a1 + a2 + (a1 * a2).sqrt());
        assert!((frustum.volume() - expected).abs() < 1e-9);
    }

    #[test]
    fn sphere_poles_and_volume() {
        let sphere: Mesh<()> = Mesh::sphere(1.0, 32, 16, None);
        assert_eq!(sphere.polygons.len(), 32 * 16);
        let bb = sphere.bounding_box();
        assert!((bb.mins.y + 1.0).abs() < 1e-12);
        assert!((bb.maxs.y - 1.0).abs() < 1e-12);
        let exact = 4.0 / 3.0 * PI;
        assert!(sphere.volume() < exact);
        assert!(sphere.volume() > exact * 0.95);
    }

    #[test]
    fn torus_lies_in_xy_plane() {
        let torus: Mesh<()> = Mesh::torus(1.0, 0.25, 12, 48, None);
        let bb = torus.bounding_box();
        assert!((bb.maxs.x - 1.25).abs() < 1e-9);
        assert!((bb.maxs.z - 0.25).abs() < 1e-9);
        assert!(torus.volume() > 0.0);
        // 2π²Rr²
        let exact = 2.0 * PI * PI * 1.0 * 0.25 * 0.25;
        assert!((torus.volume() - exact).abs() / exact < 0.1);
    }

    #[test]
    fn lathe_open_profile_is_not_closed() {
        let profile = [Point2::new(1.0, 0.0), Point2::new(1.0, 1.0)];
        let tube: Mesh<()> = Mesh::lathe(&profile, 8, None);
        assert_eq!(tube.polygons.len(), 8);
        #[cfg(feature = "hashmap")]
        assert!(!tube.is_manifold());
    }

    #[test]
    fn polyhedron_rejects_bad_index() {
        let pts = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
        let faces: [&[usize]; 1] = [&[0, 1, 3]];
        let err = Mesh::<()>::polyhedron(&pts, &faces, None).unwrap_err();
        assert_eq!(err, ValidationError::IndexOutOfRange { index: 3, len: 3 });
    }

    #[test]
    fn polyhedron_tetrahedron() {
        let pts = [
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
        ];
        let faces: [&[usize]; 4] = [&[0, 2, 1], &[0, 1, 3], &[0, 3, 2], &[1, 2, 3]];
        let tet = Mesh::<()>::polyhedron(&pts, &faces, None).unwrap();
        assert!((tet.volume() - 1.0 / 6.0).abs() < 1e-12);
    }
}
