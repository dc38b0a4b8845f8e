//! Oriented planes and the polygon splitting that drives the BSP evaluator.

use crate::float_types::{EPSILON, Real, tolerance};
use crate::mesh::polygon::Polygon;
use crate::mesh::vertex::Vertex;
use nalgebra::{Point3, Vector3};
use std::fmt::Debug;

// Classification bits; SPANNING == FRONT | BACK
pub const COPLANAR: i8 = 0;
pub const FRONT: i8 = 1;
pub const BACK: i8 = 2;
pub const SPANNING: i8 = 3;

/// A plane `n · p = w` with unit normal `n`.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    pub normal: Vector3<Real>,
    pub w: Real,
}

/// The four buckets produced by [`Plane::split_polygon`]:
/// `(coplanar_front, coplanar_back, front, back)`.
pub type SplitResult<S> = (Vec<Polygon<S>>, Vec<Polygon<S>>, Vec<Polygon<S>>, Vec<Polygon<S>>);

impl Plane {
    /// Create a plane from a (not necessarily unit) normal and its offset along that normal
    pub fn from_normal(normal: Vector3<Real>, w: Real) -> Self {
        let len = normal.norm();
        if len < EPSILON {
            return Plane { normal: Vector3::z(), w: 0.0 };
        }
        Plane { normal: normal / len, w: w / len }
    }

    /// Plane through three points, normal following the right-hand rule `(b-a) × (c-a)`
    pub fn from_points(a: &Point3<Real>, b: &Point3<Real>, c: &Point3<Real>) -> Self {
        let normal = (b - a).cross(&(c - a));
        if normal.norm_squared() < EPSILON * EPSILON {
            return Plane { normal: Vector3::z(), w: 0.0 };
        }
        let normal = normal.normalize();
        Plane { normal, w: normal.dot(&a.coords) }
    }

    /// Plane of an arbitrary planar loop. Uses Newell's method so that slivers produced by
    /// repeated splitting, or a collapsed first corner, still yield the loop's orientation.
    pub fn from_vertices(vertices: &[Vertex]) -> Self {
        let n = vertices.len();
        if n < 3 {
            return Plane { normal: Vector3::z(), w: 0.0 };
        }

        let mut normal = Vector3::zeros();
        let mut centroid = Vector3::zeros();
        for (i, curr) in vertices.iter().enumerate() {
            let next = &vertices[(i + 1) % n];
            normal.x += (curr.pos.y - next.pos.y) * (curr.pos.z + next.pos.z);
            normal.y += (curr.pos.z - next.pos.z) * (curr.pos.x + next.pos.x);
            normal.z += (curr.pos.x - next.pos.x) * (curr.pos.y + next.pos.y);
            centroid += curr.pos.coords;
        }

        if normal.norm_squared() < EPSILON * EPSILON {
            return Self::from_points(&vertices[0].pos, &vertices[1].pos, &vertices[2].pos);
        }

        let normal = normal.normalize();
        let centroid = centroid / n as Real;
        Plane { normal, w: normal.dot(&centroid) }
    }

    pub const fn normal(&self) -> Vector3<Real> {
        self.normal
    }

    /// Reverse the plane's orientation in place
    pub fn flip(&mut self) {
        self.normal = -self.normal;
        self.w = -self.w;
    }

    /// Signed distance of `point` from the plane (positive in front)
    pub fn signed_distance(&self, point: &Point3<Real>) -> Real {
        self.normal.dot(&point.coords) - self.w
    }

    /// Classify a point as FRONT, BACK or COPLANAR within the global tolerance
    pub fn orient_point(&self, point: &Point3<Real>) -> i8 {
        let t = self.signed_distance(point);
        let eps = tolerance();
        if t < -eps {
            BACK
        } else if t > eps {
            FRONT
        } else {
            COPLANAR
        }
    }

    /// Bitwise-or of the classification of every vertex of `polygon`
    pub fn classify_polygon<S: Clone>(&self, polygon: &Polygon<S>) -> i8 {
        polygon
            .vertices
            .iter()
            .fold(COPLANAR, |acc, v| acc | self.orient_point(&v.pos))
    }

    /// Split `polygon` by this plane.
    ///
    /// Coplanar polygons land in `coplanar_front` or `coplanar_back` depending on whether
    /// they face the same way as the plane. Spanning polygons are cut along the plane; the
    /// pieces keep the parent's plane and metadata.
    pub fn split_polygon<S: Clone + Send + Sync + Debug>(
        &self,
        polygon: &Polygon<S>,
    ) -> SplitResult<S> {
        let mut coplanar_front = Vec::new();
        let mut coplanar_back = Vec::new();
        let mut front = Vec::new();
        let mut back = Vec::new();

        let types: Vec<i8> = polygon
            .vertices
            .iter()
            .map(|v| self.orient_point(&v.pos))
            .collect();
        let polygon_type = types.iter().fold(COPLANAR, |acc, &t| acc | t);

        match polygon_type {
            COPLANAR => {
                if self.normal.dot(&polygon.plane.normal) > 0.0 {
                    coplanar_front.push(polygon.clone());
                } else {
                    coplanar_back.push(polygon.clone());
                }
            },
            FRONT => front.push(polygon.clone()),
            BACK => back.push(polygon.clone()),
            _ => {
                let n = polygon.vertices.len();
                let mut split_front = Vec::with_capacity(n + 1);
                let mut split_back = Vec::with_capacity(n + 1);

                for i in 0..n {
                    let j = (i + 1) % n;
                    let (type_i, type_j) = (types[i], types[j]);
                    let vertex_i = &polygon.vertices[i];
                    let vertex_j = &polygon.vertices[j];

                    if type_i != BACK {
                        split_front.push(vertex_i.clone());
                    }
                    if type_i != FRONT {
                        split_back.push(vertex_i.clone());
                    }

                    if (type_i | type_j) == SPANNING {
                        let denom = self.normal.dot(&(vertex_j.pos - vertex_i.pos));
                        if denom.abs() > EPSILON {
                            let t = (self.w - self.normal.dot(&vertex_i.pos.coords)) / denom;
                            let vertex_new = vertex_i.interpolate(vertex_j, t);
                            split_front.push(vertex_new.clone());
                            split_back.push(vertex_new);
                        }
                    }
                }

                if split_front.len() >= 3 {
                    front.push(Polygon::with_plane(
                        split_front,
                        polygon.plane.clone(),
                        polygon.metadata.clone(),
                    ));
                }
                if split_back.len() >= 3 {
                    back.push(Polygon::with_plane(
                        split_back,
                        polygon.plane.clone(),
                        polygon.metadata.clone(),
                    ));
                }
            },
        }

        (coplanar_front, coplanar_back, front, back)
    }
}
