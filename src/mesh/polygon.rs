//! Convex planar polygons carrying per-face metadata.

use crate::float_types::Real;
use crate::float_types::parry3d::bounding_volume::Aabb;
use crate::mesh::plane::Plane;
use crate::mesh::vertex::Vertex;
use nalgebra::{Matrix4, Point3};
use std::sync::OnceLock;

/// A convex polygon. `metadata` is whatever the caller tagged the face with; the device
/// pipeline stores the primitive's material there so that each face of the assembled
/// solid remembers where it came from.
#[derive(Debug, Clone)]
pub struct Polygon<S: Clone> {
    pub vertices: Vec<Vertex>,
    pub plane: Plane,
    bounding_box: OnceLock<Aabb>,
    pub metadata: Option<S>,
}

impl<S: Clone + PartialEq> PartialEq for Polygon<S> {
    fn eq(&self, other: &Self) -> bool {
        self.vertices == other.vertices
            && self.plane == other.plane
            && self.metadata == other.metadata
    }
}

impl<S: Clone + Send + Sync> Polygon<S> {
    /// Create a polygon from vertices, computing its plane from their winding
    pub fn new(vertices: Vec<Vertex>, metadata: Option<S>) -> Self {
        let plane = Plane::from_vertices(&vertices);
        Self::with_plane(vertices, plane, metadata)
    }

    /// Create a polygon whose plane is already known (split fragments reuse the parent's)
    pub fn with_plane(vertices: Vec<Vertex>, plane: Plane, metadata: Option<S>) -> Self {
        Polygon {
            vertices,
            plane,
            bounding_box: OnceLock::new(),
            metadata,
        }
    }

    /// Axis aligned bounding box of this polygon, cached after the first call
    pub fn bounding_box(&self) -> Aabb {
        *self.bounding_box.get_or_init(|| {
            let mut mins = Point3::new(Real::MAX, Real::MAX, Real::MAX);
            let mut maxs = Point3::new(-Real::MAX, -Real::MAX, -Real::MAX);
            for v in &self.vertices {
                mins = mins.inf(&v.pos);
                maxs = maxs.sup(&v.pos);
            }
            Aabb::new(mins, maxs)
        })
    }

    /// Reverse winding order, flip vertex normals and the plane
    pub fn flip(&mut self) {
        self.vertices.reverse();
        for v in &mut self.vertices {
            v.flip();
        }
        self.plane.flip();
    }

    /// Fan triangulation. Polygons here are convex, either built that way or produced by
    /// cutting a convex polygon with a plane.
    pub fn triangulate(&self) -> Vec<[Vertex; 3]> {
        if self.vertices.len() < 3 {
            return Vec::new();
        }
        let anchor = &self.vertices[0];
        self.vertices[1..]
            .windows(2)
            .map(|pair| [anchor.clone(), pair[0].clone(), pair[1].clone()])
            .collect()
    }

    /// Map every vertex through `mat` and recompute the plane from the moved corners
    pub fn transform(&self, mat: &Matrix4<Real>, normal_mat: &Matrix4<Real>) -> Polygon<S> {
        let vertices: Vec<Vertex> = self
            .vertices
            .iter()
            .map(|v| v.transformed(mat, normal_mat))
            .collect();
        Polygon::new(vertices, self.metadata.clone())
    }

    /// Area from the cross products of the fan triangles
    pub fn area(&self) -> Real {
        self.triangulate()
            .iter()
            .map(|[a, b, c]| (b.pos - a.pos).cross(&(c.pos - a.pos)).norm() * 0.5)
            .sum()
    }
}
