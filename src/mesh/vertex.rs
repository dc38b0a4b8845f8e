//! Polygon corners: a position plus a shading normal.

use crate::float_types::Real;
use nalgebra::{Matrix4, Point3, Vector3};

/// A vertex of a polygon, holding position and normal.
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    pub pos: Point3<Real>,
    pub normal: Vector3<Real>,
}

impl Vertex {
    /// Create a new [`Vertex`]. The normal is stored as given; it only affects shading,
    /// never the boolean evaluator, which works from polygon planes.
    pub const fn new(pos: Point3<Real>, normal: Vector3<Real>) -> Self {
        Vertex { pos, normal }
    }

    /// Flip vertex normal
    pub fn flip(&mut self) {
        self.normal = -self.normal;
    }

    /// Linear interpolation between `self` (`t = 0`) and `other` (`t = 1`).
    pub fn interpolate(&self, other: &Vertex, t: Real) -> Vertex {
        let new_pos = self.pos + (other.pos - self.pos) * t;
        let new_normal = self.normal + (other.normal - self.normal) * t;
        Vertex::new(new_pos, new_normal)
    }

    /// Map this vertex through `mat`, using `normal_mat` (the inverse transpose of `mat`)
    /// for the normal so that non-uniform scales keep normals perpendicular to the surface.
    pub fn transformed(&self, mat: &Matrix4<Real>, normal_mat: &Matrix4<Real>) -> Vertex {
        let pos = mat.transform_point(&self.pos);
        let normal = normal_mat.transform_vector(&self.normal);
        let normal = if normal.norm_squared() > 0.0 {
            normal.normalize()
        } else {
            normal
        };
        Vertex::new(pos, normal)
    }
}
