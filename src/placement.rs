//! Local transforms applied to a primitive before it takes part in a boolean step.

use crate::float_types::Real;
use nalgebra::{Matrix4, Rotation3, Translation3, Vector3};
use serde::{Deserialize, Serialize};

/// Position, XYZ Euler rotation (radians) and per-axis scale.
///
/// The world matrix is `T · R · S` with `R = Rx · Ry · Rz`: a vertex is scaled first, then
/// rotated about Z, Y and X in that order, then moved to `position`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Placement {
    pub position: Vector3<Real>,
    pub rotation: Vector3<Real>,
    pub scale: Vector3<Real>,
}

impl Default for Placement {
    fn default() -> Self {
        Placement {
            position: Vector3::zeros(),
            rotation: Vector3::zeros(),
            scale: Vector3::repeat(1.0),
        }
    }
}

impl Placement {
    pub fn at(x: Real, y: Real, z: Real) -> Self {
        Placement {
            position: Vector3::new(x, y, z),
            ..Default::default()
        }
    }

    pub fn rotated(mut self, x: Real, y: Real, z: Real) -> Self {
        self.rotation = Vector3::new(x, y, z);
        self
    }

    pub fn scaled(mut self, x: Real, y: Real, z: Real) -> Self {
        self.scale = Vector3::new(x, y, z);
        self
    }

    pub fn uniform_scale(self, s: Real) -> Self {
        self.scaled(s, s, s)
    }

    pub fn rotation_matrix(&self) -> Rotation3<Real> {
        let rx = Rotation3::from_axis_angle(&Vector3::x_axis(), self.rotation.x);
        let ry = Rotation3::from_axis_angle(&Vector3::y_axis(), self.rotation.y);
        let rz = Rotation3::from_axis_angle(&Vector3::z_axis(), self.rotation.z);
        rx * ry * rz
    }

    /// Resolved local-to-world matrix
    pub fn matrix(&self) -> Matrix4<Real> {
        Translation3::from(self.position).to_homogeneous()
            * self.rotation_matrix().to_homogeneous()
            * Matrix4::new_nonuniform_scaling(&self.scale)
    }

    pub fn is_identity(&self) -> bool {
        *self == Placement::default()
    }
}
