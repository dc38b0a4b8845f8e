//! Named solids built from numeric parameters.
//!
//! A [`PrimitiveSpec`] is plain data (it round-trips through JSON); [`PrimitiveSpec::build`]
//! tessellates it into a [`Primitive`], and [`Primitive::place`] bakes a [`Placement`] into
//! world space. Only a [`PlacedPrimitive`] can be handed to the assembler.

use crate::float_types::Real;
use crate::material::Material;
use crate::mesh::Mesh;
use crate::placement::Placement;
use crate::profile::{Profile, ProfilePoint, ProfileResolution};
use crate::traits::CSG;
use nalgebra::Matrix4;
use serde::{Deserialize, Serialize};

const fn default_lathe_segments() -> usize {
    32
}
const fn default_radial_segments() -> usize {
    32
}
const fn default_width_segments() -> usize {
    32
}
const fn default_height_segments() -> usize {
    16
}
const fn default_torus_radial() -> usize {
    12
}
const fn default_torus_tubular() -> usize {
    48
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum PrimitiveSpec {
    /// Egg silhouette revolved about +Y
    Egg {
        girth: Real,
        apex: Real,
        #[serde(default)]
        resolution: ProfileResolution,
        #[serde(default = "default_lathe_segments")]
        segments: usize,
    },
    /// Arbitrary `(radius, height)` outline revolved about +Y
    Lathe {
        points: Vec<ProfilePoint>,
        #[serde(default = "default_lathe_segments")]
        segments: usize,
    },
    /// Cone frustum along +Y, `radius_top` at the top
    TaperedCylinder {
        radius_top: Real,
        radius_bottom: Real,
        height: Real,
        #[serde(default = "default_radial_segments")]
        radial_segments: usize,
    },
    Sphere {
        radius: Real,
        #[serde(default = "default_width_segments")]
        width_segments: usize,
        #[serde(default = "default_height_segments")]
        height_segments: usize,
    },
    /// Ring in the XY plane
    Torus {
        radius: Real,
        tube: Real,
        #[serde(default = "default_torus_radial")]
        radial_segments: usize,
        #[serde(default = "default_torus_tubular")]
        tubular_segments: usize,
    },
    Box {
        width: Real,
        height: Real,
        depth: Real,
    },
}

impl PrimitiveSpec {
    pub fn sphere(radius: Real) -> Self {
        PrimitiveSpec::Sphere {
            radius,
            width_segments: default_width_segments(),
            height_segments: default_height_segments(),
        }
    }

    pub fn tapered_cylinder(
        radius_top: Real,
        radius_bottom: Real,
        height: Real,
        radial_segments: usize,
    ) -> Self {
        PrimitiveSpec::TaperedCylinder {
            radius_top,
            radius_bottom,
            height,
            radial_segments,
        }
    }

    pub fn torus(radius: Real, tube: Real) -> Self {
        PrimitiveSpec::Torus {
            radius,
            tube,
            radial_segments: default_torus_radial(),
            tubular_segments: default_torus_tubular(),
        }
    }

    /// Short name used in logs
    pub const fn kind(&self) -> &'static str {
        match self {
            PrimitiveSpec::Egg { .. } => "egg",
            PrimitiveSpec::Lathe { .. } => "lathe",
            PrimitiveSpec::TaperedCylinder { .. } => "tapered-cylinder",
            PrimitiveSpec::Sphere { .. } => "sphere",
            PrimitiveSpec::Torus { .. } => "torus",
            PrimitiveSpec::Box { .. } => "box",
        }
    }

    /// Tessellate in local space. Every face is tagged with `material`.
    pub fn build(&self, material: Material) -> Primitive {
        let tag = Some(material.clone());
        let mesh = match self {
            PrimitiveSpec::Egg {
                girth,
                apex,
                resolution,
                segments,
            } => {
                let profile = Profile::egg(*girth, *apex, *resolution);
                Mesh::lathe(&profile.points, *segments, tag)
            },
            PrimitiveSpec::Lathe { points, segments } => Mesh::lathe(points, *segments, tag),
            PrimitiveSpec::TaperedCylinder {
                radius_top,
                radius_bottom,
                height,
                radial_segments,
            } => Mesh::frustum(*radius_top, *radius_bottom, *height, *radial_segments, tag),
            PrimitiveSpec::Sphere {
                radius,
                width_segments,
                height_segments,
            } => Mesh::sphere(*radius, *width_segments, *height_segments, tag),
            PrimitiveSpec::Torus {
                radius,
                tube,
                radial_segments,
                tubular_segments,
            } => Mesh::torus(*radius, *tube, *radial_segments, *tubular_segments, tag),
            PrimitiveSpec::Box {
                width,
                height,
                depth,
            } => Mesh::cuboid(*width, *height, *depth, tag),
        };

        tracing::trace!(
            kind = self.kind(),
            polygons = mesh.polygons.len(),
            "built primitive"
        );

        Primitive { mesh, material }
    }
}

/// A tessellated solid in its own local frame
#[derive(Clone, Debug)]
pub struct Primitive {
    pub mesh: Mesh<Material>,
    pub material: Material,
}

impl Primitive {
    /// Resolve `placement` into world space.
    pub fn place(&self, placement: &Placement) -> PlacedPrimitive {
        let matrix = placement.matrix();
        let mesh = if placement.is_identity() {
            self.mesh.clone()
        } else {
            self.mesh.transform(&matrix)
        };
        PlacedPrimitive {
            mesh,
            material: self.material.clone(),
            matrix,
        }
    }
}

/// A primitive whose world matrix has been applied to every vertex.
///
/// There is no way to build one from local-space geometry other than
/// [`Primitive::place`].
#[derive(Clone, Debug)]
pub struct PlacedPrimitive {
    mesh: Mesh<Material>,
    material: Material,
    matrix: Matrix4<Real>,
}

impl PlacedPrimitive {
    pub const fn mesh(&self) -> &Mesh<Material> {
        &self.mesh
    }

    pub const fn material(&self) -> &Material {
        &self.material
    }

    /// The world matrix that was baked in
    pub const fn matrix(&self) -> &Matrix4<Real> {
        &self.matrix
    }

    pub fn into_mesh(self) -> Mesh<Material> {
        self.mesh
    }
}
