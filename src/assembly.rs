//! Left-to-right fold of boolean steps over a base solid.
//!
//! Steps do not commute: subtracting two overlapping cutters and then adding a part back
//! gives a different solid than any other order. The step list is data so the order can
//! be inspected and tested.

use crate::float_types::parry3d::bounding_volume::Aabb;
use crate::material::Material;
use crate::mesh::{Mesh, MeshBuffers};
use crate::primitive::PlacedPrimitive;
use crate::traits::CSG;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BoolOp {
    /// Merge the operand's volume into the accumulator
    Union,
    /// Carve the operand's volume out of the accumulator
    Subtract,
}

impl BoolOp {
    pub fn apply(self, acc: &Mesh<Material>, operand: &Mesh<Material>) -> Mesh<Material> {
        match self {
            BoolOp::Union => acc.union(operand),
            BoolOp::Subtract => acc.difference(operand),
        }
    }
}

/// Right-hand side of a step: a placed primitive or an earlier assembly
#[derive(Clone, Debug)]
pub enum Operand {
    Primitive(PlacedPrimitive),
    Solid(AssembledSolid),
}

impl Operand {
    pub fn mesh(&self) -> &Mesh<Material> {
        match self {
            Operand::Primitive(p) => p.mesh(),
            Operand::Solid(s) => &s.mesh,
        }
    }
}

impl From<PlacedPrimitive> for Operand {
    fn from(p: PlacedPrimitive) -> Self {
        Operand::Primitive(p)
    }
}

impl From<AssembledSolid> for Operand {
    fn from(s: AssembledSolid) -> Self {
        Operand::Solid(s)
    }
}

#[derive(Clone, Debug)]
pub struct Operation {
    pub op: BoolOp,
    pub operand: Operand,
    /// Label for logs
    pub name: String,
}

impl Operation {
    pub fn new(op: BoolOp, name: impl Into<String>, operand: impl Into<Operand>) -> Self {
        Operation {
            op,
            operand: operand.into(),
            name: name.into(),
        }
    }

    pub fn union(name: impl Into<String>, operand: impl Into<Operand>) -> Self {
        Self::new(BoolOp::Union, name, operand)
    }

    pub fn subtract(name: impl Into<String>, operand: impl Into<Operand>) -> Self {
        Self::new(BoolOp::Subtract, name, operand)
    }
}

/// Output of [`assemble`]
#[derive(Clone, Debug)]
pub struct AssembledSolid {
    pub mesh: Mesh<Material>,
    /// Number of boolean steps folded in
    pub steps: usize,
}

impl AssembledSolid {
    pub fn vertex_count(&self) -> usize {
        self.mesh.vertex_count()
    }

    pub fn bounding_box(&self) -> Aabb {
        self.mesh.bounding_box()
    }

    /// Render buffers grouped by material
    pub fn to_buffers(&self) -> MeshBuffers<Material> {
        self.mesh.to_buffers()
    }

    /// Distinct materials present on the surface, in first-seen order
    pub fn materials(&self) -> Vec<Material> {
        let mut materials: Vec<Material> = Vec::new();
        for m in self.mesh.polygons.iter().filter_map(|p| p.metadata.as_ref()) {
            if !materials.contains(m) {
                materials.push(m.clone());
            }
        }
        materials
    }
}

/// Fold `operations` over `base` in order.
///
/// Inputs are assumed watertight; nothing is validated and a bad input shows up as a
/// bad surface rather than an error.
pub fn assemble(
    base: PlacedPrimitive,
    operations: impl IntoIterator<Item = Operation>,
) -> AssembledSolid {
    let mut acc = base.into_mesh();
    let mut steps = 0;

    for operation in operations {
        let before = acc.polygons.len();
        acc = operation.op.apply(&acc, operation.operand.mesh());
        steps += 1;
        tracing::debug!(
            step = steps,
            name = %operation.name,
            op = ?operation.op,
            polygons_before = before,
            polygons_after = acc.polygons.len(),
            "applied boolean step"
        );
    }

    AssembledSolid { mesh: acc, steps }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::{BLACK, WHITE};
    use crate::placement::Placement;
    use crate::primitive::PrimitiveSpec;
    use nalgebra::Point3;

    fn cube(size: f64, at: [f64; 3], color: u32) -> PlacedPrimitive {
        PrimitiveSpec::Box {
            width: size as _,
            height: size as _,
            depth: size as _,
        }
        .build(Material::basic(color))
        .place(&Placement::at(at[0] as _, at[1] as _, at[2] as _))
    }

    #[test]
    fn subtract_then_union() {
        let base = cube(2.0, [0.0, 0.0, 0.0], WHITE);
        let solid = assemble(
            base,
            [
                Operation::subtract("corner", cube(1.0, [1.0, 1.0, 1.0], BLACK)),
                Operation::union("knob", cube(1.0, [-0.2, -0.2, 1.25], BLACK)),
            ],
        );
        assert_eq!(solid.steps, 2);
        // an eighth of the cutter overlaps, three quarters of the knob stick out
        assert!((solid.mesh.volume() - (8.0 - 0.125 + 0.75)).abs() < 1e-6);
        assert!(!solid.mesh.contains_point(&Point3::new(0.9, 0.9, 0.9)));
        assert!(solid.mesh.contains_point(&Point3::new(-0.2, -0.2, 1.5)));
    }

    #[test]
    fn no_operations_returns_base() {
        let solid = assemble(cube(1.0, [0.0, 0.0, 0.0], WHITE), []);
        assert_eq!(solid.steps, 0);
        assert_eq!(solid.mesh.polygons.len(), 6);
    }

    #[test]
    fn cut_faces_keep_cutter_material() {
        let solid = assemble(
            cube(2.0, [0.0, 0.0, 0.0], WHITE),
            [Operation::subtract("notch", cube(1.0, [1.0, 0.0, 0.0], BLACK))],
        );
        assert_eq!(
            solid.materials(),
            vec![Material::basic(WHITE), Material::basic(BLACK)]
        );
    }

    #[test]
    fn assembled_solid_as_operand() {
        let tool = assemble(cube(1.0, [1.0, 1.0, 1.0], BLACK), []);
        let solid = assemble(
            cube(2.0, [0.0, 0.0, 0.0], WHITE),
            [Operation::subtract("tool", tool)],
        );
        assert!((solid.mesh.volume() - 7.875).abs() < 1e-6);
    }
}
