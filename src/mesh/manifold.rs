use crate::float_types::Real;
use crate::mesh::Mesh;
use hashbrown::HashMap;
use nalgebra::Point3;
use std::fmt::Debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
struct QuantizedPoint(i64, i64, i64);

const QUANTIZATION_FACTOR: Real = 1e7;

fn quantize_point(p: &Point3<Real>) -> QuantizedPoint {
    QuantizedPoint(
        (p.x * QUANTIZATION_FACTOR).round() as i64,
        (p.y * QUANTIZATION_FACTOR).round() as i64,
        (p.z * QUANTIZATION_FACTOR).round() as i64,
    )
}

impl<S: Clone + Debug + Send + Sync> Mesh<S> {
    /// How many triangles use each undirected edge, keyed by quantized endpoints
    fn edge_counts(&self) -> HashMap<(QuantizedPoint, QuantizedPoint), u32> {
        let tri_mesh = self.triangulate();
        let mut edge_counts = HashMap::new();

        for poly in &tri_mesh.polygons {
            for &(i0, i1) in &[(0, 1), (1, 2), (2, 0)] {
                let p0 = quantize_point(&poly.vertices[i0].pos);
                let p1 = quantize_point(&poly.vertices[i1].pos);
                if p0 == p1 {
                    continue;
                }
                // Order them so (p0, p1) and (p1, p0) become the same key
                let key = if p0 < p1 { (p0, p1) } else { (p1, p0) };
                *edge_counts.entry(key).or_insert(0) += 1;
            }
        }
        edge_counts
    }

    /// Checks that every (quantized) edge is shared by exactly two triangles.
    ///
    /// BSP boolean results contain T-junctions where a face was split on one side of an
    /// edge only, so this holds for freshly built primitives but generally not for
    /// assembled solids.
    pub fn is_manifold(&self) -> bool {
        let edge_counts = self.edge_counts();
        !edge_counts.is_empty() && edge_counts.values().all(|&count| count == 2)
    }

    /// Number of edges not shared by exactly two triangles
    pub fn open_edge_count(&self) -> usize {
        self.edge_counts().values().filter(|&&count| count != 2).count()
    }
}
