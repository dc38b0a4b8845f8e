//! `Mesh` struct and implementations of the `CSG` trait for `Mesh`

use crate::float_types::{
    EPSILON, Real,
    parry3d::{
        bounding_volume::{Aabb, BoundingVolume},
        query::{Ray, RayCast},
        shape::Triangle,
    },
};
use crate::mesh::{bsp::Node, polygon::Polygon, vertex::Vertex};
use crate::traits::CSG;
use nalgebra::{Matrix4, Point3, Vector3};
use std::{fmt::Debug, ops::Range, sync::OnceLock};

pub mod bsp;
pub mod plane;
pub mod polygon;
pub mod shapes;
pub mod vertex;

#[cfg(feature = "hashmap")]
pub mod manifold;

#[derive(Clone, Debug)]
pub struct Mesh<S: Clone + Send + Sync + Debug> {
    /// 3D polygons for volumetric shapes
    pub polygons: Vec<Polygon<S>>,

    /// Lazily calculated AABB that spans `polygons`.
    pub bounding_box: OnceLock<Aabb>,

    /// Metadata
    pub metadata: Option<S>,
}

/// A contiguous run of triangles sharing the same face metadata.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawGroup<S> {
    pub indices: Range<u32>,
    pub metadata: Option<S>,
}

/// Flat triangle-list buffers in the layout a renderer uploads to the GPU.
#[derive(Clone, Debug, Default)]
pub struct MeshBuffers<S> {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
    pub groups: Vec<DrawGroup<S>>,
}

impl<S> MeshBuffers<S> {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Size in bytes of the position, normal and index buffers together
    pub fn byte_len(&self) -> usize {
        self.positions.len() * std::mem::size_of::<[f32; 3]>()
            + self.normals.len() * std::mem::size_of::<[f32; 3]>()
            + self.indices.len() * std::mem::size_of::<u32>()
    }
}

impl<S: Clone + Send + Sync + Debug> Mesh<S> {
    /// Build a Mesh from an existing polygon list
    pub fn from_polygons(polygons: &[Polygon<S>], metadata: Option<S>) -> Self {
        let mut mesh = <Mesh<S> as CSG>::new();
        mesh.polygons = polygons.to_vec();
        mesh.metadata = metadata;
        mesh
    }

    /// Split polygons into those whose box overlaps `other_bb` and those that cannot touch it.
    fn partition_polys(
        polys: &[Polygon<S>],
        other_bb: &Aabb,
    ) -> (Vec<Polygon<S>>, Vec<Polygon<S>>) {
        let mut maybe = Vec::new();
        let mut never = Vec::new();
        for p in polys {
            if p.bounding_box().intersects(other_bb) {
                maybe.push(p.clone());
            } else {
                never.push(p.clone());
            }
        }
        (maybe, never)
    }

    /// Helper to collect all vertices from the mesh.
    pub fn vertices(&self) -> Vec<Vertex> {
        self.polygons
            .iter()
            .flat_map(|p| p.vertices.clone())
            .collect()
    }

    /// Number of polygon corners across all faces
    pub fn vertex_count(&self) -> usize {
        self.polygons.iter().map(|p| p.vertices.len()).sum()
    }

    /// Number of triangles the mesh renders as
    pub fn triangle_count(&self) -> usize {
        self.polygons
            .iter()
            .map(|p| p.vertices.len().saturating_sub(2))
            .sum()
    }

    /// Triangulate each polygon in the Mesh returning a Mesh containing triangles
    pub fn triangulate(&self) -> Mesh<S> {
        let triangles = self
            .polygons
            .iter()
            .flat_map(|poly| {
                poly.triangulate().into_iter().map(move |triangle| {
                    Polygon::with_plane(
                        triangle.to_vec(),
                        poly.plane.clone(),
                        poly.metadata.clone(),
                    )
                })
            })
            .collect::<Vec<_>>();

        Mesh::from_polygons(&triangles, self.metadata.clone())
    }

    /// Enclosed volume via the divergence theorem: sum of signed tetrahedra spanned by the
    /// origin and every triangle. Only meaningful for closed, consistently wound meshes.
    pub fn volume(&self) -> Real {
        self.polygons
            .iter()
            .flat_map(|p| p.triangulate())
            .map(|[a, b, c]| a.pos.coords.dot(&b.pos.coords.cross(&c.pos.coords)))
            .sum::<Real>()
            / 6.0
    }

    /// Total area of all faces
    pub fn surface_area(&self) -> Real {
        self.polygons.iter().map(|p| p.area()).sum()
    }

    /// Casts a ray defined by `origin` + t * `direction` against all triangles
    /// of this mesh and returns a list of (intersection_point, distance),
    /// sorted by ascending distance.
    pub fn ray_intersections(
        &self,
        origin: &Point3<Real>,
        direction: &Vector3<Real>,
    ) -> Vec<(Point3<Real>, Real)> {
        let ray = Ray::new(*origin, *direction);

        let mut hits: Vec<(Point3<Real>, Real)> = self
            .polygons
            .iter()
            .flat_map(|poly| poly.triangulate())
            .filter_map(|[a, b, c]| {
                let triangle = Triangle::new(a.pos, b.pos, c.pos);
                triangle
                    .cast_local_ray(&ray, Real::MAX, true)
                    .map(|toi| (ray.point_at(toi), toi))
            })
            .collect();

        hits.sort_by(|a, b| a.1.total_cmp(&b.1));
        // a ray through a shared edge reports the same hit twice
        hits.dedup_by(|a, b| (a.1 - b.1).abs() < EPSILON);

        hits
    }

    /// Point-in-solid test by counting ray crossings. Only meaningful for closed meshes.
    pub fn contains_point(&self, point: &Point3<Real>) -> bool {
        // skewed so the ray is unlikely to graze edges of axis aligned geometry
        let direction = Vector3::new(0.5377, 0.8312, 0.1419);
        self.ray_intersections(point, &direction).len() % 2 == 1
    }

    /// Flatten into indexed GPU-style buffers, one [`DrawGroup`] per run of faces with the
    /// same metadata.
    pub fn to_buffers(&self) -> MeshBuffers<S>
    where
        S: PartialEq,
    {
        let mut buffers = MeshBuffers {
            positions: Vec::with_capacity(self.vertex_count()),
            normals: Vec::with_capacity(self.vertex_count()),
            indices: Vec::with_capacity(self.triangle_count() * 3),
            groups: Vec::new(),
        };

        for poly in &self.polygons {
            let base = buffers.positions.len() as u32;
            for v in &poly.vertices {
                buffers
                    .positions
                    .push([v.pos.x as f32, v.pos.y as f32, v.pos.z as f32]);
                buffers
                    .normals
                    .push([v.normal.x as f32, v.normal.y as f32, v.normal.z as f32]);
            }

            let start = buffers.indices.len() as u32;
            for i in 1..poly.vertices.len().saturating_sub(1) as u32 {
                buffers.indices.extend([base, base + i, base + i + 1]);
            }
            let end = buffers.indices.len() as u32;
            if start == end {
                continue;
            }

            match buffers.groups.last_mut() {
                Some(group) if group.metadata == poly.metadata && group.indices.end == start => {
                    group.indices.end = end;
                },
                _ => buffers.groups.push(DrawGroup {
                    indices: start..end,
                    metadata: poly.metadata.clone(),
                }),
            }
        }

        buffers
    }
}

impl<S: Clone + Send + Sync + Debug> CSG for Mesh<S> {
    /// Returns a new empty Mesh
    fn new() -> Self {
        Mesh {
            polygons: Vec::new(),
            bounding_box: OnceLock::new(),
            metadata: None,
        }
    }

    /// Return a new Mesh representing union of the two Meshes.
    ///
    /// ```text
    /// let c = a.union(b);
    ///     +-------+            +-------+
    ///     |       |            |       |
    ///     |   a   |            |   c   |
    ///     |    +--+----+   =   |       +----+
    ///     +----+--+    |       +----+       |
    ///          |   b   |            |   c   |
    ///          |       |            |       |
    ///          +-------+            +-------+
    /// ```
    fn union(&self, other: &Mesh<S>) -> Mesh<S> {
        if self.polygons.is_empty() || other.polygons.is_empty() {
            let mut polygons = self.polygons.clone();
            polygons.extend_from_slice(&other.polygons);
            return Mesh::from_polygons(&polygons, self.metadata.clone());
        }

        // faces away from the other operand's box are kept as they are
        let (a_clip, a_passthru) = Self::partition_polys(&self.polygons, &other.bounding_box());
        let (b_clip, b_passthru) = Self::partition_polys(&other.polygons, &self.bounding_box());

        let mut a = Node::from_polygons(&a_clip);
        let mut b = Node::from_polygons(&b_clip);

        a.clip_to(&b);
        b.clip_to(&a);
        b.invert();
        b.clip_to(&a);
        b.invert();
        a.build(&b.all_polygons());

        let mut polygons = a.all_polygons();
        polygons.extend(a_passthru);
        polygons.extend(b_passthru);
        Mesh::from_polygons(&polygons, self.metadata.clone())
    }

    /// Return a new Mesh representing difference of the two Meshes.
    ///
    /// ```text
    /// let c = a.difference(b);
    ///     +-------+            +-------+
    ///     |       |            |       |
    ///     |   a   |            |   c   |
    ///     |    +--+----+   =   |    +--+
    ///     +----+--+    |       +----+
    ///          |   b   |
    ///          |       |
    ///          +-------+
    /// ```
    fn difference(&self, other: &Mesh<S>) -> Mesh<S> {
        if self.polygons.is_empty() || other.polygons.is_empty() {
            return Mesh::from_polygons(&self.polygons, self.metadata.clone());
        }

        let (a_clip, a_passthru) = Self::partition_polys(&self.polygons, &other.bounding_box());
        let (b_clip, _) = Self::partition_polys(&other.polygons, &self.bounding_box());

        let mut a = Node::from_polygons(&a_clip);
        let mut b = Node::from_polygons(&b_clip);

        a.invert();
        a.clip_to(&b);
        b.clip_to(&a);
        b.invert();
        b.clip_to(&a);
        b.invert();
        a.build(&b.all_polygons());
        a.invert();

        let mut polygons = a.all_polygons();
        polygons.extend(a_passthru);
        Mesh::from_polygons(&polygons, self.metadata.clone())
    }

    /// Return a new Mesh representing intersection of the two Meshes.
    ///
    /// ```text
    /// let c = a.intersection(b);
    ///     +-------+
    ///     |       |
    ///     |   a   |
    ///     |    +--+----+   =   +--+
    ///     +----+--+    |       +--+
    ///          |   b   |
    ///          |       |
    ///          +-------+
    /// ```
    fn intersection(&self, other: &Mesh<S>) -> Mesh<S> {
        if self.polygons.is_empty() || other.polygons.is_empty() {
            return Mesh::from_polygons(&[], self.metadata.clone());
        }

        // nothing outside the other operand's box can survive
        let (a_clip, _) = Self::partition_polys(&self.polygons, &other.bounding_box());
        let (b_clip, _) = Self::partition_polys(&other.polygons, &self.bounding_box());

        let mut a = Node::from_polygons(&a_clip);
        let mut b = Node::from_polygons(&b_clip);

        a.invert();
        b.clip_to(&a);
        b.invert();
        a.clip_to(&b);
        b.clip_to(&a);
        a.build(&b.all_polygons());
        a.invert();

        Mesh::from_polygons(&a.all_polygons(), self.metadata.clone())
    }

    /// Space in exactly one of the two meshes
    fn xor(&self, other: &Mesh<S>) -> Mesh<S> {
        let a_sub_b = self.difference(other);
        let b_sub_a = other.difference(self);
        a_sub_b.union(&b_sub_a)
    }

    /// Apply an arbitrary 3D transform (as a 4x4 matrix) to the mesh.
    ///
    /// A singular matrix (for example a zero scale) is accepted: positions collapse as
    /// asked and normals are carried through unchanged.
    fn transform(&self, mat: &Matrix4<Real>) -> Mesh<S> {
        let normal_mat = match mat.try_inverse() {
            Some(inv) => inv.transpose(),
            None => {
                tracing::warn!("singular transform, normals left untransformed");
                Matrix4::identity()
            },
        };

        // a mirroring transform reverses winding, so restore counter-clockwise order
        let mirrored = mat.fixed_view::<3, 3>(0, 0).determinant() < 0.0;

        let polygons: Vec<Polygon<S>> = self
            .polygons
            .iter()
            .map(|poly| {
                let mut poly = poly.transform(mat, &normal_mat);
                if mirrored {
                    poly.vertices.reverse();
                    poly.plane.flip();
                }
                poly
            })
            .collect();

        Mesh::from_polygons(&polygons, self.metadata.clone())
    }

    /// Returns a [`parry3d::bounding_volume::Aabb`] indicating the 3D bounds of all `polygons`.
    fn bounding_box(&self) -> Aabb {
        *self.bounding_box.get_or_init(|| {
            if self.polygons.is_empty() {
                return Aabb::new(Point3::origin(), Point3::origin());
            }
            self.polygons
                .iter()
                .map(|p| p.bounding_box())
                .reduce(|acc, bb| acc.merged(&bb))
                .unwrap_or_else(|| Aabb::new(Point3::origin(), Point3::origin()))
        })
    }

    /// Invalidates object's cached bounding box.
    fn invalidate_bounding_box(&mut self) {
        self.bounding_box = OnceLock::new();
    }

    /// Invert this Mesh (flip inside vs. outside)
    fn inverse(&self) -> Mesh<S> {
        let mut mesh = self.clone();
        for p in &mut mesh.polygons {
            p.flip();
        }
        mesh.invalidate_bounding_box();
        mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_mesh_has_trivial_box() {
        let mesh: Mesh<()> = Mesh::new();
        let bb = mesh.bounding_box();
        assert_eq!(bb.mins, Point3::origin());
        assert_eq!(bb.maxs, Point3::origin());
        assert_eq!(mesh.volume(), 0.0);
    }

    #[test]
    fn buffers_group_by_metadata() {
        let a: Mesh<u8> = Mesh::cuboid(1.0, 1.0, 1.0, Some(1));
        let b: Mesh<u8> = Mesh::cuboid(1.0, 1.0, 1.0, Some(2)).translate(5.0, 0.0, 0.0);
        let both = a.union(&b);
        let buffers = both.to_buffers();
        assert_eq!(buffers.groups.len(), 2);
        assert_eq!(buffers.indices.len(), 2 * 12 * 3);
        assert_eq!(buffers.groups[0].metadata, Some(1));
        assert_eq!(buffers.groups[1].metadata, Some(2));
        assert_eq!(buffers.vertex_count(), 48);
    }
}
