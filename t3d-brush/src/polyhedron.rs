use fxhash::FxHashMap;
use glam::Vec3;
use t3d_math::{Plane, Side, Vec3Ext};

use crate::{sort_planar_points, BrushGeometry};

/// Edge of a polyhedron, together with the two faces it separates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PolyhedronEdge {
    /// Indices into [`Polyhedron::planes`]; for edges that belong to a single
    /// face only (i.e. when the polyhedron is not closed), both entries are
    /// the same.
    pub faces: [usize; 2],

    /// Indices into [`Polyhedron::points`].
    pub vertices: [u32; 2],
}

impl PolyhedronEdge {
    pub fn touches(&self, face: usize) -> bool {
        self.faces.contains(&face)
    }
}

/// Convex polyhedron described by its points, planes and edges.
///
/// Planes face outwards.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Polyhedron {
    pub points: Vec<Vec3>,
    pub planes: Vec<Plane>,
    pub edges: Vec<PolyhedronEdge>,
}

impl Polyhedron {
    pub fn from_geometry(geometry: &BrushGeometry) -> Self {
        let planes = geometry.faces.iter().map(|face| face.plane()).collect();
        let mut edges: Vec<PolyhedronEdge> = Vec::new();
        let mut edge_ids: FxHashMap<(u32, u32), usize> = FxHashMap::default();

        for (face_id, face) in geometry.faces.iter().enumerate() {
            for edge in &face.edges {
                let v0 = face.points[edge.p0 as usize];
                let v1 = face.points[edge.p1 as usize];

                let key = (v0.min(v1), v0.max(v1));

                if let Some(&edge_id) = edge_ids.get(&key) {
                    edges[edge_id].faces[1] = face_id;
                } else {
                    edge_ids.insert(key, edges.len());

                    edges.push(PolyhedronEdge {
                        faces: [face_id, face_id],
                        vertices: [v0, v1],
                    });
                }
            }
        }

        Self {
            points: geometry.points.clone(),
            planes,
            edges,
        }
    }

    /// Returns points of given face, ordered clockwise when looking at the
    /// face from the outside.
    pub fn face_points(&self, face: usize) -> Vec<Vec3> {
        let mut vertices: Vec<u32> = Vec::new();

        for edge in self.edges.iter().filter(|edge| edge.touches(face)) {
            for vertex in edge.vertices {
                if !vertices.contains(&vertex) {
                    vertices.push(vertex);
                }
            }
        }

        let mut points: Vec<_> = vertices
            .into_iter()
            .map(|vertex| self.points[vertex as usize])
            .collect();

        let normal = self.planes[face].normal();

        sort_planar_points(&mut points, normal, normal.tangent());

        points
    }

    /// Checks whether all given points lie inside (or on the boundary of)
    /// this polyhedron.
    pub fn is_contained(&self, points: &[Vec3]) -> bool {
        points.iter().all(|point| {
            self.planes
                .iter()
                .all(|plane| plane.which_side(*point) != Side::Front)
        })
    }

    /// Returns the average of this polyhedron's points.
    pub fn center(&self) -> Vec3 {
        if self.points.is_empty() {
            return Vec3::ZERO;
        }

        self.points.iter().copied().sum::<Vec3>() / self.points.len() as f32
    }
}
