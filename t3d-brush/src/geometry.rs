use glam::Vec3;
use log::debug;
use t3d_math::{BoundingBox, Line, Plane, Side};

use crate::{Edge, Face};

/// Maximum distance between two lines for them to be considered crossing.
const CROSSING_DISTANCE: f32 = 0.0005;

/// Maximum distance between two points for them to be considered the same
/// point.
const POINT_EPSILON: f32 = 0.0001;

/// Points, faces and triangles of a convex polyhedron.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BrushGeometry {
    pub points: Vec<Vec3>,
    pub faces: Vec<Face>,
}

impl BrushGeometry {
    /// Builds the convex polyhedron bounded by given planes.
    ///
    /// Planes' normals must point outside the polyhedron; each plane comes
    /// with a unit tangent perpendicular to its normal. Planes that don't
    /// end up bounding the polyhedron produce no face, so faces don't have
    /// to map 1:1 onto planes (see [`Face::id`]).
    pub fn generate(planes: &[Plane], tangents: &[Vec3]) -> Self {
        debug_assert_eq!(planes.len(), tangents.len());

        debug_assert!(planes.iter().zip(tangents).all(|(plane, tangent)| {
            plane.normal().dot(*tangent).abs() < 0.0001
                && plane.normal().is_normalized()
                && tangent.is_normalized()
        }));

        let mut points = Vec::new();
        let mut faces = Vec::new();

        for (id, (plane, tangent)) in planes.iter().zip(tangents).enumerate() {
            // Lines along which this plane meets all the other ones
            let lines: Vec<_> = planes
                .iter()
                .enumerate()
                .filter(|(other_id, _)| *other_id != id)
                .filter_map(|(_, other)| plane.intersect_plane(other))
                .collect();

            if lines.is_empty() {
                continue;
            }

            let mut face_points = Vec::new();
            let mut edges = Vec::new();

            for (line_id, line) in lines.iter().enumerate() {
                let crossings: Vec<_> = lines
                    .iter()
                    .enumerate()
                    .filter(|(other_id, _)| *other_id != line_id)
                    .filter_map(|(_, other)| crossing(planes, line, other))
                    .collect();

                // Each edge of a convex polyhedron crosses exactly two other
                // edges of the same face
                let &[p0, p1] = crossings.as_slice() else {
                    continue;
                };

                let p0 = insert_point(&mut points, p0);
                let p1 = insert_point(&mut points, p1);

                edges.push(Edge {
                    p0: insert_index(&mut face_points, p0),
                    p1: insert_index(&mut face_points, p1),
                });
            }

            if face_points.len() < 3 {
                debug!(
                    "Plane {} doesn't bound the brush; points={}",
                    id,
                    face_points.len()
                );

                continue;
            }

            faces.push(Face::new(
                id,
                plane.normal(),
                *tangent,
                face_points,
                edges,
                &points,
            ));
        }

        Self { points, faces }
    }

    pub fn bounds(&self) -> BoundingBox {
        self.points.iter().copied().collect()
    }

    pub fn triangle_count(&self) -> usize {
        self.faces.iter().map(|face| face.triangles.len()).sum()
    }

    /// Returns the face generated from given plane, if any.
    pub fn face(&self, id: usize) -> Option<&Face> {
        self.faces.iter().find(|face| face.id == id)
    }
}

/// Returns the point at which both lines cross, provided it lies within the
/// polyhedron.
fn crossing(planes: &[Plane], a: &Line, b: &Line) -> Option<Vec3> {
    let segment = a.shortest_segment_to(b);

    if segment.len() >= CROSSING_DISTANCE {
        return None;
    }

    let point = segment.midpoint();

    planes
        .iter()
        .all(|plane| plane.which_side(point) != Side::Front)
        .then_some(point)
}

fn insert_point(points: &mut Vec<Vec3>, point: Vec3) -> u32 {
    if let Some(idx) = points
        .iter()
        .position(|other| other.abs_diff_eq(point, POINT_EPSILON))
    {
        return idx as u32;
    }

    points.push(point);
    (points.len() - 1) as u32
}

fn insert_index(indices: &mut Vec<u32>, index: u32) -> u32 {
    if let Some(idx) = indices.iter().position(|&other| other == index) {
        return idx as u32;
    }

    indices.push(index);
    (indices.len() - 1) as u32
}
