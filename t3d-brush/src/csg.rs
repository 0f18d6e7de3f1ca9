use log::{debug, info};
use t3d_math::{Plane, Side};

use crate::{Brush, PlaneRelation, Polygon, Polyhedron};

/// Solid described by the polygons of its boundary.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CsgSolid {
    pub polygons: Vec<Polygon>,
}

impl CsgSolid {
    pub fn new(polygons: Vec<Polygon>) -> Self {
        Self { polygons }
    }

    pub fn from_polyhedron(polyhedron: &Polyhedron) -> Self {
        let polygons = polyhedron
            .planes
            .iter()
            .enumerate()
            .map(|(face, plane)| {
                Polygon::with_plane(polyhedron.face_points(face), *plane)
            })
            .collect();

        Self { polygons }
    }

    pub fn from_brush(brush: &Brush) -> Self {
        Self::from_polyhedron(&Polyhedron::from_geometry(brush.geometry()))
    }

    /// Turns the solid inside out.
    pub fn invert(&mut self) {
        for polygon in &mut self.polygons {
            polygon.flip();
        }
    }
}

/// Cuts brush in two along given plane, returning its back and front part.
///
/// Returns `None` if the plane doesn't pass through the brush.
pub fn split_brush(brush: &Brush, plane: Plane) -> Option<(Brush, Brush)> {
    info!(
        "Splitting brush; faces={}, plane={:?}",
        brush.faces().len(),
        plane
    );

    let polyhedron = Polyhedron::from_geometry(brush.geometry());

    let (front, back) =
        polyhedron
            .points
            .iter()
            .fold((0, 0), |(front, back), point| {
                match plane.which_side(*point) {
                    Side::Front => (front + 1, back),
                    Side::Back => (front, back + 1),
                    Side::On => (front, back),
                }
            });

    if front == 0 || back == 0 {
        debug!(
            "Plane doesn't intersect the brush; front={}, back={}",
            front, back
        );
        return None;
    }

    let mut back_planes = Vec::new();
    let mut front_planes = Vec::new();

    for (face, face_plane) in polyhedron.planes.iter().enumerate() {
        let polygon =
            Polygon::with_plane(polyhedron.face_points(face), *face_plane);

        match polygon.plane_side(&plane) {
            PlaneRelation::Back => {
                back_planes.push(*face_plane);
            }

            PlaneRelation::Front => {
                front_planes.push(*face_plane);
            }

            PlaneRelation::Intersect => {
                // Faces that only touch the plane with an edge or a vertex
                // stay whole on their side
                let Some((back, front)) = polygon.split(&plane) else {
                    match plane.which_side(polygon.center()) {
                        Side::Front => front_planes.push(*face_plane),
                        Side::Back => back_planes.push(*face_plane),
                        Side::On => {}
                    }

                    continue;
                };

                let normal = face_plane.normal();

                back_planes
                    .push(Plane::from_point_normal(back.center(), normal));

                front_planes
                    .push(Plane::from_point_normal(front.center(), normal));
            }

            // The cap gets re-added below anyway
            PlaneRelation::On => {}
        }
    }

    if back_planes.is_empty() || front_planes.is_empty() {
        debug!("Plane doesn't cut through any of the brush's faces");
        return None;
    }

    back_planes.push(plane);
    front_planes.push(plane.flipped());

    let back = Brush::from_planes(back_planes);
    let front = Brush::from_planes(front_planes);

    if back.is_empty() || front.is_empty() {
        debug!("Split yielded an empty brush");
        return None;
    }

    Some((back, front))
}
