use glam::Vec3;
use t3d_math::{Plane, Side};

/// How a polygon relates to a plane.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaneRelation {
    Front,
    Back,

    /// All of the polygon's points lie on the plane.
    On,

    /// The polygon has points on both sides of the plane (or some points on
    /// one side and the rest on the plane).
    Intersect,
}

/// Convex, planar polygon.
#[derive(Clone, Debug, PartialEq)]
pub struct Polygon {
    points: Vec<Vec3>,
    plane: Plane,
}

impl Polygon {
    /// Creates a polygon, deriving its plane from the first three points.
    pub fn new(points: Vec<Vec3>) -> Self {
        let plane = match points.as_slice() {
            [a, b, c, ..] => Plane::from_points(*a, *b, *c),
            _ => Plane::from_point_normal(Vec3::ZERO, Vec3::Z),
        };

        Self { points, plane }
    }

    pub fn with_plane(points: Vec<Vec3>, plane: Plane) -> Self {
        Self { points, plane }
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn plane(&self) -> Plane {
        self.plane
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn center(&self) -> Vec3 {
        if self.points.is_empty() {
            return Vec3::ZERO;
        }

        self.points.iter().copied().sum::<Vec3>() / self.points.len() as f32
    }

    /// Returns pairs of indices of this polygon's edges, wrapping around.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> {
        let len = self.points.len();

        (0..len).map(move |idx| (idx, (idx + 1) % len))
    }

    /// Checks whether all points lie on the polygon's plane.
    pub fn is_valid(&self) -> bool {
        self.points
            .iter()
            .all(|point| self.plane.which_side(*point) == Side::On)
    }

    pub fn plane_side(&self, plane: &Plane) -> PlaneRelation {
        let (mut front, mut back, mut on) = (0, 0, 0);

        for point in &self.points {
            match plane.which_side(*point) {
                Side::Front => front += 1,
                Side::Back => back += 1,
                Side::On => on += 1,
            }
        }

        let len = self.points.len();

        if back == len {
            PlaneRelation::Back
        } else if front == len {
            PlaneRelation::Front
        } else if on == len {
            PlaneRelation::On
        } else {
            PlaneRelation::Intersect
        }
    }

    /// Splits this polygon into its back and front parts.
    ///
    /// Points lying on the plane go into both parts; returns `None` if the
    /// polygon doesn't intersect the plane.
    pub fn split(&self, plane: &Plane) -> Option<(Polygon, Polygon)> {
        if self.plane_side(plane) != PlaneRelation::Intersect {
            return None;
        }

        let mut back = Vec::new();
        let mut front = Vec::new();

        for (a, b) in self.edges() {
            let (pa, pb) = (self.points[a], self.points[b]);
            let (sa, sb) = (plane.which_side(pa), plane.which_side(pb));

            if sa != Side::Front {
                back.push(pa);
            }

            if sa != Side::Back {
                front.push(pa);
            }

            let crosses = matches!(
                (sa, sb),
                (Side::Front, Side::Back) | (Side::Back, Side::Front)
            );

            if crosses {
                if let Some(t) = plane.intersect_segment(pa, pb) {
                    let point = pa + (pb - pa) * t;

                    back.push(point);
                    front.push(point);
                }
            }
        }

        if back.len() < 3 || front.len() < 3 {
            return None;
        }

        Some((
            Self::with_plane(back, self.plane),
            Self::with_plane(front, self.plane),
        ))
    }

    /// Reverses this polygon's winding and turns its plane around.
    pub fn flip(&mut self) {
        self.points.reverse();
        self.plane = self.plane.flipped();
    }
}
