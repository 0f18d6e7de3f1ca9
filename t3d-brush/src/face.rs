use glam::{Mat3, Vec2, Vec3};
use t3d_math::Plane;

use crate::{sort_winding_order, winding_area2};

/// Edge between two face-local points.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Edge {
    pub p0: u32,
    pub p1: u32,
}

/// Triangle made of three face-local points.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FaceTriangle {
    pub p0: u32,
    pub p1: u32,
    pub p2: u32,
}

impl FaceTriangle {
    pub fn indices(&self) -> [u32; 3] {
        [self.p0, self.p1, self.p2]
    }
}

/// Single face of a brush.
///
/// Faces refer to the brush's points indirectly: `points` maps face-local
/// indices (used by `edges`, `winding`, `triangles` and `texcoords`) into
/// [`crate::BrushGeometry::points`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Face {
    /// Index of the plane this face has been generated from.
    pub id: usize,
    pub points: Vec<u32>,
    pub edges: Vec<Edge>,

    /// Face-local points ordered clockwise, when looking at the face from
    /// the outside.
    pub winding: Vec<u32>,

    pub triangles: Vec<FaceTriangle>,
    pub texcoords: Vec<Vec2>,
    pub normal: Vec3,
    pub tangent: Vec3,
    pub centroid: Vec3,

    /// Face's area; zero or negative area means the face is degenerate.
    pub area: f32,
}

impl Face {
    pub(crate) fn new(
        id: usize,
        normal: Vec3,
        tangent: Vec3,
        points: Vec<u32>,
        edges: Vec<Edge>,
        positions: &[Vec3],
    ) -> Self {
        let local: Vec<_> =
            points.iter().map(|&idx| positions[idx as usize]).collect();

        let average = local.iter().copied().sum::<Vec3>() / local.len() as f32;
        let binormal = normal.cross(tangent);

        // Transform points into the face's space, so that they can be worked
        // on as 2D points
        let quad = Mat3::from_cols(tangent, binormal, normal).transpose();

        let local: Vec<_> = local
            .iter()
            .map(|point| quad.mul_vec3(*point - average).truncate())
            .collect();

        let winding = sort_winding_order(&local, true);

        let wound: Vec<_> =
            winding.iter().map(|&idx| local[idx as usize]).collect();

        let mut area = winding_area2(&wound);

        if area > 0.0 {
            area /= 2.0;
        }

        let centroid = {
            let signed_area = -winding_area2(&wound) / 2.0;

            let centroid = if signed_area.abs() > f32::EPSILON {
                wound
                    .iter()
                    .zip(wound.iter().cycle().skip(1))
                    .map(|(p0, p1)| (*p0 + *p1) * p0.perp_dot(*p1))
                    .sum::<Vec2>()
                    / (6.0 * signed_area)
            } else {
                Vec2::ZERO
            };

            average + tangent * centroid.x + binormal * centroid.y
        };

        let triangles = (0..winding.len().saturating_sub(2))
            .map(|idx| FaceTriangle {
                p0: winding[0],
                p1: winding[idx + 1],
                p2: winding[idx + 2],
            })
            .collect();

        // Planar projection along the tangent and binormal, anchored half a
        // unit away from the centroid
        let plane_x =
            Plane::from_point_normal(centroid - 0.5 * tangent, tangent);

        let plane_y =
            Plane::from_point_normal(centroid - 0.5 * binormal, binormal);

        let texcoords = points
            .iter()
            .map(|&idx| {
                let point = positions[idx as usize];

                -Vec2::new(plane_x.distance(point), plane_y.distance(point))
            })
            .collect();

        Self {
            id,
            points,
            edges,
            winding,
            triangles,
            texcoords,
            normal,
            tangent,
            centroid,
            area,
        }
    }

    pub fn binormal(&self) -> Vec3 {
        self.normal.cross(self.tangent)
    }

    pub fn plane(&self) -> Plane {
        Plane::from_point_normal(self.centroid, self.normal)
    }

    pub fn is_degenerate(&self) -> bool {
        self.area <= 0.0
    }

    /// Returns positions of this face's points, in winding order.
    pub fn wound_points<'a>(
        &'a self,
        positions: &'a [Vec3],
    ) -> impl Iterator<Item = Vec3> + 'a {
        self.winding
            .iter()
            .map(|&idx| positions[self.points[idx as usize] as usize])
    }

    /// Returns positions of this face's triangles.
    pub fn triangle_points<'a>(
        &'a self,
        positions: &'a [Vec3],
    ) -> impl Iterator<Item = [Vec3; 3]> + 'a {
        self.triangles.iter().map(|triangle| {
            triangle
                .indices()
                .map(|idx| positions[self.points[idx as usize] as usize])
        })
    }
}
