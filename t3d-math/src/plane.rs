use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::{BoundingBox, Line, PLANE_EPSILON};

/// Which side of a plane something lies on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Front,
    Back,
    On,
}

/// Plane described as `dot(normal, p) + d = 0`; its front side is the one
/// `normal` points to.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Plane {
    normal: Vec3,
    d: f32,
}

impl Plane {
    pub fn new(normal: Vec3, d: f32) -> Self {
        Self { normal, d }
    }

    pub fn from_point_normal(point: Vec3, normal: Vec3) -> Self {
        Self {
            normal,
            d: -normal.dot(point),
        }
    }

    /// Creates a plane passing through three points; the normal follows the
    /// right-hand rule on `(b - a) x (c - a)`.
    pub fn from_points(a: Vec3, b: Vec3, c: Vec3) -> Self {
        Self::from_point_normal(a, (b - a).cross(c - a).normalize_or_zero())
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    pub fn d(&self) -> f32 {
        self.d
    }

    /// Returns the point of this plane closest to the origin.
    pub fn position(&self) -> Vec3 {
        -self.normal * self.d
    }

    pub fn distance(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.d
    }

    pub fn which_side(&self, point: Vec3) -> Side {
        let distance = self.distance(point);

        if distance >= PLANE_EPSILON {
            Side::Front
        } else if distance <= -PLANE_EPSILON {
            Side::Back
        } else {
            Side::On
        }
    }

    /// Classifies a box against this plane; a box touching or straddling
    /// the plane is `On`.
    pub fn which_side_box(&self, bb: &BoundingBox) -> Side {
        let radius = bb.half_extent().dot(self.normal.abs());
        let distance = self.distance(bb.center());

        if distance > radius {
            Side::Front
        } else if distance < -radius {
            Side::Back
        } else {
            Side::On
        }
    }

    pub fn flipped(&self) -> Self {
        Self {
            normal: -self.normal,
            d: -self.d,
        }
    }

    pub fn is_parallel_to(&self, other: &Self) -> bool {
        self.normal.cross(other.normal).length_squared() < 0.00001
    }

    /// Returns the parameter `t` at which segment `start..end` crosses this
    /// plane (`start + (end - start) * t`), or `None` if the segment is
    /// parallel to the plane.
    ///
    /// Note that `t` is not clamped into `0.0..=1.0`.
    pub fn intersect_segment(&self, start: Vec3, end: Vec3) -> Option<f32> {
        let den = self.normal.dot(end - start);

        if den == 0.0 {
            None
        } else {
            Some(-self.distance(start) / den)
        }
    }

    /// Returns the line along which this plane meets `other`, or `None` if
    /// both planes are parallel (either coincident or separated).
    pub fn intersect_plane(&self, other: &Self) -> Option<Line> {
        let direction = self.normal.cross(other.normal);
        let denom = direction.length_squared();

        if denom < 0.00001 {
            return None;
        }

        let origin = (self.normal * other.d - other.normal * self.d)
            .cross(direction)
            / denom;

        Some(Line::new(origin, direction))
    }

    /// Clips segment `start..end` to the back side of this plane.
    ///
    /// Returns `None` if the segment lies entirely in front of the plane.
    pub fn clip_segment(&self, start: Vec3, end: Vec3) -> Option<(Vec3, Vec3)> {
        let start_distance = self.distance(start);
        let end_distance = self.distance(end);

        match (start_distance > 0.0, end_distance > 0.0) {
            (true, true) => None,
            (false, false) => Some((start, end)),

            (true, false) => {
                let t = start_distance / (start_distance - end_distance);

                Some((start + (end - start) * t, end))
            }

            (false, true) => {
                let t = start_distance / (start_distance - end_distance);

                Some((start, start + (end - start) * t))
            }
        }
    }
}
