use std::ops::{Add, AddAssign};

use glam::{vec3, Vec3};

use crate::BoundingSphere;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    min: Vec3,
    max: Vec3,
}

impl BoundingBox {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn min(&self) -> Vec3 {
        self.min
    }

    pub fn max(&self) -> Vec3 {
        self.max
    }

    pub fn extent(&self) -> Vec3 {
        self.max() - self.min()
    }

    pub fn half_extent(&self) -> Vec3 {
        self.extent() * 0.5
    }

    pub fn center(&self) -> Vec3 {
        (self.min() + self.max()) * 0.5
    }

    pub fn is_set(&self) -> bool {
        self.min.x != Self::default().min.x
    }

    /// Returns whether `point` lies inside this box, boundary included.
    pub fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    pub fn overlaps(&self, other: &Self) -> bool {
        self.min.cmple(other.max).all() && self.max.cmpge(other.min).all()
    }

    pub fn intersection(&self, other: &Self) -> Option<Self> {
        if self.overlaps(other) {
            Some(Self::new(self.min.max(other.min), self.max.min(other.max)))
        } else {
            None
        }
    }

    pub fn corners(&self) -> [Vec3; 8] {
        let mut corners = [Vec3::ZERO; 8];

        for (i, corner) in corners.iter_mut().enumerate() {
            *corner = vec3(
                if i & 1 > 0 { self.max.x } else { self.min.x },
                if i & 2 > 0 { self.max.y } else { self.min.y },
                if i & 4 > 0 { self.max.z } else { self.min.z },
            );
        }

        corners
    }

    /// Returns the twelve edges of this box as pairs of corners.
    pub fn edges(&self) -> [(Vec3, Vec3); 12] {
        let c = self.corners();

        [
            // along x
            (c[0], c[1]),
            (c[2], c[3]),
            (c[4], c[5]),
            (c[6], c[7]),
            // along y
            (c[0], c[2]),
            (c[1], c[3]),
            (c[4], c[6]),
            (c[5], c[7]),
            // along z
            (c[0], c[4]),
            (c[1], c[5]),
            (c[2], c[6]),
            (c[3], c[7]),
        ]
    }

    /// Tests segment `start..end` against this box.
    ///
    /// Returns the parameter `t` (`0.0 ..= 1.0`) at which the segment enters
    /// the box; a segment starting inside the box yields `Some(0.0)`.
    pub fn collide_line(&self, start: Vec3, end: Vec3) -> Option<f32> {
        if self.contains(start) {
            return Some(0.0);
        }

        let dir = end - start;
        let mut t_min = 0.0f32;
        let mut t_max = 1.0f32;

        for axis in 0..3 {
            let (origin, dir, min, max) =
                (start[axis], dir[axis], self.min[axis], self.max[axis]);

            if dir == 0.0 {
                if origin < min || origin > max {
                    return None;
                }

                continue;
            }

            let mut t0 = (min - origin) / dir;
            let mut t1 = (max - origin) / dir;

            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }

            t_min = t_min.max(t0);
            t_max = t_max.min(t1);

            if t_min > t_max {
                return None;
            }
        }

        Some(t_min)
    }

    pub fn bounding_sphere(&self) -> BoundingSphere {
        BoundingSphere::new(self.center(), self.half_extent().length())
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::new(Vec3::MAX, Vec3::MIN)
    }
}

impl Add<Vec3> for BoundingBox {
    type Output = Self;

    fn add(mut self, rhs: Vec3) -> Self::Output {
        self += rhs;
        self
    }
}

impl AddAssign<Vec3> for BoundingBox {
    fn add_assign(&mut self, rhs: Vec3) {
        self.min = self.min.min(rhs);
        self.max = self.max.max(rhs);
    }
}

impl FromIterator<Vec3> for BoundingBox {
    fn from_iter<T>(iter: T) -> Self
    where
        T: IntoIterator<Item = Vec3>,
    {
        let mut this = Self::default();

        for item in iter {
            this += item;
        }

        this
    }
}

impl AddAssign<Self> for BoundingBox {
    fn add_assign(&mut self, rhs: Self) {
        *self += rhs.min;
        *self += rhs.max;
    }
}
