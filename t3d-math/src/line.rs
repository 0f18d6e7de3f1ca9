use glam::Vec3;

/// Infinite line passing through `origin` along `direction`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Line {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Line {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Returns the shortest segment connecting this line and `other`; its
    /// `p0` lies on `self` and its `p1` lies on `other`.
    ///
    /// For parallel lines the segment starts at `self.origin`.
    pub fn shortest_segment_to(&self, other: &Self) -> LineSegment {
        let p13 = self.origin - other.origin;
        let d1343 = p13.dot(other.direction);
        let d4343 = other.direction.dot(other.direction);

        let d4321 = other.direction.dot(self.direction);
        let d1321 = p13.dot(self.direction);
        let d2121 = self.direction.dot(self.direction);

        let denom = d2121 * d4343 - d4321 * d4321;

        if denom.abs() <= f32::EPSILON * d2121 * d4343 {
            return LineSegment::new(
                self.origin,
                other.point_at(d1343 / d4343),
            );
        }

        let mua = (d1343 * d4321 - d1321 * d4343) / denom;
        let mub = (d1343 + d4321 * mua) / d4343;

        LineSegment::new(self.point_at(mua), other.point_at(mub))
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineSegment {
    pub p0: Vec3,
    pub p1: Vec3,
}

impl LineSegment {
    pub fn new(p0: Vec3, p1: Vec3) -> Self {
        Self { p0, p1 }
    }

    pub fn len(&self) -> f32 {
        self.p0.distance(self.p1)
    }

    pub fn midpoint(&self) -> Vec3 {
        (self.p0 + self.p1) * 0.5
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::vec3;

    use super::*;

    #[test]
    fn shortest_segment_of_crossing_lines() {
        let a = Line::new(vec3(-3.0, 0.0, 0.0), Vec3::X);
        let b = Line::new(vec3(1.0, 5.0, 0.0), Vec3::Y);

        let target = a.shortest_segment_to(&b);

        assert_relative_eq!(target.len(), 0.0, epsilon = 1e-6);
        assert_relative_eq!(target.p0.x, 1.0, epsilon = 1e-6);
        assert_relative_eq!(target.p0.y, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn shortest_segment_of_skew_lines() {
        let a = Line::new(Vec3::ZERO, Vec3::X);
        let b = Line::new(vec3(2.0, 7.0, 3.0), Vec3::Y);

        let target = a.shortest_segment_to(&b);

        assert_relative_eq!(target.len(), 3.0, epsilon = 1e-5);
        assert_relative_eq!(target.p0.x, 2.0, epsilon = 1e-5);
        assert_relative_eq!(target.p1.z, 3.0, epsilon = 1e-5);
    }

    #[test]
    fn shortest_segment_of_parallel_lines() {
        let a = Line::new(vec3(0.0, 0.0, 0.0), Vec3::Y);
        let b = Line::new(vec3(1.0, 4.0, 0.0), Vec3::Y);

        let target = a.shortest_segment_to(&b);

        assert_eq!(Vec3::ZERO, target.p0);
        assert_relative_eq!(target.len(), 1.0, epsilon = 1e-6);
    }
}
