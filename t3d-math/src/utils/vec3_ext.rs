use glam::Vec3;

/// The six axis-aligned unit directions, ordered `+x, -x, +y, -y, +z, -z`.
pub const AXIS_DIRECTIONS: [Vec3; 6] = [
    Vec3::X,
    Vec3::NEG_X,
    Vec3::Y,
    Vec3::NEG_Y,
    Vec3::Z,
    Vec3::NEG_Z,
];

pub trait Vec3Ext
where
    Self: Sized,
{
    /// Reflects this direction-vector around `other`.
    fn reflect(self, other: Self) -> Self;

    /// Returns a unit vector perpendicular to this (unit) normal, used as a
    /// surface tangent when none is given.
    fn tangent(self) -> Self;
}

impl Vec3Ext for Vec3 {
    fn reflect(self, other: Self) -> Self {
        self - 2.0 * other.dot(self) * other
    }

    fn tangent(self) -> Self {
        let helper = if self.z.abs() < 0.999 { Vec3::Z } else { Vec3::X };

        helper.cross(self).normalize()
    }
}
