use std::ops::{Add, AddAssign, Div, Mul};

use bytemuck::{Pod, Zeroable};
use glam::{vec4, Vec3, Vec4};
use t3d_math::prelude::PI;

/// Band-0 coefficient of the clamped-cosine lobe.
pub const SH_C0: f32 = 0.886226925;

/// Band-1 coefficient of the clamped-cosine lobe.
pub const SH_C1: f32 = 1.02332671;

/// Evaluates the clamped-cosine SH basis at given direction.
///
/// Note that the band-1 terms are stored in `(y, z, x)` order; baked volumes
/// depend on this layout, so it has to stay this way.
pub fn sh_basis(dir: Vec3) -> Vec4 {
    vec4(SH_C0, -SH_C1 * dir.y, SH_C1 * dir.z, -SH_C1 * dir.x)
}

/// Directional radiance stored as 4 SH coefficients per color channel.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct ShVoxel {
    pub red: Vec4,
    pub green: Vec4,
    pub blue: Vec4,
}

impl ShVoxel {
    pub const ZERO: Self = Self {
        red: Vec4::ZERO,
        green: Vec4::ZERO,
        blue: Vec4::ZERO,
    };

    /// Projects radiance of given color, arriving along `dir`, onto the SH
    /// basis.
    ///
    /// A zero `dir` yields a direction-less (ambient) value.
    pub fn encode(dir: Vec3, color: Vec3) -> Self {
        let coeffs = sh_basis(dir) / PI;

        Self {
            red: coeffs * color.x,
            green: coeffs * color.y,
            blue: coeffs * color.z,
        }
    }

    /// Creates a direction-less value whose zero-direction decode yields
    /// exactly `color`.
    pub fn from_ambient(color: Vec3) -> Self {
        let coeffs = Vec4::X / SH_C0;

        Self {
            red: coeffs * color.x,
            green: coeffs * color.y,
            blue: coeffs * color.z,
        }
    }

    /// Reconstructs radiance along `dir`, per channel.
    ///
    /// The result is not clamped and can go negative for directions facing
    /// away from the stored lobe.
    pub fn decode_rgb(&self, dir: Vec3) -> Vec3 {
        let basis = sh_basis(dir);

        Vec3::new(
            basis.dot(self.red),
            basis.dot(self.green),
            basis.dot(self.blue),
        )
    }

    /// Reconstructs color along `dir`; alpha is `1.0` if any of the channels
    /// carries light, `0.0` otherwise.
    pub fn decode(&self, dir: Vec3) -> Vec4 {
        let rgb = self.decode_rgb(dir);
        let alpha = if rgb.cmpgt(Vec3::ZERO).any() { 1.0 } else { 0.0 };

        rgb.extend(alpha)
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

impl Add for ShVoxel {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self::Output {
        self += rhs;
        self
    }
}

impl AddAssign for ShVoxel {
    fn add_assign(&mut self, rhs: Self) {
        self.red += rhs.red;
        self.green += rhs.green;
        self.blue += rhs.blue;
    }
}

impl Mul<f32> for ShVoxel {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self::Output {
        Self {
            red: self.red * rhs,
            green: self.green * rhs,
            blue: self.blue * rhs,
        }
    }
}

impl Div<f32> for ShVoxel {
    type Output = Self;

    fn div(self, rhs: f32) -> Self::Output {
        Self {
            red: self.red / rhs,
            green: self.green / rhs,
            blue: self.blue / rhs,
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::vec3;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use t3d_math::AXIS_DIRECTIONS;

    use super::*;

    fn random_dir(rng: &mut StdRng) -> Vec3 {
        vec3(
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
        )
        .normalize_or_zero()
    }

    fn random_color(rng: &mut StdRng) -> Vec3 {
        vec3(rng.gen(), rng.gen(), rng.gen()) * 4.0
    }

    fn assert_voxel_eq(a: ShVoxel, b: ShVoxel) {
        for (a, b) in [(a.red, b.red), (a.green, b.green), (a.blue, b.blue)] {
            for i in 0..4 {
                assert_relative_eq!(a[i], b[i], epsilon = 1e-5);
            }
        }
    }

    #[test]
    fn encode_is_additive() {
        let mut rng = StdRng::seed_from_u64(1234);

        for _ in 0..256 {
            let dir = random_dir(&mut rng);
            let c1 = random_color(&mut rng);
            let c2 = random_color(&mut rng);

            assert_voxel_eq(
                ShVoxel::encode(dir, c1) + ShVoxel::encode(dir, c2),
                ShVoxel::encode(dir, c1 + c2),
            );
        }
    }

    #[test]
    fn decode_of_ambient_encode() {
        let color = vec3(1.0, 0.5, 0.25);
        let target = ShVoxel::encode(Vec3::ZERO, color).decode(Vec3::ZERO);

        // Band-0 only: SH_C0^2 / PI = 1 / 4
        assert_relative_eq!(target.x, 0.25, epsilon = 1e-6);
        assert_relative_eq!(target.y, 0.125, epsilon = 1e-6);
        assert_relative_eq!(target.z, 0.0625, epsilon = 1e-6);
        assert_eq!(1.0, target.w);
    }

    #[test]
    fn decode_of_lobe_aligned_encode() {
        // Along the lobe's own direction, both bands add up:
        // (SH_C0^2 + SH_C1^2) / PI
        let k = (SH_C0 * SH_C0 + SH_C1 * SH_C1) / PI;

        for dir in AXIS_DIRECTIONS {
            let target = ShVoxel::encode(dir, Vec3::ONE).decode_rgb(dir);

            assert_relative_eq!(target.x, k, epsilon = 1e-5);
            assert_relative_eq!(target.y, k, epsilon = 1e-5);
            assert_relative_eq!(target.z, k, epsilon = 1e-5);

            // ... while the opposite direction sees less light
            let opposite = ShVoxel::encode(dir, Vec3::ONE).decode_rgb(-dir);

            assert!(opposite.x < target.x);
        }
    }

    #[test]
    fn double_encode_doubles_decode() {
        let mut rng = StdRng::seed_from_u64(4321);

        for _ in 0..64 {
            let dir = random_dir(&mut rng);
            let color = random_color(&mut rng);
            let single = ShVoxel::encode(dir, color);

            let mut double = ShVoxel::ZERO;
            double += single;
            double += single;

            let single = single.decode_rgb(Vec3::ZERO);
            let double = double.decode_rgb(Vec3::ZERO);

            assert_relative_eq!(double.x, 2.0 * single.x, epsilon = 1e-5);
            assert_relative_eq!(double.y, 2.0 * single.y, epsilon = 1e-5);
            assert_relative_eq!(double.z, 2.0 * single.z, epsilon = 1e-5);
        }
    }

    #[test]
    fn from_ambient() {
        let color = vec3(0.2, 0.4, 0.8);
        let target = ShVoxel::from_ambient(color).decode(Vec3::ZERO);

        assert_relative_eq!(target.x, 0.2, epsilon = 1e-6);
        assert_relative_eq!(target.y, 0.4, epsilon = 1e-6);
        assert_relative_eq!(target.z, 0.8, epsilon = 1e-6);
        assert_eq!(1.0, target.w);

        assert_eq!(0.0, ShVoxel::ZERO.decode(Vec3::ZERO).w);
    }
}
