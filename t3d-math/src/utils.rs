mod f32_ext;
mod vec3_ext;

use core::ops;

pub use self::f32_ext::*;
pub use self::vec3_ext::*;

pub fn lerp<T>(a: T, b: T, t: f32) -> T
where
    T: ops::Add<Output = T>,
    T: ops::Sub<Output = T>,
    T: ops::Mul<f32, Output = T>,
    T: Copy,
{
    a + (b - a) * t.clamp(0.0, 1.0)
}
