//! Geometry primitives shared by the light-volume baker and the brush
//! kernel.

#![allow(clippy::len_without_is_empty)]
#![allow(clippy::manual_range_contains)]

mod bounding_box;
mod bounding_sphere;
mod line;
mod plane;
mod utils;

pub use self::bounding_box::*;
pub use self::bounding_sphere::*;
pub use self::line::*;
pub use self::plane::*;
pub use self::utils::*;

pub mod prelude {
    pub use core::f32::consts::PI;

    pub use glam::*;

    pub use crate::*;
}

/// Distance within which a point is considered to lie on a plane.
pub const PLANE_EPSILON: f32 = 0.005;
