//! Convex brushes described by their bounding planes.
//!
//! [`BrushGeometry::generate`] turns a set of planes into points, faces and
//! triangles; [`Brush`] keeps the planes around as editable surfaces, while
//! [`Polyhedron`], [`Polygon`] and [`split_brush`] implement cutting a brush
//! in two.

mod brush;
mod csg;
mod face;
mod geometry;
mod polygon;
mod polyhedron;
mod winding;

pub use self::brush::*;
pub use self::csg::*;
pub use self::face::*;
pub use self::geometry::*;
pub use self::polygon::*;
pub use self::polyhedron::*;
pub use self::winding::*;

pub mod prelude {
    pub use t3d_math::prelude::*;

    pub use crate::*;
}
