//! Offline light propagation volume baker.
//!
//! The pipeline goes: [`voxelize`] static geometry into a
//! [`VoxelGrid<GeometryVoxel>`], [`inject`] direct light from the scene's
//! lights into a [`VoxelGrid<ShVoxel>`], then [`propagate`] it through the
//! grid as many times as the user asks for; the result can be exported into
//! a device texture or persisted into a file.
//!
//! [`LpvVolume`] ties everything together.

mod config;
mod export;
mod injector;
mod persistence;
mod propagation;
mod request;
mod scene;
mod sh;
mod texture_cache;
mod voxel_grid;
mod voxelizer;
mod volume;

#[cfg(feature = "wgpu")]
mod wgpu_texture;

#[cfg(test)]
mod test_scene;

pub use self::config::*;
pub use self::export::*;
pub use self::injector::*;
pub use self::persistence::*;
pub use self::propagation::*;
pub use self::request::*;
pub use self::scene::*;
pub use self::sh::*;
pub use self::texture_cache::*;
pub use self::voxel_grid::*;
pub use self::voxelizer::*;
pub use self::volume::*;
#[cfg(feature = "wgpu")]
pub use self::wgpu_texture::*;

pub mod prelude {
    pub use t3d_math::prelude::*;

    pub use crate::*;
}
