use log::{info, warn};
use t3d_math::AXIS_DIRECTIONS;

use crate::{ShVoxel, VoxelGrid};

/// Performs a single propagation step, spreading light from each voxel of
/// `src` into its six neighbours in `dst`.
///
/// Every voxel of `dst` becomes the mean of what its in-bounds neighbours
/// send towards it, so voxels on the grid's boundary average over fewer
/// samples. Geometry is not consulted, so light passes through walls.
///
/// Grids of different sizes are left untouched.
pub fn propagate(
    src: &VoxelGrid<ShVoxel>,
    dst: &mut VoxelGrid<ShVoxel>,
    multiplier: f32,
) {
    info!("Propagating lights; voxels={}", src.size());

    if src.size() != dst.size() {
        warn!(
            "Can't propagate between grids of different sizes; \
             src={}, dst={}",
            src.size(),
            dst.size()
        );

        return;
    }

    for idx in 0..src.len() {
        let voxel = src.index_to_voxel(idx).as_ivec3();
        let mut sh = ShVoxel::ZERO;
        let mut samples = 0;

        for offset in AXIS_DIRECTIONS {
            let Some(neighbour) = src.get(voxel + offset.as_ivec3()) else {
                continue;
            };

            // Direction from the neighbour towards us
            let dir = -offset;
            let color = neighbour.decode_rgb(dir);

            sh += ShVoxel::encode(dir, color * multiplier);
            samples += 1;
        }

        dst[voxel.as_uvec3()] = if samples > 0 {
            sh / samples as f32
        } else {
            ShVoxel::ZERO
        };
    }
}
