use std::ops::{Index, IndexMut};

use derivative::Derivative;
use glam::{IVec3, UVec3, Vec3};
use log::warn;
use t3d_math::BoundingBox;

/// Dense 3D array of voxels covering an axis-aligned box.
///
/// Voxels are stored linearly as `size.x * size.y * z + size.x * y + x`;
/// every other part of the baker (export, persistence) relies on this exact
/// ordering.
#[derive(Clone, Derivative)]
#[derivative(Debug(bound = ""))]
pub struct VoxelGrid<T> {
    bounds: BoundingBox,
    voxel_size: f32,
    size: UVec3,
    #[derivative(Debug = "ignore")]
    voxels: Vec<T>,
}

impl<T> VoxelGrid<T>
where
    T: Clone + Default,
{
    /// Creates a grid covering `bounds`.
    ///
    /// If the grid would be too large to allocate, an empty grid is returned
    /// instead.
    pub fn new(bounds: BoundingBox, voxel_size: f32) -> Self {
        let size = Self::voxel_count(&bounds, voxel_size);

        let Some(voxels) = linear_len(size).and_then(allocate::<T>) else {
            warn!(
                "Volume too large to allocate, leaving it empty; size={}",
                size
            );

            return Self {
                bounds,
                voxel_size,
                size: UVec3::ZERO,
                voxels: Vec::new(),
            };
        };

        Self {
            bounds,
            voxel_size,
            size,
            voxels,
        }
    }

    /// Returns how many voxels of given size fit into `bounds`, per axis.
    ///
    /// Voxels don't have to fit exactly; whatever remains past the last
    /// full voxel on each axis is not covered by the grid.
    pub fn voxel_count(bounds: &BoundingBox, voxel_size: f32) -> UVec3 {
        if !bounds.is_set() || voxel_size <= 0.0 {
            return UVec3::ZERO;
        }

        (bounds.extent() / voxel_size).floor().max(Vec3::ZERO).as_uvec3()
    }

    /// Resets every voxel back to its default value.
    pub fn clear(&mut self) {
        self.voxels.fill(T::default());
    }

    pub fn map<U>(&self, f: impl Fn(&T) -> U) -> VoxelGrid<U> {
        VoxelGrid {
            bounds: self.bounds,
            voxel_size: self.voxel_size,
            size: self.size,
            voxels: self.voxels.iter().map(f).collect(),
        }
    }
}

impl<T> VoxelGrid<T> {
    pub fn bounds(&self) -> BoundingBox {
        self.bounds
    }

    pub fn voxel_size(&self) -> f32 {
        self.voxel_size
    }

    pub fn size(&self) -> UVec3 {
        self.size
    }

    pub fn len(&self) -> usize {
        self.voxels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voxels.is_empty()
    }

    pub fn voxels(&self) -> &[T] {
        &self.voxels
    }

    pub fn voxels_mut(&mut self) -> &mut [T] {
        &mut self.voxels
    }

    /// Returns the voxel containing `point`, if any.
    pub fn get_voxel(&self, point: Vec3) -> Option<UVec3> {
        let voxel = ((point - self.bounds.min()) / self.voxel_size).floor();

        if voxel.cmplt(Vec3::ZERO).any()
            || voxel.cmpge(self.size.as_vec3()).any()
        {
            return None;
        }

        let voxel = voxel.as_uvec3();

        // Floating-point rounding can put `point` right next to the voxel
        // we've computed, so let's make sure it's really there
        if self.voxel_bounds(voxel).contains(point) {
            Some(voxel)
        } else {
            None
        }
    }

    /// Returns the voxel nearest to `point`, snapping points outside of the
    /// grid onto its boundary.
    pub fn clamped_voxel(&self, point: Vec3) -> UVec3 {
        let max = (self.size.max(UVec3::ONE) - UVec3::ONE).as_vec3();

        ((point - self.bounds.min()) / self.voxel_size)
            .floor()
            .clamp(Vec3::ZERO, max)
            .as_uvec3()
    }

    /// Returns linear index of given voxel or `None` if the voxel lies
    /// outside of the grid.
    pub fn index(&self, voxel: IVec3) -> Option<usize> {
        if voxel.cmplt(IVec3::ZERO).any()
            || voxel.cmpge(self.size.as_ivec3()).any()
        {
            return None;
        }

        let (sx, sy) = (self.size.x as usize, self.size.y as usize);

        Some(
            sx * sy * voxel.z as usize
                + sx * voxel.y as usize
                + voxel.x as usize,
        )
    }

    pub fn index_to_voxel(&self, index: usize) -> UVec3 {
        let (sx, sy) = (self.size.x as usize, self.size.y as usize);
        let layer = sx * sy;

        UVec3::new(
            (index % sx) as u32,
            ((index % layer) / sx) as u32,
            (index / layer) as u32,
        )
    }

    pub fn voxel_bounds(&self, voxel: UVec3) -> BoundingBox {
        let min = self.bounds.min() + voxel.as_vec3() * self.voxel_size;

        BoundingBox::new(min, min + Vec3::splat(self.voxel_size))
    }

    pub fn voxel_center(&self, voxel: UVec3) -> Vec3 {
        self.bounds.min() + (voxel.as_vec3() + 0.5) * self.voxel_size
    }

    pub fn get(&self, voxel: IVec3) -> Option<&T> {
        self.index(voxel).map(|idx| &self.voxels[idx])
    }

    pub fn get_mut(&mut self, voxel: IVec3) -> Option<&mut T> {
        self.index(voxel).map(|idx| &mut self.voxels[idx])
    }

    /// Iterates over all voxels in their linear order.
    pub fn iter(&self) -> impl Iterator<Item = (UVec3, &T)> + '_ {
        self.voxels
            .iter()
            .enumerate()
            .map(|(idx, voxel)| (self.index_to_voxel(idx), voxel))
    }
}

/// Returns the number of voxels in a grid of given size, if it fits in
/// `usize`.
pub fn linear_len(size: UVec3) -> Option<usize> {
    (size.x as usize)
        .checked_mul(size.y as usize)?
        .checked_mul(size.z as usize)
}

fn allocate<T>(len: usize) -> Option<Vec<T>>
where
    T: Clone + Default,
{
    let mut voxels = Vec::new();

    voxels.try_reserve_exact(len).ok()?;
    voxels.resize(len, T::default());

    Some(voxels)
}

impl<T> Index<UVec3> for VoxelGrid<T> {
    type Output = T;

    fn index(&self, voxel: UVec3) -> &Self::Output {
        let idx = VoxelGrid::index(self, voxel.as_ivec3())
            .unwrap_or_else(|| panic!("voxel out of bounds: {voxel}"));

        &self.voxels[idx]
    }
}

impl<T> IndexMut<UVec3> for VoxelGrid<T> {
    fn index_mut(&mut self, voxel: UVec3) -> &mut Self::Output {
        let idx = VoxelGrid::index(self, voxel.as_ivec3())
            .unwrap_or_else(|| panic!("voxel out of bounds: {voxel}"));

        &mut self.voxels[idx]
    }
}
