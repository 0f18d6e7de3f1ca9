use std::path::Path;

use derivative::Derivative;
use glam::{UVec3, Vec3, Vec4, Vec4Swizzles};
use log::{debug, info};
use t3d_math::BoundingBox;

use crate::{
    inject, propagate, to_bgra, voxelize, GeometryVoxel, LpvConfig, LpvFile,
    LpvFileError, LpvRequest, Scene, ShVoxel, TextureCache,
    VolumeTextureSink, VoxelGrid,
};

/// One of the grids maintained by [`LpvVolume`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LpvGrid {
    Geometry,
    Direct,

    /// Result of the latest propagation step or, if there wasn't any, the
    /// direct light.
    #[default]
    Propagated,
}

/// Voxel to be drawn by the editor when visualizing a grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DebugCube {
    pub bounds: BoundingBox,
    pub color: Vec4,
}

/// Light propagation volume covering an axis-aligned box of the world.
#[derive(Derivative)]
#[derivative(Debug)]
pub struct LpvVolume {
    config: LpvConfig,
    bounds: BoundingBox,
    geometry: VoxelGrid<GeometryVoxel>,
    direct: VoxelGrid<ShVoxel>,
    propagated: [VoxelGrid<ShVoxel>; 2],
    propagation_steps: usize,
    #[derivative(Debug = "ignore")]
    textures: TextureCache,
}

impl LpvVolume {
    pub fn new(bounds: BoundingBox, config: LpvConfig) -> Self {
        let voxel_size = config.voxel_size();

        Self {
            config,
            bounds,
            geometry: VoxelGrid::new(bounds, voxel_size),
            direct: VoxelGrid::new(bounds, voxel_size),
            propagated: [
                VoxelGrid::new(bounds, voxel_size),
                VoxelGrid::new(bounds, voxel_size),
            ],
            propagation_steps: 0,
            textures: Default::default(),
        }
    }

    pub fn config(&self) -> &LpvConfig {
        &self.config
    }

    /// Updates configuration; changing the voxel size throws away all of the
    /// baked data.
    pub fn set_config(&mut self, config: LpvConfig) {
        let realloc = config.voxel_size() != self.config.voxel_size();

        self.config = config;

        if realloc {
            self.reallocate();
        }
    }

    pub fn set_voxel_size(&mut self, voxel_size: f32) {
        self.set_config(self.config.with_voxel_size(voxel_size));
    }

    pub fn bounds(&self) -> BoundingBox {
        self.bounds
    }

    /// Moves or resizes the volume; this throws away all of the baked data.
    pub fn set_bounds(&mut self, bounds: BoundingBox) {
        if bounds != self.bounds {
            self.bounds = bounds;
            self.reallocate();
        }
    }

    /// Returns the number of voxels on each axis.
    pub fn size(&self) -> UVec3 {
        self.geometry.size()
    }

    pub fn geometry(&self) -> &VoxelGrid<GeometryVoxel> {
        &self.geometry
    }

    pub fn direct(&self) -> &VoxelGrid<ShVoxel> {
        &self.direct
    }

    /// Returns the output of the latest propagation step, if any.
    pub fn propagated(&self) -> Option<&VoxelGrid<ShVoxel>> {
        if self.propagation_steps == 0 {
            None
        } else {
            Some(&self.propagated[(self.propagation_steps - 1) % 2])
        }
    }

    pub fn propagation_steps(&self) -> usize {
        self.propagation_steps
    }

    /// Drops cached textures, so that the next regeneration picks up their
    /// changes from disk.
    pub fn clear_textures(&mut self) {
        self.textures.clear();
    }

    fn reallocate(&mut self) {
        debug!(
            "Reallocating volume; bounds={:?}, voxel_size={}",
            self.bounds,
            self.config.voxel_size()
        );

        *self = Self {
            textures: std::mem::take(&mut self.textures),
            ..Self::new(self.bounds, self.config)
        };
    }

    fn reset_propagation(&mut self) {
        for grid in &mut self.propagated {
            grid.clear();
        }

        self.propagation_steps = 0;
    }

    /// Voxelizes the scene's static geometry; resets the lighting.
    pub fn regen_volume(&mut self, scene: &dyn Scene) {
        info!("Regenerating volume; size={}", self.size());

        self.geometry.clear();
        self.direct.clear();
        self.reset_propagation();

        voxelize(scene, &mut self.textures, &mut self.geometry);
    }

    /// Computes direct lighting; resets the propagation.
    pub fn inject_lights(&mut self, scene: &dyn Scene) {
        inject(scene, &self.config, &self.geometry, &mut self.direct);

        self.reset_propagation();
    }

    /// Runs a single propagation step.
    ///
    /// The first step reads from the direct light, the following ones from
    /// the previous step's output.
    pub fn propagate_lights(&mut self) {
        let multiplier = self.config.propagation_multiplier();
        let [a, b] = &mut self.propagated;

        match self.propagation_steps {
            0 => propagate(&self.direct, a, multiplier),
            n if n % 2 == 1 => propagate(a, b, multiplier),
            _ => propagate(b, a, multiplier),
        }

        self.propagation_steps += 1;
    }

    /// Returns colors of given grid in its linear order; light grids are
    /// decoded at zero direction.
    pub fn colors(&self, grid: LpvGrid) -> Vec<Vec4> {
        fn decode(grid: &VoxelGrid<ShVoxel>) -> Vec<Vec4> {
            grid.voxels()
                .iter()
                .map(|voxel| voxel.decode(Vec3::ZERO))
                .collect()
        }

        match grid {
            LpvGrid::Geometry => {
                self.geometry.voxels().iter().map(|v| v.color).collect()
            }
            LpvGrid::Direct => decode(&self.direct),
            LpvGrid::Propagated => {
                decode(self.propagated().unwrap_or(&self.direct))
            }
        }
    }

    /// Uploads given grid into the device texture.
    pub fn export(&self, grid: LpvGrid, sink: &mut dyn VolumeTextureSink) {
        info!("Exporting volume; grid={:?}, size={}", grid, self.size());

        let bytes = to_bgra(self.colors(grid), self.config.export_intensity());

        sink.upload(self.size(), &bytes);
    }

    /// Returns all non-empty voxels of given grid.
    pub fn debug_cubes(&self, grid: LpvGrid) -> Vec<DebugCube> {
        self.colors(grid)
            .into_iter()
            .enumerate()
            .filter(|(_, color)| *color != Vec4::ZERO)
            .map(|(idx, color)| DebugCube {
                bounds: self
                    .geometry
                    .voxel_bounds(self.geometry.index_to_voxel(idx)),
                color,
            })
            .collect()
    }

    pub fn to_file(&self) -> LpvFile {
        LpvFile {
            size: self.size(),
            direct: self.colors(LpvGrid::Direct),
            propagated: self.colors(LpvGrid::Propagated),
        }
    }

    /// Replaces light grids with the ones from `file`.
    ///
    /// Since files store plain colors, the loaded light becomes direction
    /// less.
    pub fn apply_file(&mut self, file: &LpvFile) -> Result<(), LpvFileError> {
        if file.size != self.size() {
            return Err(LpvFileError::DimensionMismatch {
                expected: self.size(),
                actual: file.size,
            });
        }

        for (dst, colors) in [
            (&mut self.direct, &file.direct),
            (&mut self.propagated[0], &file.propagated),
        ] {
            dst.clear();

            for (voxel, color) in dst.voxels_mut().iter_mut().zip(colors)
            {
                *voxel = ShVoxel::from_ambient(color.xyz());
            }
        }

        self.propagated[1].clear();
        self.propagation_steps = 1;

        Ok(())
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), LpvFileError> {
        self.to_file().save(path)
    }

    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<(), LpvFileError> {
        let file = LpvFile::load(path)?;

        self.apply_file(&file)
    }

    /// Services all operations of `request`, in the order: regen, inject,
    /// propagate, export; then clears the request.
    pub fn apply(
        &mut self,
        scene: &dyn Scene,
        request: &mut LpvRequest,
        sink: &mut dyn VolumeTextureSink,
    ) {
        if request.contains(LpvRequest::REGEN) {
            self.regen_volume(scene);
        }

        if request.contains(LpvRequest::INJECT) {
            self.inject_lights(scene);
        }

        if request.contains(LpvRequest::PROPAGATE) {
            self.propagate_lights();
        }

        if request.contains(LpvRequest::EXPORT) {
            self.export(LpvGrid::Propagated, sink);
        }

        *request = LpvRequest::empty();
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::{ivec3, uvec3, vec3, vec4};

    use super::*;
    use crate::test_scene::TestScene;
    use crate::{Light, Material};

    /// 4x4x4 volume with a small white quad at voxel (2, 2, 2) and a point
    /// light right above it.
    fn scene() -> TestScene {
        TestScene::default()
            .with_material(Material::default())
            .with_quad(
                [
                    vec3(2.2, 2.2, 2.5),
                    vec3(2.8, 2.2, 2.5),
                    vec3(2.8, 2.8, 2.5),
                    vec3(2.2, 2.8, 2.5),
                ],
                0,
            )
            .with_light(Light::Point {
                position: vec3(2.5, 2.5, 3.9),
                color: Vec3::ONE,
                range: 10.0,
                attenuation_ratio: vec3(0.0, 1.0, 1.0),
            })
    }

    fn target() -> LpvVolume {
        LpvVolume::new(
            BoundingBox::new(Vec3::ZERO, Vec3::splat(4.0)),
            LpvConfig::default(),
        )
    }

    #[test]
    fn bake() {
        let mut target = target();

        assert_eq!(uvec3(4, 4, 4), target.size());

        target.regen_volume(&scene());

        assert!(target.geometry()[uvec3(2, 2, 2)].is_occupied());
        assert_eq!(
            1,
            target
                .geometry()
                .voxels()
                .iter()
                .filter(|v| v.is_occupied())
                .count()
        );

        target.inject_lights(&scene());

        let lit = target.direct()[uvec3(2, 2, 2)];

        assert!(lit.decode_rgb(Vec3::Z).x > 0.0);
        assert!(lit.decode_rgb(Vec3::Z).y > 0.0);
        assert!(lit.decode_rgb(Vec3::Z).z > 0.0);

        for (voxel, value) in target.direct().iter() {
            if voxel != uvec3(2, 2, 2) {
                assert!(value.is_zero(), "voxel {voxel}");
            }
        }

        assert_eq!(None, target.direct().get(ivec3(4, 2, 2)));
        assert_eq!(None, target.direct().get(ivec3(2, -1, 2)));
    }

    #[test]
    fn propagation_ping_pongs() {
        let mut target = target();

        target.regen_volume(&scene());
        target.inject_lights(&scene());

        assert!(target.propagated().is_none());

        let mut expected = target.direct().clone();
        let mut tmp = expected.clone();

        for step in 1..=3 {
            target.propagate_lights();

            propagate(&expected, &mut tmp, 1.0);
            std::mem::swap(&mut expected, &mut tmp);

            assert_eq!(step, target.propagation_steps());
            assert_eq!(
                expected.voxels(),
                target.propagated().unwrap().voxels()
            );
        }

        // Light has spread out of the lit voxel
        assert!(!target.propagated().unwrap()[uvec3(2, 2, 3)].is_zero());

        // Re-injecting starts over
        target.inject_lights(&scene());

        assert!(target.propagated().is_none());
    }

    #[test]
    fn reallocate() {
        let mut target = target();

        target.regen_volume(&scene());
        target.inject_lights(&scene());
        target.propagate_lights();
        target.set_voxel_size(2.0);

        assert_eq!(uvec3(2, 2, 2), target.size());
        assert_eq!(8, target.direct().len());
        assert!(target.propagated().is_none());
        assert!(target.geometry().voxels().iter().all(|v| !v.is_occupied()));

        target.set_bounds(BoundingBox::new(Vec3::ZERO, vec3(8.0, 4.0, 2.0)));

        assert_eq!(uvec3(4, 2, 1), target.size());
    }

    #[test]
    fn export() {
        let mut target = target();
        let mut bytes = Vec::new();

        target.regen_volume(&scene());
        target.export(LpvGrid::Geometry, &mut bytes);

        assert_eq!(4 * 64, bytes.len());

        // Voxel (2, 2, 2) sits at index 16 * 2 + 4 * 2 + 2
        assert_eq!([255, 255, 255, 255], bytes[42 * 4..43 * 4]);
        assert_eq!([0, 0, 0, 0], bytes[41 * 4..42 * 4]);
    }

    #[test]
    fn debug_cubes() {
        let mut target = target();

        target.regen_volume(&scene());

        assert_eq!(
            vec![DebugCube {
                bounds: BoundingBox::new(Vec3::splat(2.0), Vec3::splat(3.0)),
                color: Vec4::ONE,
            }],
            target.debug_cubes(LpvGrid::Geometry)
        );

        assert!(target.debug_cubes(LpvGrid::Direct).is_empty());

        target.inject_lights(&scene());

        assert_eq!(1, target.debug_cubes(LpvGrid::Direct).len());
    }

    #[test]
    fn save_then_load() {
        let path = std::env::temp_dir()
            .join(format!("t3d-lpv-{}.bin", std::process::id()));

        let mut source = target();

        source.regen_volume(&scene());
        source.inject_lights(&scene());
        source.propagate_lights();
        source.save(&path).unwrap();

        let mut target = target();

        target.load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        for grid in [LpvGrid::Direct, LpvGrid::Propagated] {
            let expected = source.colors(grid);
            let actual = target.colors(grid);

            for (expected, actual) in expected.into_iter().zip(actual) {
                assert_relative_eq!(expected.x, actual.x, epsilon = 1e-6);
                assert_relative_eq!(expected.y, actual.y, epsilon = 1e-6);
                assert_relative_eq!(expected.z, actual.z, epsilon = 1e-6);
                assert_eq!(expected.w, actual.w);
            }
        }
    }

    #[test]
    fn load_mismatched() {
        let file = LpvFile {
            size: uvec3(1, 1, 1),
            direct: vec![vec4(1.0, 1.0, 1.0, 1.0)],
            propagated: vec![Vec4::ZERO],
        };

        assert!(matches!(
            target().apply_file(&file),
            Err(LpvFileError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn apply() {
        let mut target = target();
        let mut bytes = Vec::new();

        let mut request = LpvRequest::REGEN
            | LpvRequest::INJECT
            | LpvRequest::PROPAGATE
            | LpvRequest::EXPORT;

        target.apply(&scene(), &mut request, &mut bytes);

        assert!(request.is_empty());
        assert_eq!(1, target.propagation_steps());
        assert_eq!(4 * 64, bytes.len());

        // Nothing requested, nothing happens
        target.apply(&scene(), &mut request, &mut bytes);

        assert_eq!(1, target.propagation_steps());
    }
}
