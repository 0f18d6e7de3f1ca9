/// Tunables of a light propagation volume.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LpvConfig {
    voxel_size: f32,
    emissive_intensity: f32,
    light_intensity: f32,
    propagation_multiplier: f32,
    export_intensity: f32,
    cull_buried_faces: bool,
}

impl LpvConfig {
    /// Edge length of a single voxel, in world units.
    pub fn voxel_size(&self) -> f32 {
        self.voxel_size
    }

    pub fn with_voxel_size(mut self, voxel_size: f32) -> Self {
        self.voxel_size = voxel_size;
        self
    }

    /// Scale applied to the color of emissive voxels when they get seeded
    /// into the direct light grid.
    pub fn emissive_intensity(&self) -> f32 {
        self.emissive_intensity
    }

    pub fn with_emissive_intensity(mut self, emissive_intensity: f32) -> Self {
        self.emissive_intensity = emissive_intensity;
        self
    }

    /// Scale applied to every point light's contribution.
    pub fn light_intensity(&self) -> f32 {
        self.light_intensity
    }

    pub fn with_light_intensity(mut self, light_intensity: f32) -> Self {
        self.light_intensity = light_intensity;
        self
    }

    /// Scale applied to light passed between neighbouring voxels on each
    /// propagation step.
    pub fn propagation_multiplier(&self) -> f32 {
        self.propagation_multiplier
    }

    pub fn with_propagation_multiplier(
        mut self,
        propagation_multiplier: f32,
    ) -> Self {
        self.propagation_multiplier = propagation_multiplier;
        self
    }

    /// Scale applied to colors before they get quantized for export.
    pub fn export_intensity(&self) -> f32 {
        self.export_intensity
    }

    pub fn with_export_intensity(mut self, export_intensity: f32) -> Self {
        self.export_intensity = export_intensity;
        self
    }

    /// When set, light is only ever reflected off faces whose neighbouring
    /// voxel is empty.
    pub fn cull_buried_faces(&self) -> bool {
        self.cull_buried_faces
    }

    pub fn with_cull_buried_faces(mut self, cull_buried_faces: bool) -> Self {
        self.cull_buried_faces = cull_buried_faces;
        self
    }
}

impl Default for LpvConfig {
    fn default() -> Self {
        Self {
            voxel_size: 1.0,
            emissive_intensity: 1.0,
            light_intensity: 1.0,
            propagation_multiplier: 1.0,
            export_intensity: 1.0,
            cull_buried_faces: true,
        }
    }
}
